//! Repository for the `page_versions` table — the version ledger.

use loft_core::types::DbId;
use sqlx::PgPool;

use crate::models::page_version::{CreatePageVersion, PageVersion};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, page_id, version, storage_key, artifact_url, size_bytes, checksum, status, created_at";

/// Provides append, lookup, and deletion for publish-ledger rows.
pub struct VersionRepo;

impl VersionRepo {
    /// Record a publish event, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePageVersion,
    ) -> Result<PageVersion, sqlx::Error> {
        let query = format!(
            "INSERT INTO page_versions
                 (page_id, version, storage_key, artifact_url, size_bytes, checksum)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PageVersion>(&query)
            .bind(input.page_id)
            .bind(&input.version)
            .bind(&input.storage_key)
            .bind(&input.artifact_url)
            .bind(input.size_bytes)
            .bind(&input.checksum)
            .fetch_one(pool)
            .await
    }

    /// List all versions for a page, newest first.
    ///
    /// Ties on `created_at` (same-millisecond publishes) are broken by
    /// insertion order so the retention window is deterministic.
    pub async fn list_by_page(
        pool: &PgPool,
        page_id: DbId,
    ) -> Result<Vec<PageVersion>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM page_versions
             WHERE page_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, PageVersion>(&query)
            .bind(page_id)
            .fetch_all(pool)
            .await
    }

    /// Find a specific version of a page by its version id.
    pub async fn find_by_page_and_version(
        pool: &PgPool,
        page_id: DbId,
        version: &str,
    ) -> Result<Option<PageVersion>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM page_versions WHERE page_id = $1 AND version = $2");
        sqlx::query_as::<_, PageVersion>(&query)
            .bind(page_id)
            .bind(version)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete a ledger row. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM page_versions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
