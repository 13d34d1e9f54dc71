//! Repository for the `pages` table.

use loft_core::types::DbId;
use sqlx::PgPool;

use crate::models::page::{CreatePage, Page};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, slug, hostname, title, current_version, created_at, updated_at";

/// Provides lookups and the current-version pointer mutation for pages.
pub struct PageRepo;

impl PageRepo {
    /// Insert a new page, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreatePage) -> Result<Page, sqlx::Error> {
        let query = format!(
            "INSERT INTO pages (slug, hostname, title)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Page>(&query)
            .bind(&input.slug)
            .bind(&input.hostname)
            .bind(&input.title)
            .fetch_one(pool)
            .await
    }

    /// Find a page by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a page by slug. Used by the server-rendered fallback path.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Page>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE slug = $1");
        sqlx::query_as::<_, Page>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List all page ids. Used by the periodic retention sweep.
    pub async fn list_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as("SELECT id FROM pages ORDER BY id")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Point a page at a new current version.
    ///
    /// Last writer wins under concurrent publishes: the single UPDATE is
    /// atomic and no explicit lock is taken. Returns `false` if the page
    /// does not exist.
    pub async fn set_current_version(
        pool: &PgPool,
        id: DbId,
        version: &str,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE pages SET current_version = $2, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .bind(version)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
