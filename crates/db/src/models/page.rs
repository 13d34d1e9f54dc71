//! Page entity model and DTOs.

use loft_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A page row from the `pages` table.
///
/// Pages themselves are authored and edited elsewhere; this subsystem only
/// reads the stable identifier, the slug/hostname used for routing, and
/// owns the `current_version` pointer.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Page {
    pub id: DbId,
    pub slug: String,
    pub hostname: Option<String>,
    pub title: Option<String>,
    /// Version id of the currently published artifact, if any.
    pub current_version: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new page.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePage {
    pub slug: String,
    pub hostname: Option<String>,
    pub title: Option<String>,
}
