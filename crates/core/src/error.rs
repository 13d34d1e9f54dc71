use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Payload of {size_bytes} bytes exceeds the {limit_bytes}-byte artifact ceiling")]
    PayloadTooLarge { size_bytes: usize, limit_bytes: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}
