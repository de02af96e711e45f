#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Info {id} not found")]
    NotFound { id: i64 },

    #[error("Validation error on field '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("Upstream request failed: {0}")]
    Upstream(#[source] anyhow::Error),

    #[error("Cache error: {0}")]
    Cache(#[source] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

impl DomainError {
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    #[must_use]
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }
}
