use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Empty field: {0}")]
    EmptyField(&'static str),

    #[error("Invalid field: {0}")]
    InvalidData(&'static str),

    #[error("Invalid repeat rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: &'static str },

    #[error("Task not found: {0}")]
    NotFound(String),

    #[error("Database error")]
    Storage(#[from] sqlx::Error),

    #[error("Migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("IO error")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    pub(crate) fn invalid_rule(rule: &str, reason: &'static str) -> Self {
        CoreError::InvalidRule {
            rule: rule.to_string(),
            reason,
        }
    }

    /// True for errors caused by the caller's input rather than by the store.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::EmptyField(_) | CoreError::InvalidData(_) | CoreError::InvalidRule { .. }
        )
    }
}
