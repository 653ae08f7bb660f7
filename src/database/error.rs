use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username '{0}' is already taken")]
    DuplicateUsername(String),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Logs a driver error with context before converting it.
pub(crate) trait LogContext<T> {
    fn log_context(self, context: &str) -> Result<T, StoreError>;
}

impl<T> LogContext<T> for rusqlite::Result<T> {
    fn log_context(self, context: &str) -> Result<T, StoreError> {
        self.map_err(|e| {
            log::error!("{}: {}", context, e);
            StoreError::Sqlite(e)
        })
    }
}
