use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("requests log I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("requests log CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("storage worker failed: {0}")]
    Worker(String),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("OWNER_ID must be a numeric Telegram user id, got {0:?}")]
    InvalidOwnerId(String),
}
