//! Error types for ratewatch

use thiserror::Error;

/// Main error type for ratewatch
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("HTTP error: {0}")]
    HttpError(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Calendar error: {0}")]
    CalendarError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Change log error: {0}")]
    ChangeLogError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

/// Result type alias for ratewatch operations
pub type Result<T> = std::result::Result<T, MonitorError>;
