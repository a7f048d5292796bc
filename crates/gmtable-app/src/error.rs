//! gmtable App: error types.

use gmtable_core::RecordError;
use thiserror::Error;

/// Startup and runtime errors for the bootstrap.
#[derive(Debug, Error)]
pub enum AppError {
    /// A configuration value is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The configuration file could not be parsed.
    #[error("configuration file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A record tag or record payload was invalid.
    #[error("record error: {0}")]
    Record(#[from] RecordError),

    /// Reading the feed or the configuration file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The feed worker task panicked or was cancelled.
    #[error("feed worker error: {0}")]
    Worker(#[from] tokio::task::JoinError),
}
