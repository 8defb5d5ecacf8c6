//! Logger errors

use tracing_subscriber::util::TryInitError;

/// Result type for logger setup
pub type LogResult<T> = Result<T, LogError>;

/// Errors raised while installing the subscriber
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The filter string is not valid `EnvFilter` syntax
    #[error("invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed
    #[error("failed to install the global subscriber")]
    Init(#[from] TryInitError),
}
