//! Error types shared by the session services.

use thiserror::Error;

/// Errors surfaced by configuration and the authentication provider.
///
/// The notification store has no failure modes; the monitor only ever
/// sees `LogoutFailed`, and it logs that instead of propagating it.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("warning lead time ({warning_ms}ms) must be shorter than the timeout ({timeout_ms}ms)")]
    InvalidTiming { timeout_ms: u64, warning_ms: u64 },

    #[error("timeout ({timeout_ms}ms) exceeds the {max_ms}ms ceiling")]
    TimeoutTooLong { timeout_ms: u64, max_ms: u64 },

    #[error("logout failed: {0}")]
    LogoutFailed(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::Config(err.to_string())
    }
}
