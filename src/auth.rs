//! Authentication state consumed by the inactivity monitor.

use crate::error::{SessionError, SessionResult};
use std::sync::RwLock;
use tokio::sync::watch;

/// What the monitor needs from the authentication layer.
pub trait AuthProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;

    /// Ends the current session. May fail if the remote side could not be
    /// reached; callers decide whether that matters and log it.
    fn logout(&self) -> SessionResult<()>;
}

/// Server-side session invalidation hook used by [`SessionAuth`].
pub type Invalidator = Box<dyn Fn(&str) -> SessionResult<()> + Send + Sync>;

/// In-process authentication state.
///
/// Local state is the source of truth for `is_authenticated`. Logging out
/// always clears it, even when the invalidation hook fails; the failure is
/// still returned to the caller.
pub struct SessionAuth {
    user: RwLock<Option<String>>,
    invalidator: Option<Invalidator>,
    changes: watch::Sender<bool>,
}

impl SessionAuth {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(false);
        Self {
            user: RwLock::new(None),
            invalidator: None,
            changes,
        }
    }

    /// Uses `invalidator` to end the remote session on logout.
    pub fn with_invalidator(invalidator: Invalidator) -> Self {
        Self {
            invalidator: Some(invalidator),
            ..Self::new()
        }
    }

    /// Marks `username` as logged in.
    pub fn login(&self, username: impl Into<String>) {
        let username = username.into();
        tracing::info!(user = %username, "User logged in");
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(username);
        self.changes.send_replace(true);
    }

    pub fn current_user(&self) -> Option<String> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Watches authentication changes; the value is `is_authenticated`.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.changes.subscribe()
    }
}

impl Default for SessionAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider for SessionAuth {
    fn is_authenticated(&self) -> bool {
        self.user.read().map(|u| u.is_some()).unwrap_or(false)
    }

    fn logout(&self) -> SessionResult<()> {
        let user = self.user.write().unwrap_or_else(|e| e.into_inner()).take();

        let result = match (&self.invalidator, user.as_deref()) {
            (Some(invalidate), Some(name)) => invalidate(name),
            _ => Ok(()),
        };

        tracing::info!(user = ?user, failed = result.is_err(), "User logged out");
        self.changes.send_replace(false);

        result
    }
}

/// Builds the error an [`Invalidator`] returns when the backend refuses.
pub fn logout_failed(reason: impl Into<String>) -> SessionError {
    SessionError::LogoutFailed(reason.into())
}
