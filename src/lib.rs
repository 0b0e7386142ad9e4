//! SessionWatch - session inactivity monitor and toast notification store.
//!
//! The two services behind a training dashboard's session handling:
//!
//! - [`store::NotificationStore`]: newest-first stack of auto-expiring
//!   toasts.
//! - [`monitor::SessionMonitor`]: warns an idle user and forces a logout
//!   when the idle budget runs out.
//!
//! Both take their timers from an injected [`scheduler::Scheduler`].

pub mod auth;
pub mod config;
pub mod error;
pub mod locale;
pub mod monitor;
pub mod scheduler;
pub mod server;
pub mod store;

pub use error::{SessionError, SessionResult};
