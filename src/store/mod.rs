//! Transient notification storage.
//!
//! Provides the thread-safe toast stack shared by every producer in the
//! application, with per-item auto-expiry.

pub mod notification_store;
pub mod types;

pub use notification_store::*;
pub use types::*;
