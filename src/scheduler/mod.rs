//! Deferred-callback scheduling.
//!
//! The notification store and the inactivity monitor never touch timers
//! directly. They go through a [`Scheduler`], so the same state machine runs
//! on tokio timers in the host binary and on a simulated clock in tests.

pub mod manual;
pub mod runtime;

pub use manual::*;
pub use runtime::*;

use chrono::{DateTime, Utc};
use std::fmt;
use std::time::Duration;

/// A one-shot callback run when its deadline passes.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle identifying a scheduled task, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(pub(crate) u64);

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Capability to run a task after a delay and to cancel it.
pub trait Scheduler: Send + Sync {
    /// Schedules `task` to run once `delay` has elapsed.
    fn schedule_after(&self, delay: Duration, task: Task) -> TimerToken;

    /// Cancels a pending task. Unknown or already fired tokens are ignored.
    fn cancel(&self, token: TimerToken);

    /// Current time as seen by this scheduler.
    fn now(&self) -> DateTime<Utc>;
}

/// Converts a std duration into a chrono one, saturating on overflow.
pub(crate) fn to_chrono(duration: Duration) -> chrono::Duration {
    chrono::Duration::from_std(duration).unwrap_or_else(|_| chrono::Duration::max_value())
}

/// Whole milliseconds in `duration`, saturating at `u64::MAX`.
pub(crate) fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
