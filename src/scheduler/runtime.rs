//! Scheduler backed by tokio timers.

use super::{Scheduler, Task, TimerToken};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::AbortHandle;

type PendingTasks = Arc<Mutex<HashMap<u64, AbortHandle>>>;

/// Runs scheduled tasks as tokio tasks on the given runtime.
///
/// A task removes its own entry before running, so a token is either
/// pending (and abortable) or gone.
pub struct RuntimeScheduler {
    handle: Handle,
    next_token: AtomicU64,
    pending: PendingTasks,
}

impl RuntimeScheduler {
    /// Creates a scheduler that spawns onto `handle`.
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            next_token: AtomicU64::new(0),
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates a scheduler on the runtime of the calling context.
    ///
    /// Returns `None` outside a tokio runtime.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    /// Number of tasks that have not fired or been cancelled yet.
    pub fn pending(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }
}

impl Scheduler for RuntimeScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) -> TimerToken {
        let id = self.next_token.fetch_add(1, Ordering::Relaxed);
        let pending = Arc::clone(&self.pending);

        // Held across spawn so the task cannot look itself up before it is registered.
        let mut guard = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;

            let still_pending = pending
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&id)
                .is_some();
            if still_pending {
                task();
            }
        });
        guard.insert(id, join.abort_handle());

        TimerToken(id)
    }

    fn cancel(&self, token: TimerToken) {
        let handle = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&token.0);

        if let Some(handle) = handle {
            handle.abort();
            tracing::trace!(%token, "Cancelled scheduled task");
        }
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
