//! Simulated-clock scheduler.
//!
//! Time only moves when [`ManualScheduler::advance`] is called. Due tasks run
//! in deadline order (ties in scheduling order) on the calling thread, with
//! the internal lock released so a task may schedule or cancel other tasks.

use super::{to_chrono, Scheduler, Task, TimerToken};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Default)]
struct ManualState {
    elapsed: Duration,
    next_token: u64,
    queue: BTreeMap<(Duration, u64), Task>,
    deadlines: HashMap<u64, Duration>,
}

/// Scheduler whose clock is advanced explicitly.
pub struct ManualScheduler {
    origin: DateTime<Utc>,
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    /// Creates a scheduler starting at the Unix epoch.
    pub fn new() -> Self {
        Self::starting_at(Utc.timestamp_opt(0, 0).single().unwrap_or_else(Utc::now))
    }

    /// Creates a scheduler whose clock starts at `origin`.
    pub fn starting_at(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            state: Mutex::new(ManualState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Time elapsed since the scheduler was created.
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    /// Number of tasks still waiting for their deadline.
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Moves the clock forward by `by`, running every task that falls due.
    pub fn advance(&self, by: Duration) {
        let target = self.elapsed().saturating_add(by);
        self.advance_to(target);
    }

    /// Moves the clock to `target` (measured from creation). Moving
    /// backwards is a no-op.
    pub fn advance_to(&self, target: Duration) {
        loop {
            let task = {
                let mut state = self.lock();
                let due = match state.queue.keys().next() {
                    Some(&key) if key.0 <= target => key,
                    _ => break,
                };
                state.deadlines.remove(&due.1);
                state.elapsed = state.elapsed.max(due.0);
                state.queue.remove(&due)
            };

            if let Some(task) = task {
                task();
            }
        }

        let mut state = self.lock();
        state.elapsed = state.elapsed.max(target);
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) -> TimerToken {
        let mut state = self.lock();
        let id = state.next_token;
        state.next_token += 1;

        let deadline = state.elapsed.saturating_add(delay);
        state.queue.insert((deadline, id), task);
        state.deadlines.insert(id, deadline);

        TimerToken(id)
    }

    fn cancel(&self, token: TimerToken) {
        let mut state = self.lock();
        if let Some(deadline) = state.deadlines.remove(&token.0) {
            state.queue.remove(&(deadline, token.0));
        }
    }

    fn now(&self) -> DateTime<Utc> {
        self.origin
            .checked_add_signed(to_chrono(self.elapsed()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
