//! Notification store holding the active toast stack.
//!
//! Items are kept newest-first. Every insertion schedules its own expiry on
//! the injected [`Scheduler`]; manual dismissal cancels that expiry. Removal
//! is idempotent, so an expiry racing a dismissal is harmless.

use super::types::{
    NotificationEvent, NotificationId, NotificationItem, NotificationKind, RemovalReason,
    DEFAULT_DURATION,
};
use crate::locale::Locale;
use crate::scheduler::{millis, Scheduler, TimerToken};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;
use tokio::sync::broadcast;

/// Capacity of the event channel. Slow subscribers miss older events.
const EVENT_CAPACITY: usize = 100;

#[derive(Debug, Default)]
struct StoreState {
    items: VecDeque<NotificationItem>,
    expiries: HashMap<NotificationId, TimerToken>,
}

struct StoreShared {
    state: RwLock<StoreState>,
    scheduler: Arc<dyn Scheduler>,
    next_id: AtomicU64,
    locale: Locale,
    default_duration: Duration,
    events: broadcast::Sender<NotificationEvent>,
}

impl StoreShared {
    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    fn remove(&self, id: NotificationId, reason: RemovalReason) -> bool {
        let (removed, token) = {
            let mut state = self.write();
            let before = state.items.len();
            state.items.retain(|n| n.id != id);
            (state.items.len() != before, state.expiries.remove(&id))
        };

        if reason == RemovalReason::Dismissed {
            if let Some(token) = token {
                self.scheduler.cancel(token);
            }
        }

        if removed {
            tracing::debug!(%id, ?reason, "Notification removed");
            let _ = self.events.send(NotificationEvent::Removed { id, reason });
        }
        removed
    }
}

/// Handle to the shared notification stack.
///
/// Cheap to clone; all clones see the same items.
#[derive(Clone)]
pub struct NotificationStore {
    shared: Arc<StoreShared>,
}

impl NotificationStore {
    /// Creates an empty store with English titles and the default duration.
    pub fn new(scheduler: Arc<dyn Scheduler>) -> Self {
        Self::with_options(scheduler, Locale::default(), DEFAULT_DURATION)
    }

    /// Creates an empty store.
    ///
    /// A zero `default_duration` falls back to [`DEFAULT_DURATION`].
    pub fn with_options(
        scheduler: Arc<dyn Scheduler>,
        locale: Locale,
        default_duration: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let default_duration = if default_duration.is_zero() {
            DEFAULT_DURATION
        } else {
            default_duration
        };

        Self {
            shared: Arc::new(StoreShared {
                state: RwLock::new(StoreState::default()),
                scheduler,
                next_id: AtomicU64::new(1),
                locale,
                default_duration,
                events,
            }),
        }
    }

    pub fn locale(&self) -> Locale {
        self.shared.locale
    }

    /// Adds a notification at the head of the stack and returns its id.
    ///
    /// `duration` defaults to the store's default when absent or zero.
    pub fn notify(
        &self,
        message: impl Into<String>,
        kind: NotificationKind,
        title: Option<String>,
        duration: Option<Duration>,
    ) -> NotificationId {
        let shared = &self.shared;
        let duration = duration
            .filter(|d| !d.is_zero())
            .unwrap_or(shared.default_duration);

        let id = NotificationId(shared.next_id.fetch_add(1, Ordering::Relaxed));
        let item = NotificationItem {
            id,
            kind,
            title,
            message: message.into(),
            duration_ms: millis(duration),
            created_at: shared.scheduler.now(),
        };

        {
            // Insert and arm the expiry under one lock so no reader sees an
            // item without its timer.
            let mut state = shared.write();
            let weak: Weak<StoreShared> = Arc::downgrade(&self.shared);
            let token = shared.scheduler.schedule_after(
                duration,
                Box::new(move || {
                    if let Some(shared) = weak.upgrade() {
                        shared.remove(id, RemovalReason::Expired);
                    }
                }),
            );
            state.expiries.insert(id, token);
            state.items.push_front(item.clone());
        }

        tracing::debug!(
            %id,
            kind = ?kind,
            duration_ms = item.duration_ms,
            "Notification added"
        );
        let _ = shared.events.send(NotificationEvent::Added(item));

        id
    }

    fn notify_with_default_title(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        title: Option<&str>,
        duration: Option<Duration>,
    ) -> NotificationId {
        let title = title.unwrap_or_else(|| self.shared.locale.default_title(kind));
        self.notify(message, kind, Some(title.to_string()), duration)
    }

    pub fn notify_success(
        &self,
        message: impl Into<String>,
        title: Option<&str>,
        duration: Option<Duration>,
    ) -> NotificationId {
        self.notify_with_default_title(NotificationKind::Success, message, title, duration)
    }

    pub fn notify_error(
        &self,
        message: impl Into<String>,
        title: Option<&str>,
        duration: Option<Duration>,
    ) -> NotificationId {
        self.notify_with_default_title(NotificationKind::Error, message, title, duration)
    }

    pub fn notify_warning(
        &self,
        message: impl Into<String>,
        title: Option<&str>,
        duration: Option<Duration>,
    ) -> NotificationId {
        self.notify_with_default_title(NotificationKind::Warning, message, title, duration)
    }

    pub fn notify_info(
        &self,
        message: impl Into<String>,
        title: Option<&str>,
        duration: Option<Duration>,
    ) -> NotificationId {
        self.notify_with_default_title(NotificationKind::Info, message, title, duration)
    }

    /// Removes an item and cancels its expiry.
    ///
    /// Returns whether anything was removed; unknown ids are a no-op.
    pub fn dismiss(&self, id: NotificationId) -> bool {
        self.shared.remove(id, RemovalReason::Dismissed)
    }

    /// Removes every item and cancels all pending expiries.
    pub fn clear(&self) {
        let tokens: Vec<TimerToken> = {
            let mut state = self.shared.write();
            state.items.clear();
            state.expiries.drain().map(|(_, token)| token).collect()
        };

        for token in tokens {
            self.shared.scheduler.cancel(token);
        }

        tracing::debug!("Notifications cleared");
        let _ = self.shared.events.send(NotificationEvent::Cleared);
    }

    /// Snapshot of the current items, newest first.
    pub fn list(&self) -> Vec<NotificationItem> {
        self.shared.read().items.iter().cloned().collect()
    }

    /// Looks up a single item.
    pub fn get(&self, id: NotificationId) -> Option<NotificationItem> {
        self.shared.read().items.iter().find(|n| n.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.shared.read().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribes to insertions and removals.
    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.shared.events.subscribe()
    }
}

impl Drop for StoreShared {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|e| e.into_inner());
        for (_, token) in state.expiries.drain() {
            self.scheduler.cancel(token);
        }
    }
}
