//! Data types for the notification store.
//!
//! Defines the toast items kept by the store and the events it publishes
//! to renderers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default time-to-live of a notification.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

/// Opaque notification identifier. Never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub u64);

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n-{}", self.0)
    }
}

/// Severity of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

/// A single transient message.
///
/// Items are immutable once created: the store only ever inserts or
/// removes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: NotificationId,

    pub kind: NotificationKind,

    /// Short label rendered above the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub message: String,

    /// Time-to-live from `created_at`, in milliseconds.
    pub duration_ms: u64,

    pub created_at: DateTime<Utc>,
}

impl NotificationItem {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Instant at which the store drops this item.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.created_at
            .checked_add_signed(crate::scheduler::to_chrono(self.duration()))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at() - now).to_std().unwrap_or(Duration::ZERO)
    }

    /// Fraction of the lifetime still left, in `[0, 1]`.
    ///
    /// Drives the shrinking progress bar under a toast.
    pub fn progress(&self, now: DateTime<Utc>) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        let left = self.remaining(now).as_millis() as f64;
        (left / self.duration_ms as f64).clamp(0.0, 1.0)
    }
}

/// Why an item left the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    Dismissed,
    Expired,
}

/// Change published to store subscribers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum NotificationEvent {
    Added(NotificationItem),
    Removed {
        id: NotificationId,
        reason: RemovalReason,
    },
    Cleared,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(duration_ms: u64) -> NotificationItem {
        NotificationItem {
            id: NotificationId(7),
            kind: NotificationKind::Success,
            title: Some("Success".to_string()),
            message: "Saved".to_string(),
            duration_ms,
            created_at: Utc.timestamp_opt(1_000, 0).unwrap(),
        }
    }

    #[test]
    fn test_expires_at_adds_duration() {
        let n = item(5000);
        assert_eq!((n.expires_at() - n.created_at).num_milliseconds(), 5000);
    }

    #[test]
    fn test_expires_at_saturates_for_huge_durations() {
        let n = item(u64::MAX);
        assert_eq!(n.expires_at(), DateTime::<Utc>::MAX_UTC);
        assert!(n.remaining(n.created_at) > Duration::ZERO);
    }

    #[test]
    fn test_progress_shrinks_and_clamps() {
        let n = item(4000);
        assert_eq!(n.progress(n.created_at), 1.0);

        let quarter = n.created_at + chrono::Duration::milliseconds(1000);
        assert!((n.progress(quarter) - 0.75).abs() < 1e-9);

        let late = n.created_at + chrono::Duration::milliseconds(9000);
        assert_eq!(n.progress(late), 0.0);
        assert_eq!(n.remaining(late), Duration::ZERO);
    }

    #[test]
    fn test_serialization() {
        let mut n = item(5000);
        n.title = None;
        let json = serde_json::to_string(&n).unwrap();

        assert!(json.contains("\"kind\":\"success\""));
        assert!(json.contains("\"id\":7"));
        assert!(!json.contains("title"));
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = NotificationEvent::Removed {
            id: NotificationId(3),
            reason: RemovalReason::Expired,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "removed");
        assert_eq!(json["data"]["reason"], "expired");
    }
}
