//! Qualifying user input.
//!
//! The host UI forwards raw input events by name; only the kinds listed
//! here count as activity and reset the idle budget.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of input that counts as user activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    PointerMove,
    KeyPress,
    TouchStart,
    Click,
}

impl ActivityKind {
    pub const ALL: [ActivityKind; 4] = [
        ActivityKind::PointerMove,
        ActivityKind::KeyPress,
        ActivityKind::TouchStart,
        ActivityKind::Click,
    ];

    /// Maps a DOM event name to an activity kind.
    ///
    /// Returns `None` for events that are not qualifying activity
    /// (scroll, focus, keyup, ...).
    pub fn from_event_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mousemove" | "pointermove" => Some(ActivityKind::PointerMove),
            "keydown" => Some(ActivityKind::KeyPress),
            "touchstart" => Some(ActivityKind::TouchStart),
            "click" => Some(ActivityKind::Click),
            _ => None,
        }
    }

    /// Canonical DOM event name the UI listens for.
    pub fn event_name(self) -> &'static str {
        match self {
            ActivityKind::PointerMove => "mousemove",
            ActivityKind::KeyPress => "keydown",
            ActivityKind::TouchStart => "touchstart",
            ActivityKind::Click => "click",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Error returned when parsing a non-qualifying event name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownActivity(pub String);

impl fmt::Display for UnknownActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a qualifying activity event", self.0)
    }
}

impl std::error::Error for UnknownActivity {}

impl FromStr for ActivityKind {
    type Err = UnknownActivity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_event_name(s).ok_or_else(|| UnknownActivity(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_event_names_round_trip() {
        for kind in ActivityKind::ALL {
            assert_eq!(ActivityKind::from_event_name(kind.event_name()), Some(kind));
        }
    }

    #[test]
    fn test_pointermove_and_case_are_accepted() {
        assert_eq!(
            ActivityKind::from_event_name("pointermove"),
            Some(ActivityKind::PointerMove)
        );
        assert_eq!("  Click ".parse::<ActivityKind>(), Ok(ActivityKind::Click));
    }

    #[test]
    fn test_other_events_do_not_qualify() {
        assert!(ActivityKind::from_event_name("scroll").is_none());
        assert!(ActivityKind::from_event_name("keyup").is_none());
        assert!("focus".parse::<ActivityKind>().is_err());
    }
}
