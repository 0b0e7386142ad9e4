//! Remaining-time helpers for the session-expiry dialog.

use std::time::Duration;

/// Renders a remaining duration as `m:ss`, rounding down to the second.
pub fn format_countdown(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Whole minutes contained in `duration`.
pub fn whole_minutes(duration: Duration) -> u64 {
    duration.as_secs() / 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(Duration::from_millis(120_000)), "2:00");
        assert_eq!(format_countdown(Duration::from_millis(65_999)), "1:05");
        assert_eq!(format_countdown(Duration::from_millis(999)), "0:00");
        assert_eq!(format_countdown(Duration::from_secs(600)), "10:00");
    }

    #[test]
    fn test_whole_minutes_rounds_down() {
        assert_eq!(whole_minutes(Duration::from_millis(120_000)), 2);
        assert_eq!(whole_minutes(Duration::from_millis(119_999)), 1);
        assert_eq!(whole_minutes(Duration::from_millis(400)), 0);
    }
}
