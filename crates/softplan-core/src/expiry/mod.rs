//! Expiry evaluation and countdown formatting.
//!
//! "Now" is never cached: callers pass the current instant on every call,
//! usually read from a [`Clock`](softplan_db::clock::Clock).

pub mod timer;

use chrono::{DateTime, Duration, Utc};

pub use timer::ExpiryTimer;

/// Label shown in place of a countdown once the instant has passed.
pub const EXPIRED_LABEL: &str = "Expired";

/// Result of comparing an expiry instant against "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryState {
    /// Still open, with strictly positive time remaining.
    Active { remaining: Duration },
    Expired,
}

impl ExpiryState {
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }
}

/// Classify `expires_at` relative to `now`. Zero remaining counts as expired.
pub fn evaluate(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> ExpiryState {
    let remaining = expires_at - now;
    if remaining <= Duration::zero() {
        ExpiryState::Expired
    } else {
        ExpiryState::Active { remaining }
    }
}

/// Render a positive remaining duration.
///
/// More than 24 whole hours shows whole days (`2d`), otherwise hours and
/// minutes (`1h 30m`), otherwise minutes alone (`0m`). Every unit is
/// truncated, never rounded.
pub fn format_countdown(remaining: Duration) -> String {
    let hours = remaining.num_hours();
    let minutes = remaining.num_minutes() % 60;
    if hours > 24 {
        format!("{}d", hours / 24)
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Countdown for display, or [`EXPIRED_LABEL`].
pub fn countdown_label(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    match evaluate(expires_at, now) {
        ExpiryState::Active { remaining } => format_countdown(remaining),
        ExpiryState::Expired => EXPIRED_LABEL.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-06-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn ninety_minutes_shows_hours_and_minutes() {
        let now = now();
        assert_eq!(countdown_label(now + Duration::minutes(90), now), "1h 30m");
    }

    #[test]
    fn seconds_truncate_to_zero_minutes() {
        let now = now();
        assert_eq!(countdown_label(now + Duration::seconds(45), now), "0m");
        assert_eq!(countdown_label(now + Duration::seconds(59), now), "0m");
    }

    #[test]
    fn past_or_equal_is_expired() {
        let now = now();
        assert!(evaluate(now - Duration::seconds(1), now).is_expired());
        assert!(evaluate(now, now).is_expired());
        assert_eq!(countdown_label(now, now), EXPIRED_LABEL);
    }

    #[test]
    fn long_countdowns_show_whole_days() {
        assert_eq!(format_countdown(Duration::hours(24)), "24h 0m");
        assert_eq!(format_countdown(Duration::hours(24) + Duration::minutes(30)), "24h 30m");
        assert_eq!(format_countdown(Duration::hours(25)), "1d");
        assert_eq!(format_countdown(Duration::hours(72) + Duration::minutes(30)), "3d");
        assert_eq!(format_countdown(Duration::hours(71)), "2d");
    }

    #[test]
    fn active_state_carries_remaining() {
        let now = now();
        assert_eq!(
            evaluate(now + Duration::minutes(5), now),
            ExpiryState::Active {
                remaining: Duration::minutes(5)
            }
        );
    }
}
