//! Race progress estimate.
//!
//! There is no lap feed behind this: progress is wall-clock time since the
//! scheduled start divided by an assumed two-hour race. The elapsed string
//! is derived back from that percentage, so it is a display approximation
//! with minute resolution, not a measured clock.

use chrono::{DateTime, Duration, Utc};

/// Assumed total race duration.
pub const ASSUMED_RACE_MINUTES: i64 = 120;

/// Percentage reported when no start time is known (treated as completed).
pub const UNKNOWN_PROGRESS: f64 = 100.0;

/// Display shown when there is no race metadata at all.
pub const UNKNOWN_ELAPSED: &str = "--:--:--";

/// Estimate race completion in percent, clamped to `[0, 100]`.
#[must_use]
pub fn estimate_progress(start: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(start) = start else {
        return UNKNOWN_PROGRESS;
    };

    let duration = Duration::minutes(ASSUMED_RACE_MINUTES);
    if now < start {
        return 0.0;
    }
    // An end past the representable range is treated as already reached.
    let Some(end) = start.checked_add_signed(duration) else {
        return 100.0;
    };
    if now >= end {
        return 100.0;
    }

    #[allow(clippy::cast_precision_loss)]
    let fraction = (now - start).num_milliseconds() as f64 / duration.num_milliseconds() as f64;
    (fraction * 100.0).clamp(0.0, 100.0)
}

/// Render a percentage as `HH:MM:00` of the assumed race duration.
#[must_use]
pub fn format_elapsed(percentage: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    let minutes = (percentage.clamp(0.0, 100.0) / 100.0 * ASSUMED_RACE_MINUTES as f64).floor() as i64;
    format!("{:02}:{:02}:00", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 23, 13, 0, 0).unwrap()
    }

    #[test]
    fn test_at_start_is_zero() {
        assert!((estimate_progress(Some(start()), start())).abs() < f64::EPSILON);
    }

    #[test]
    fn test_before_start_is_zero() {
        let now = start() - Duration::minutes(30);
        assert!((estimate_progress(Some(start()), now)).abs() < f64::EPSILON);
    }

    #[test]
    fn test_at_duration_is_complete() {
        let now = start() + Duration::hours(2);
        assert!((estimate_progress(Some(start()), now) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_after_duration_is_complete() {
        let now = start() + Duration::days(3);
        assert!((estimate_progress(Some(start()), now) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_linear_midpoint() {
        let now = start() + Duration::minutes(30);
        assert!((estimate_progress(Some(start()), now) - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_in_now() {
        let mut previous = -1.0;
        for minute in -10..=140 {
            let progress = estimate_progress(Some(start()), start() + Duration::minutes(minute));
            assert!(progress >= previous);
            assert!((0.0..=100.0).contains(&progress));
            previous = progress;
        }
    }

    #[test]
    fn test_start_near_max_date_is_complete() {
        let start = DateTime::<Utc>::MAX_UTC - Duration::minutes(30);
        let progress = estimate_progress(Some(start), DateTime::<Utc>::MAX_UTC);
        assert!((progress - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_start_is_unknown() {
        assert!((estimate_progress(None, start()) - UNKNOWN_PROGRESS).abs() < f64::EPSILON);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(0.0), "00:00:00");
        assert_eq!(format_elapsed(25.0), "00:30:00");
        assert_eq!(format_elapsed(60.7), "01:12:00");
        assert_eq!(format_elapsed(100.0), "02:00:00");
    }

    #[test]
    fn test_format_elapsed_clamps() {
        assert_eq!(format_elapsed(-5.0), "00:00:00");
        assert_eq!(format_elapsed(250.0), "02:00:00");
    }
}
