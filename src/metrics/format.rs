// src/metrics/format.rs
//! Clock-style formatting for elapsed time and pace

/// Shown while no pace can be computed yet
pub const PACE_PLACEHOLDER: &str = "--:--";

const MAX_PACE_MINUTES: u64 = 99;
const MAX_PACE_SECONDS: u64 = 59;

/// Format a duration as `H:MM:SS`, or `MM:SS` when under an hour.
///
/// Fractional seconds are truncated. Negative or NaN input formats as zero.
pub fn format_time(seconds: f64) -> String {
    let total_seconds = seconds.max(0.0).floor() as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Format a pace in seconds per mile as `MM:SS`.
///
/// Paces of 100 minutes or more are capped to `99:59`; a pace that is not a
/// positive finite number renders as [`PACE_PLACEHOLDER`].
pub fn format_pace(seconds_per_mile: f64) -> String {
    if !seconds_per_mile.is_finite() || seconds_per_mile <= 0.0 {
        return PACE_PLACEHOLDER.to_string();
    }

    let total_seconds = seconds_per_mile.floor() as u64;
    let (minutes, secs) = if total_seconds / 60 > MAX_PACE_MINUTES {
        (MAX_PACE_MINUTES, MAX_PACE_SECONDS)
    } else {
        (total_seconds / 60, (total_seconds % 60).min(MAX_PACE_SECONDS))
    };

    format!("{:02}:{:02}", minutes, secs)
}

pub fn format_pace_opt(seconds_per_mile: Option<f64>) -> String {
    seconds_per_mile.map_or_else(|| PACE_PLACEHOLDER.to_string(), format_pace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_time_minutes_only() {
        assert_eq!(format_time(0.0), "00:00");
        assert_eq!(format_time(65.0), "01:05");
        assert_eq!(format_time(3599.0), "59:59");
    }

    #[test]
    fn test_format_time_with_hours() {
        assert_eq!(format_time(3600.0), "1:00:00");
        assert_eq!(format_time(3661.0), "1:01:01");
        assert_eq!(format_time(36_000.0 * 3.0), "30:00:00");
    }

    #[test]
    fn test_format_time_truncates() {
        assert_eq!(format_time(59.999), "00:59");
        assert_eq!(format_time(-5.0), "00:00");
        assert_eq!(format_time(f64::NAN), "00:00");
    }

    #[test]
    fn test_format_pace() {
        assert_eq!(format_pace(480.0), "08:00");
        assert_eq!(format_pace(437.9), "07:17");
        assert_eq!(format_pace(5999.0), "99:59");
    }

    #[test]
    fn test_format_pace_caps_absurd_values() {
        assert_eq!(format_pace(6000.0), "99:59");
        assert_eq!(format_pace(1.0e9), "99:59");
    }

    #[test]
    fn test_format_pace_placeholder() {
        assert_eq!(format_pace(0.0), PACE_PLACEHOLDER);
        assert_eq!(format_pace(f64::INFINITY), PACE_PLACEHOLDER);
        assert_eq!(format_pace(f64::NAN), PACE_PLACEHOLDER);
        assert_eq!(format_pace_opt(None), "--:--");
        assert_eq!(format_pace_opt(Some(65.0)), "01:05");
    }
}
