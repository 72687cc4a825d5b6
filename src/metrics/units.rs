// src/metrics/units.rs
//! Distance conversions and pace

/// International mile. Used for both pace computation and display.
pub const METERS_PER_MILE: f64 = 1609.344;

pub fn meters_to_miles(meters: f64) -> f64 {
    meters / METERS_PER_MILE
}

pub fn meters_to_km(meters: f64) -> f64 {
    meters / 1000.0
}

/// Seconds per mile, or `None` until both elapsed time and distance are positive
pub fn pace_seconds_per_mile(elapsed_seconds: f64, distance_meters: f64) -> Option<f64> {
    if elapsed_seconds > 0.0 && distance_meters > 0.0 {
        let pace = elapsed_seconds / meters_to_miles(distance_meters);
        pace.is_finite().then_some(pace)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mile_conversion() {
        assert!((meters_to_miles(1609.344) - 1.0).abs() < 1e-12);
        assert_eq!(meters_to_km(2500.0), 2.5);
    }

    #[test]
    fn test_pace() {
        let pace = pace_seconds_per_mile(480.0, METERS_PER_MILE).unwrap();
        assert!((pace - 480.0).abs() < 1e-9);
    }

    #[test]
    fn test_pace_requires_positive_inputs() {
        assert_eq!(pace_seconds_per_mile(0.0, 100.0), None);
        assert_eq!(pace_seconds_per_mile(10.0, 0.0), None);
        assert_eq!(pace_seconds_per_mile(f64::NAN, 100.0), None);
    }
}
