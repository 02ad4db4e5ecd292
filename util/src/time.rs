//! General time utility functions

use chrono;
use std::time::Duration;

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    if let Some(ns) = duration.num_nanoseconds() {
        Some(ns as f64 / NANOS_PER_SECOND as f64)
    }
    else {
        None
    }
}

/// Build a `Duration` from a millisecond count held as a float, as used in
/// parameter files and scripts.
///
/// Negative and non-finite values give a zero duration.
pub fn millis_f64(millis: f64) -> Duration {
    if millis.is_finite() && millis > 0.0 {
        Duration::from_nanos((millis * 1e6).round() as u64)
    }
    else {
        Duration::from_secs(0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_duration_to_seconds() {
        assert_eq!(
            duration_to_seconds(chrono::Duration::milliseconds(1500)), 
            Some(1.5)
        );
    }

    #[test]
    fn test_millis_f64() {
        assert_eq!(millis_f64(20.0), Duration::from_millis(20));
        assert_eq!(millis_f64(-5.0), Duration::from_secs(0));
        assert_eq!(millis_f64(std::f64::NAN), Duration::from_secs(0));
    }
}
