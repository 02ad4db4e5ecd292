//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Limit the magnitude of `value` to `cap`, preserving its sign.
///
/// No check is made on `cap`, a negative cap gives `cap * signum(value)` for
/// every value larger in magnitude than it.
pub fn abs_cap<T>(value: T, cap: T) -> T
where
    T: Float
{
    if value.abs() > cap {
        cap * value.signum()
    }
    else {
        value
    }
}

/// Bring an angle difference into the range (-pi, pi] with at most one
/// correction of 2pi.
///
/// Differences more than one full turn away are not brought fully into range,
/// the callers only deal with goals less than a turn from the current
/// bearing.
pub fn wrap_pi_once<T>(delta: T) -> T
where
    T: Float
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let tau_t: T = pi_t + pi_t;

    if delta > pi_t {
        delta - tau_t
    }
    else if delta <= -pi_t {
        delta + tau_t
    }
    else {
        delta
    }
}

/// Map a value from one range into another.
pub fn lin_map<T>(source_range: (T, T), target_range: (T, T), value: T) -> T
where
    T: Float
{
    target_range.0
        + ((value - source_range.0)
        * (target_range.1 - target_range.0)
        / (source_range.1 - source_range.0))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_abs_cap() {
        assert_eq!(abs_cap(5f64, 3f64), 3f64);
        assert_eq!(abs_cap(-5f64, 3f64), -3f64);
        assert_eq!(abs_cap(2f64, 3f64), 2f64);
        assert_eq!(abs_cap(-2f64, 3f64), -2f64);
        assert_eq!(abs_cap(0f64, 3f64), 0f64);
    }

    #[test]
    fn test_wrap_pi_once() {
        assert!((wrap_pi_once(3.5f64) - (3.5 - 2.0 * PI)).abs() < 1e-12);
        assert!((wrap_pi_once(3.5f64) + 2.7832).abs() < 1e-4);
        assert!((wrap_pi_once(-3.5f64) - (2.0 * PI - 3.5)).abs() < 1e-12);
        assert_eq!(wrap_pi_once(1f64), 1f64);
        assert_eq!(wrap_pi_once(PI), PI);
        assert!((wrap_pi_once(-PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn test_wrap_pi_once_single_correction() {
        // Three and a half turns out only gets one correction
        let d = 3.0 * PI;
        assert!((wrap_pi_once(d) - PI).abs() < 1e-12);
        let d = 4.0 * PI;
        assert!((wrap_pi_once(d) - 2.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_lin_map() {
        assert_eq!(lin_map((0f64, 10f64), (0f64, 100f64), 5f64), 50f64);
        assert_eq!(lin_map((-1f64, 1f64), (0f64, 1f64), 0f64), 0.5f64);
    }
}
