//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Clamp a value between the given minimum and maximum.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float + std::ops::Rem
{
    let r = lhs % rhs;
    if r < T::from(0.0).unwrap() { r + rhs.abs() } else { r }
}

/// Wrap an angle into the range [-pi, pi).
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float
{
    let pi_t: T = T::from(std::f64::consts::PI).unwrap();
    let tau_t: T = T::from(std::f64::consts::TAU).unwrap();

    rem_euclid(angle + pi_t, tau_t) - pi_t
}

/// Get the signed angular distance from `a` to `b`.
///
/// The distance is the shortest arc between the two angles accounting for
/// wrapping, positive in the anticlockwise (right hand rule about Z) sense.
pub fn get_ang_dist_pi<T>(a: T, b: T) -> T
where
    T: Float
{
    wrap_pi(b - a)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    const PI: f64 = std::f64::consts::PI;
    const TAU: f64 = std::f64::consts::TAU;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(&0.5f64, &0.0, &1.0), 0.5);
        assert_eq!(clamp(&-0.5f64, &0.0, &1.0), 0.0);
        assert_eq!(clamp(&1.5f64, &0.0, &1.0), 1.0);
    }

    #[test]
    fn test_wrap_pi() {
        assert_close(wrap_pi(0f64), 0f64);
        assert_close(wrap_pi(PI / 2f64), PI / 2f64);
        assert_close(wrap_pi(3f64 * PI / 2f64), -PI / 2f64);
        assert_close(wrap_pi(-3f64 * PI / 2f64), PI / 2f64);
        assert_close(wrap_pi(TAU), 0f64);
        // The +pi boundary wraps to -pi
        assert_close(wrap_pi(PI), -PI);
    }

    #[test]
    fn test_get_ang_dist_pi() {
        assert_close(get_ang_dist_pi(1f64, 2f64), 1f64);
        assert_close(get_ang_dist_pi(2f64, 1f64), -1f64);
        assert_close(get_ang_dist_pi(0f64, TAU), 0f64);
        assert_close(get_ang_dist_pi(TAU, 0f64), 0f64);
        // Shortest arc crosses the wrap point
        assert_close(get_ang_dist_pi(0.5f64, TAU - 0.5f64), -1f64);
        assert_close(get_ang_dist_pi(TAU - 0.5f64, 0.5f64), 1f64);
    }
}
