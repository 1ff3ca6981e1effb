//! Float literal formatting
//!
//! GLSL ES rejects float literals without a decimal point, so integer
//! values need an explicit `.0`. Rust's `Display` for `f64` already prints
//! the shortest round-trip decimal and never switches to exponent notation.

use carve_scene::SENTINEL_DISTANCE;

/// Largest magnitude a GLSL ES `highp float` is guaranteed to hold (2^62)
pub const HIGHP_MAX: f64 = 4_611_686_018_427_387_904.0;

/// Render `value` as a GLSL float literal.
///
/// NaN becomes `0.0`. Infinities and finite values beyond [`HIGHP_MAX`]
/// become the signed sentinel distance, since GLSL has no literal for
/// either.
#[allow(clippy::float_cmp)]
pub fn float_literal(value: f64) -> String {
    if value.is_nan() {
        return "0.0".to_string();
    }
    if value.abs() > HIGHP_MAX {
        return float_literal(SENTINEL_DISTANCE.copysign(value));
    }

    if value.trunc() == value {
        format!("{}.0", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_get_fraction() {
        assert_eq!(float_literal(4.0), "4.0");
        assert_eq!(float_literal(0.0), "0.0");
        assert_eq!(float_literal(-3.0), "-3.0");
        assert_eq!(float_literal(1000.0), "1000.0");
    }

    #[test]
    fn test_fractions_use_shortest_form() {
        assert_eq!(float_literal(1.5), "1.5");
        assert_eq!(float_literal(0.1), "0.1");
        assert_eq!(float_literal(-0.25), "-0.25");
        assert_eq!(float_literal(1.0 / 3.0), "0.3333333333333333");
    }

    #[test]
    fn test_negative_zero() {
        assert_eq!(float_literal(-0.0), "-0.0");
    }

    #[test]
    fn test_extreme_magnitudes_stay_decimal() {
        let tiny = float_literal(1e-7);
        assert_eq!(tiny, "0.0000001");

        let big = float_literal(1e18);
        assert_eq!(big, "1000000000000000000.0");
        assert!(!big.contains('e'));
        assert_eq!(float_literal(HIGHP_MAX), "4611686018427387904.0");
    }

    #[test]
    fn test_out_of_highp_range_becomes_sentinel() {
        assert_eq!(float_literal(1e21), "1000.0");
        assert_eq!(float_literal(1e300), "1000.0");
        assert_eq!(float_literal(-1e300), "-1000.0");
        assert_eq!(float_literal(f64::MAX), "1000.0");
    }

    #[test]
    fn test_non_finite() {
        assert_eq!(float_literal(f64::NAN), "0.0");
        assert_eq!(float_literal(f64::INFINITY), "1000.0");
        assert_eq!(float_literal(f64::NEG_INFINITY), "-1000.0");
    }
}
