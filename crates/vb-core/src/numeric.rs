use crate::VbError;

/// Floating point type used throughout system
pub type Real = f64;

/// `Err(NonFinite)` unless `v` is finite.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, VbError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(VbError::NonFinite { what, value: v })
    }
}

/// Round to `decimals` places with ties going toward +infinity.
///
/// `floor(v * 10^d + 0.5) / 10^d`. `f64::round` sends negative ties the other way.
pub fn round_half_up(v: Real, decimals: u32) -> Real {
    let scale = 10f64.powi(decimals as i32);
    (v * scale + 0.5).floor() / scale
}

/// Convert a fraction of 1 into a percentage rounded to two decimals.
pub fn percent_2dp(fraction: Real) -> Real {
    (fraction * 10_000.0 + 0.5).floor() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn half_up_rounding_ties() {
        assert_eq!(round_half_up(2.5, 0), 3.0);
        assert_eq!(round_half_up(-2.5, 0), -2.0);
        assert_eq!(round_half_up(95.25, 1), 95.3);
        assert_eq!(round_half_up(-0.25, 1), -0.2);
    }

    #[test]
    fn percent_rounding() {
        assert_eq!(percent_2dp(0.5), 50.0);
        assert_eq!(percent_2dp(1.0 / 3.0), 33.33);
        assert_eq!(percent_2dp(2.0 / 3.0), 66.67);
    }
}
