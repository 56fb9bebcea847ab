//! Walther viscosity-temperature correlation.
//!
//! The transform `x = log10(log10(v + 0.7))` linearizes both the temperature
//! dependence (against `log10(T[K])`) and ideal blending (fraction-weighted
//! sum of component `x` values).

use crate::error::{WaltherError, WaltherResult};
use std::fmt;
use vb_core::units::{KELVIN_OFFSET, KinVisc, Temperature, cst, to_celsius, to_cst};

/// Additive constant inside the double logarithm.
pub const WALTHER_OFFSET: f64 = 0.7;

/// Log-temperatures closer than this are treated as the same point.
const DEGENERATE_SPAN: f64 = 1e-12;

/// Walther coordinate of a kinematic viscosity [mm²/s].
///
/// Returns NaN (or -inf at exactly 0.3 mm²/s) outside the domain; `v <= 0`
/// always yields NaN.
pub fn walther_x(viscosity: f64) -> f64 {
    (viscosity + WALTHER_OFFSET).log10().log10()
}

/// Kinematic viscosity [mm²/s] for a Walther coordinate. Total.
pub fn inverse_walther_x(x: f64) -> f64 {
    10f64.powf(10f64.powf(x)) - WALTHER_OFFSET
}

/// Checked [`walther_x`]: rejects non-positive viscosities and non-finite results.
pub fn try_walther_x(viscosity: f64) -> WaltherResult<f64> {
    if viscosity.is_nan() || viscosity <= 0.0 {
        return Err(WaltherError::NonPositiveViscosity);
    }
    let x = walther_x(viscosity);
    if !x.is_finite() {
        return Err(WaltherError::NonPhysical {
            what: "Walther coordinate",
        });
    }
    Ok(x)
}

/// `log10` of the absolute temperature for a Celsius reading.
pub fn log_temperature(temp_c: f64) -> f64 {
    (temp_c + KELVIN_OFFSET).log10()
}

/// Linear model `x = intercept - slope * log10(T + 273.15)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaltherLine {
    pub slope: f64,
    pub intercept: f64,
}

impl WaltherLine {
    pub fn new(slope: f64, intercept: f64) -> Self {
        Self { slope, intercept }
    }

    /// Line through two (temperature °C, viscosity mm²/s) points.
    ///
    /// Coincident temperatures give a flat line at the first point's `x`.
    pub fn from_points(v1: f64, t1: f64, v2: f64, t2: f64) -> Self {
        let x1 = walther_x(v1);
        let x2 = walther_x(v2);
        let y1 = log_temperature(t1);
        let y2 = log_temperature(t2);

        if (y2 - y1).abs() < DEGENERATE_SPAN {
            return Self {
                slope: 0.0,
                intercept: x1,
            };
        }

        let slope = (x1 - x2) / (y2 - y1);
        let intercept = x1 + slope * y1;
        Self { slope, intercept }
    }

    /// Checked [`WaltherLine::from_points`].
    ///
    /// Both viscosities must be positive and both temperatures above absolute zero.
    pub fn try_from_points(v1: f64, t1: f64, v2: f64, t2: f64) -> WaltherResult<Self> {
        try_walther_x(v1)?;
        try_walther_x(v2)?;
        for t in [t1, t2] {
            if !t.is_finite() || t <= -KELVIN_OFFSET {
                return Err(WaltherError::InvalidArg {
                    what: "temperature must be above absolute zero",
                });
            }
        }
        Ok(Self::from_points(v1, t1, v2, t2))
    }

    /// Walther coordinate at `temp_c`.
    pub fn x_at(&self, temp_c: f64) -> f64 {
        self.intercept - self.slope * log_temperature(temp_c)
    }

    /// Kinematic viscosity [mm²/s] at `temp_c`.
    pub fn viscosity_at(&self, temp_c: f64) -> f64 {
        inverse_walther_x(self.x_at(temp_c))
    }

    /// Typed variant of [`WaltherLine::viscosity_at`].
    pub fn kinematic_viscosity(&self, temperature: Temperature) -> KinVisc {
        cst(self.viscosity_at(to_celsius(temperature)))
    }

    /// Typed variant of [`WaltherLine::from_points`] with validation.
    pub fn from_quantities(
        v1: KinVisc,
        t1: Temperature,
        v2: KinVisc,
        t2: Temperature,
    ) -> WaltherResult<Self> {
        Self::try_from_points(to_cst(v1), to_celsius(t1), to_cst(v2), to_celsius(t2))
    }
}

impl fmt::Display for WaltherLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "KV(T) = 10^(10^({:.4} - {:.4} * log10(T + 273.15))) - 0.7",
            self.intercept, self.slope
        )
    }
}

/// Two-point Walther parameters.
pub fn walther_params(v1: f64, t1: f64, v2: f64, t2: f64) -> WaltherLine {
    WaltherLine::from_points(v1, t1, v2, t2)
}

/// Evaluate a Walther model at `temp_c`.
pub fn viscosity_at_temperature(slope: f64, intercept: f64, temp_c: f64) -> f64 {
    WaltherLine::new(slope, intercept).viscosity_at(temp_c)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn roundtrip_any_positive_viscosity(v in 0.31_f64..50_000.0_f64) {
            let back = inverse_walther_x(walther_x(v));
            prop_assert!((back - v).abs() <= 1e-8 * v.max(1.0));
        }

        #[test]
        fn transform_is_monotonic(a in 0.31_f64..5_000.0_f64, b in 0.31_f64..5_000.0_f64) {
            prop_assume!(a < b);
            prop_assert!(walther_x(a) < walther_x(b));
        }
    }
}
