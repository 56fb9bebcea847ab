//! Viscosity index from kinematic viscosities at 40 °C and 100 °C.
//!
//! Uses the ASTM D2270 reference-oil fits: `L` and `H` are polynomial
//! functions of the 100 °C viscosity `Y`, selected by band. Above VI 100 the
//! logarithmic high-VI formula applies. Below `Y = 2` the tables do not
//! extend, so both viscosities are extrapolated along their Walther line to
//! synthetic reference points instead.

use crate::error::{WaltherError, WaltherResult};
use crate::walther::{WaltherLine, inverse_walther_x, walther_x};
use vb_core::numeric::round_half_up;

/// Viscosity index, rounded to one decimal. NaN when either input is not positive.
///
/// `kv40` is the 40 °C viscosity (`U`), `kv100` the 100 °C viscosity (`Y`).
pub fn viscosity_index(kv40: f64, kv100: f64) -> f64 {
    let u = kv40;
    let y = kv100;
    if u <= 0.0 || y <= 0.0 || u.is_nan() || y.is_nan() {
        return f64::NAN;
    }

    if y < 2.0 {
        return low_viscosity_index(u, y);
    }

    let (a, b) = reference_coefficients(y);
    high_or_standard_index(a, b, u, y)
}

/// Checked [`viscosity_index`].
pub fn try_viscosity_index(kv40: f64, kv100: f64) -> WaltherResult<f64> {
    if !(kv40 > 0.0 && kv100 > 0.0) {
        return Err(WaltherError::NonPositiveViscosity);
    }
    let vi = viscosity_index(kv40, kv100);
    if !vi.is_finite() {
        return Err(WaltherError::NonPhysical {
            what: "viscosity index",
        });
    }
    Ok(vi)
}

fn low_viscosity_index(u: f64, y: f64) -> f64 {
    let log_u = walther_x(u);
    let log_y = walther_x(y);
    let span = log_u - log_y;
    let aj5 = inverse_walther_x(log_u + span * 0.04022);
    let aj6 = inverse_walther_x(log_u + span * 0.98316);

    let numerator = 1.2665 * aj6 * aj6 + 1.655 * aj6 - aj5;
    let denominator = 0.34984 * aj6 * aj6 + 0.1725 * aj6;
    if denominator == 0.0 {
        return f64::NAN;
    }
    round_half_up(100.0 * numerator / denominator, 1)
}

/// `(a, b)` for a 100 °C viscosity `y >= 2`, where `a + b = L` and `b = L - H`.
fn reference_coefficients(y: f64) -> (f64, f64) {
    if y < 4.0 {
        (
            0.827 * y * y + 1.632 * y - 0.181,
            0.3094 * y * y + 0.182 * y,
        )
    } else if y < 6.1 {
        (
            -2.6758 * y * y + 96.671 * y - 269.664 * y.powf(0.5) + 215.025,
            -7.1955 * y * y + 241.992 * y - 725.478 * y.powf(0.5) + 603.888,
        )
    } else if y < 7.2 {
        (
            2.32 * y.powf(1.5626),
            2.838 * y * y - 27.35 * y + 81.83,
        )
    } else if y < 12.4 {
        (
            0.1922 * y * y + 8.25 * y - 18.728,
            0.5463 * y * y + 2.442 * y - 14.16,
        )
    } else if y < 70.0 {
        (
            1795.2 / (y * y) + 0.1818 * y * y + 10.357 * y - 54.547,
            0.6995 * y * y - 1.19 * y + 7.6,
        )
    } else {
        let l = 0.835313 * y * y + 14.6731 * y - 216.246;
        let d = 0.666904 * y * y + 2.8238 * y - 119.298;
        (l - d, d)
    }
}

fn high_or_standard_index(a: f64, b: f64, u: f64, y: f64) -> f64 {
    let standard = 100.0 * (a + b - u) / b;
    if a <= 0.0 {
        return f64::NAN;
    }
    let n = (a.ln() - u.ln()) / y.ln();
    let high = (10f64.powf(n) - 1.0) / 0.00715 + 100.0;
    let vi = if standard > 100.0 { high } else { standard };
    round_half_up(vi, 1)
}

/// Result of a viscosity index estimate from two arbitrary temperatures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViscosityIndexReport {
    pub kv40: f64,
    pub kv100: f64,
    pub index: f64,
}

/// Fit a Walther line through two measurements, read it at 40 and 100 °C,
/// and compute the viscosity index.
pub fn viscosity_index_from_points(
    v1: f64,
    t1: f64,
    v2: f64,
    t2: f64,
) -> WaltherResult<ViscosityIndexReport> {
    let line = WaltherLine::try_from_points(v1, t1, v2, t2)?;
    let kv40 = line.viscosity_at(40.0);
    let kv100 = line.viscosity_at(100.0);
    if !kv40.is_finite() || !kv100.is_finite() {
        return Err(WaltherError::NonPhysical {
            what: "reference viscosity",
        });
    }
    let index = try_viscosity_index(kv40, kv100)?;
    Ok(ViscosityIndexReport {
        kv40,
        kv100,
        index,
    })
}
