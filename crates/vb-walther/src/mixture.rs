//! Ideal blending in Walther space.

use crate::error::{WaltherError, WaltherResult};
use crate::walther::{inverse_walther_x, try_walther_x};
use vb_core::VbError;

/// Two bases whose Walther coordinates differ by less than this cannot be split.
const SINGULAR_SPAN: f64 = 1e-12;

/// Slack allowed on the two-base solution before it is called infeasible.
const SPLIT_TOLERANCE: f64 = 1e-6;

/// Blend viscosity from component viscosities [mm²/s] and fractions of 1.
///
/// NaN when the slices differ in length, are empty, or any viscosity is outside
/// the Walther domain.
pub fn mixture_viscosity(viscosities: &[f64], fractions: &[f64]) -> f64 {
    try_mixture_viscosity(viscosities, fractions).unwrap_or(f64::NAN)
}

/// Checked [`mixture_viscosity`].
pub fn try_mixture_viscosity(viscosities: &[f64], fractions: &[f64]) -> WaltherResult<f64> {
    if viscosities.len() != fractions.len() {
        return Err(VbError::LengthMismatch {
            what: "viscosities and fractions",
            left: viscosities.len(),
            right: fractions.len(),
        }
        .into());
    }
    if viscosities.is_empty() {
        return Err(WaltherError::InvalidArg {
            what: "mixture needs at least one component",
        });
    }

    let mut x_mix = 0.0;
    for (&v, &f) in viscosities.iter().zip(fractions) {
        x_mix += f * try_walther_x(v)?;
    }
    Ok(inverse_walther_x(x_mix))
}

/// A component whose share of a two-base blend is already decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KnownComponent {
    /// Share of the blend in percent.
    pub percent: f64,
    /// Kinematic viscosity [mm²/s].
    pub viscosity: f64,
}

/// Shares of base A and base B, in percent of the whole blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoBaseSplit {
    pub percent_a: f64,
    pub percent_b: f64,
}

/// Split the mass left over by `known` between two bases so the blend hits
/// `target` [mm²/s].
pub fn solve_two_bases(
    target: f64,
    base_a: f64,
    base_b: f64,
    known: &[KnownComponent],
) -> WaltherResult<TwoBaseSplit> {
    if !(target > 0.0 && base_a > 0.0 && base_b > 0.0) {
        return Err(WaltherError::NonPositiveViscosity);
    }

    let mut sum_known = 0.0;
    let mut x_known = 0.0;
    for comp in known {
        let x = try_walther_x(comp.viscosity)?;
        if !(0.0..=100.0).contains(&comp.percent) {
            return Err(WaltherError::InvalidArg {
                what: "known component percent must be between 0 and 100",
            });
        }
        let fraction = comp.percent / 100.0;
        sum_known += fraction;
        x_known += fraction * x;
    }

    if sum_known >= 1.0 {
        return Err(WaltherError::KnownSumTooLarge);
    }

    let x_target = try_walther_x(target)?;
    let x_a = try_walther_x(base_a)?;
    let x_b = try_walther_x(base_b)?;
    let remaining = 1.0 - sum_known;

    let denominator = x_a - x_b;
    if denominator.abs() < SINGULAR_SPAN {
        return Err(WaltherError::IdenticalBases);
    }

    let mut p_a = (x_target - x_known - remaining * x_b) / denominator;
    let mut p_b = remaining - p_a;

    if p_a < -SPLIT_TOLERANCE || p_b < -SPLIT_TOLERANCE {
        return Err(WaltherError::TargetUnreachable);
    }
    p_a = p_a.max(0.0);
    p_b = p_b.max(0.0);
    if p_a + p_b > remaining + SPLIT_TOLERANCE {
        return Err(WaltherError::TargetUnreachable);
    }

    Ok(TwoBaseSplit {
        percent_a: p_a * 100.0,
        percent_b: p_b * 100.0,
    })
}
