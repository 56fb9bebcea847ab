//! vb-walther: viscosity-temperature correlations for viscoblend.
//!
//! Provides:
//! - Walther transform `x = log10(log10(v + 0.7))` and its inverse
//! - Two-point Walther lines and least-squares fits
//! - Viscosity index (ASTM D2270 coefficients)
//! - Ideal mixture viscosity and the two-base target blend
//! - Temperature extrapolation tables for charting collaborators
//!
//! # Conventions
//!
//! Viscosities are kinematic, in mm²/s (cSt). Temperatures are in °C at the
//! numeric API; the typed helpers on [`WaltherLine`] accept uom quantities.
//! Plain functions mirror the calculator semantics and return NaN on domain
//! violations; every `try_*` variant reports a [`WaltherError`] instead.
//!
//! # Example
//!
//! ```
//! use vb_walther::{walther_params, viscosity_index};
//!
//! let line = walther_params(46.0, 40.0, 6.8, 100.0);
//! let kv40 = line.viscosity_at(40.0);
//! assert!((kv40 - 46.0).abs() < 1e-9);
//! let vi = viscosity_index(46.0, 6.8);
//! assert!(vi > 90.0 && vi < 110.0);
//! ```

pub mod error;
pub mod extrapolation;
pub mod index;
pub mod mixture;
pub mod regression;
pub mod walther;

// Re-exports for ergonomics
pub use error::{WaltherError, WaltherResult};
pub use extrapolation::{
    Extrapolation, PropertyExtrapolation, TemperatureSweep, extrapolate_property,
    extrapolate_viscosity, thermal_expansion_coefficient,
};
pub use index::{
    ViscosityIndexReport, try_viscosity_index, viscosity_index, viscosity_index_from_points,
};
pub use mixture::{
    KnownComponent, TwoBaseSplit, mixture_viscosity, solve_two_bases, try_mixture_viscosity,
};
pub use regression::{
    LinearFit, PropertyPoint, ViscosityPoint, linear_regression, walther_regression,
};
pub use walther::{
    WALTHER_OFFSET, WaltherLine, inverse_walther_x, log_temperature, try_walther_x,
    viscosity_at_temperature, walther_params, walther_x,
};
