//! Correlation errors.

use thiserror::Error;
use vb_core::VbError;

/// Result type for correlation operations.
pub type WaltherResult<T> = Result<T, WaltherError>;

/// Errors that can occur while evaluating correlations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WaltherError {
    /// Viscosity outside the Walther domain (zero, negative, non-finite).
    #[error("Viscosities must be positive")]
    NonPositiveViscosity,

    /// Non-physical result (NaN index, non-finite extrapolation).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Not enough usable points for a fit, or the fit is degenerate.
    #[error("Insufficient data: {what}")]
    InsufficientData { what: &'static str },

    #[error("Sum of known percentages must be less than 100")]
    KnownSumTooLarge,

    #[error("Base viscosities must be different")]
    IdenticalBases,

    #[error("Impossible to obtain this viscosity with these two bases")]
    TargetUnreachable,

    #[error(transparent)]
    Core(#[from] VbError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = WaltherError::NonPhysical {
            what: "viscosity index",
        };
        assert!(err.to_string().contains("viscosity index"));
        assert_eq!(
            WaltherError::IdenticalBases.to_string(),
            "Base viscosities must be different"
        );
    }

    #[test]
    fn core_error_is_transparent() {
        let core = VbError::NonFinite {
            what: "x",
            value: f64::NAN,
        };
        let err: WaltherError = core.clone().into();
        assert_eq!(err.to_string(), core.to_string());
    }
}
