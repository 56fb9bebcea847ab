//! Error types for blend solving.

use thiserror::Error;

/// Errors reported by the complex-blend solver.
///
/// Component indices are zero-based; messages count from one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlendError {
    #[error("No components supplied")]
    NoComponents,

    #[error("Component {} viscosity must be positive", .index + 1)]
    NonPositiveViscosity { index: usize },

    #[error("Component {} viscosity is too low for the Walther correlation", .index + 1)]
    ViscosityOutOfRange { index: usize },

    #[error("Multiple objectives not allowed")]
    MultipleObjectives,

    #[error("Component {} fixed value must be between 0 and 100", .index + 1)]
    InvalidFixedValue { index: usize },

    #[error("Component {} range is invalid", .index + 1)]
    InvalidRange { index: usize },

    #[error("Invalid mixture constraint: {what}")]
    InvalidMixtureConstraint { what: &'static str },

    #[error("Sum of fixed component fractions exceeds 100%")]
    FixedSumExceeded,

    #[error("Sum of fixed components must be exactly 100%")]
    FixedSumNotComplete,

    #[error("Mixture viscosity does not match target value")]
    MixtureTargetMismatch,

    #[error("Mixture viscosity not within specified range")]
    MixtureOutOfRange,

    #[error("Component constraints cannot sum to 100%")]
    BoundsCannotSum,

    #[error("Target viscosity is not achievable with given constraints")]
    TargetNotAchievable,

    #[error("No solution satisfies the target viscosity")]
    NoSolutionForTarget,

    #[error("No solution satisfies the viscosity range")]
    NoSolutionForRange,

    #[error(
        "Too many variable components ({variables}): each pair needs more than {cap} bound combinations"
    )]
    EnumerationLimit { variables: usize, cap: u64 },
}

pub type BlendResult<T> = Result<T, BlendError>;
