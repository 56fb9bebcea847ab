use thiserror::Error;

pub type VbResult<T> = Result<T, VbError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VbError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Length mismatch: {what} ({left} != {right})")]
    LengthMismatch {
        what: &'static str,
        left: usize,
        right: usize,
    },
}
