//! vb-core: stable foundation for viscoblend.
//!
//! Contains:
//! - units (uom SI types + constructors for viscosity and temperature)
//! - numeric (Real + finiteness and rounding helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{VbError, VbResult};
pub use numeric::*;
pub use units::*;
