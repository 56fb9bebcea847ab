//! Complex-blend constraint solver.
//!
//! Given blend components, each with a kinematic viscosity and an independent
//! constraint (free, bounded range, objective, or fixed share), and a
//! constraint on the blend viscosity, this crate finds composition fractions
//! that satisfy everything at once. Blending is linear in the Walther
//! coordinate, so the feasible set is a polytope; the solver enumerates its
//! vertices directly instead of running a general LP.
//!
//! Every solve is a pure function of its inputs. Per-component feasible
//! ranges are independent queries and run in parallel.

pub mod config;
pub mod constraint;
pub mod engine;
pub mod error;
pub mod problem;
pub mod solution;
pub mod solve;

pub use config::BlendConfig;
pub use constraint::{BlendComponent, Constraint, Direction, Objective};
pub use error::{BlendError, BlendResult};
pub use problem::BlendProblem;
pub use solution::{BlendDiagnostics, BlendSolution, BlendStatus, FractionRange};
pub use solve::{solve_complex_blend, solve_complex_blend_with_config};
