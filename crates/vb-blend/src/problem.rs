//! Problem definition: validation and fixed/variable partitioning.

use crate::config::BlendConfig;
use crate::constraint::{BlendComponent, Constraint, Objective};
use crate::error::{BlendError, BlendResult};
use tracing::debug;
use vb_walther::walther_x;

/// A component pinned by `SetValue`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedShare {
    pub index: usize,
    pub fraction: f64,
}

/// A component the solver decides, with bounds as fractions of 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableShare {
    pub index: usize,
    pub lb: f64,
    pub ub: f64,
    /// Walther coordinate of the component.
    pub x: f64,
}

impl VariableShare {
    pub fn capacity(&self) -> f64 {
        self.ub - self.lb
    }

    pub fn midpoint(&self) -> f64 {
        (self.lb + self.ub) / 2.0
    }
}

/// How the blend viscosity is constrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MixtureMode {
    /// Free, or only an objective on the blend.
    Unconstrained,
    /// Exact blend viscosity [mm²/s].
    Target { viscosity: f64 },
    /// Blend viscosity window [mm²/s]; `None` is unbounded.
    Range { min: Option<f64>, max: Option<f64> },
}

/// Validated, partitioned blend problem.
#[derive(Debug, Clone)]
pub struct BlendProblem {
    /// Walther coordinate for every component, in input order.
    pub x_values: Vec<f64>,
    pub fixed: Vec<FixedShare>,
    pub variable: Vec<VariableShare>,
    pub fixed_sum: f64,
    /// `Σ fraction·x` over fixed components.
    pub fixed_x: f64,
    pub objective: Objective,
    pub mixture: MixtureMode,
}

impl BlendProblem {
    /// Validate inputs and split components into fixed and variable shares.
    ///
    /// Checks run in a fixed order so the first violated rule is the one reported.
    pub fn new(
        components: &[BlendComponent],
        mixture: &Constraint,
        config: &BlendConfig,
    ) -> BlendResult<Self> {
        if components.is_empty() {
            return Err(BlendError::NoComponents);
        }

        for (index, comp) in components.iter().enumerate() {
            if !comp.viscosity.is_finite() || comp.viscosity <= 0.0 {
                return Err(BlendError::NonPositiveViscosity { index });
            }
        }

        let objective_count = usize::from(mixture.is_objective())
            + components
                .iter()
                .filter(|c| c.constraint.is_objective())
                .count();
        if objective_count > 1 {
            return Err(BlendError::MultipleObjectives);
        }

        let x_values: Vec<f64> = components.iter().map(|c| walther_x(c.viscosity)).collect();
        if let Some(index) = x_values.iter().position(|x| !x.is_finite()) {
            return Err(BlendError::ViscosityOutOfRange { index });
        }

        let mut fixed = Vec::new();
        let mut variable = Vec::new();
        let mut fixed_sum = 0.0;
        let mut fixed_x = 0.0;

        for (index, comp) in components.iter().enumerate() {
            match comp.constraint {
                Constraint::SetValue { value } => {
                    let fraction = value / 100.0;
                    if !(0.0..=1.0).contains(&fraction) {
                        return Err(BlendError::InvalidFixedValue { index });
                    }
                    fixed.push(FixedShare { index, fraction });
                    fixed_sum += fraction;
                    fixed_x += fraction * x_values[index];
                }
                Constraint::Range { min, max } => {
                    let lb = min.unwrap_or(0.0) / 100.0;
                    let ub = max.unwrap_or(100.0) / 100.0;
                    if !(lb >= 0.0 && ub <= 1.0 && lb <= ub) {
                        return Err(BlendError::InvalidRange { index });
                    }
                    variable.push(VariableShare {
                        index,
                        lb,
                        ub,
                        x: x_values[index],
                    });
                }
                Constraint::Free | Constraint::ObjectiveMin | Constraint::ObjectiveMax => {
                    variable.push(VariableShare {
                        index,
                        lb: 0.0,
                        ub: 1.0,
                        x: x_values[index],
                    });
                }
            }
        }

        let objective = Objective::from_constraints(components, mixture);
        let mixture = mixture_mode(mixture)?;

        if fixed_sum > 1.0 + config.eps {
            return Err(BlendError::FixedSumExceeded);
        }

        debug!(
            fixed = fixed.len(),
            variable = variable.len(),
            fixed_sum,
            ?mixture,
            "partitioned blend problem"
        );

        Ok(Self {
            x_values,
            fixed,
            variable,
            fixed_sum,
            fixed_x,
            objective,
            mixture,
        })
    }

    pub fn len(&self) -> usize {
        self.x_values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x_values.is_empty()
    }

    /// Mass left for the variable components.
    pub fn remaining(&self) -> f64 {
        1.0 - self.fixed_sum
    }

    pub fn total_lb(&self) -> f64 {
        self.variable.iter().map(|v| v.lb).sum()
    }

    pub fn total_ub(&self) -> f64 {
        self.variable.iter().map(|v| v.ub).sum()
    }

    /// Fractions with fixed shares filled in and every variable share at zero.
    pub fn initial_fractions(&self) -> Vec<f64> {
        let mut fractions = vec![0.0; self.len()];
        for f in &self.fixed {
            fractions[f.index] = f.fraction;
        }
        fractions
    }

    /// `Σ fraction·x` over every component.
    pub fn x_total(&self, fractions: &[f64]) -> f64 {
        fractions
            .iter()
            .zip(&self.x_values)
            .map(|(f, x)| f * x)
            .sum()
    }
}

fn mixture_mode(mixture: &Constraint) -> BlendResult<MixtureMode> {
    match *mixture {
        Constraint::SetValue { value } => {
            if !value.is_finite() || value <= 0.0 {
                return Err(BlendError::InvalidMixtureConstraint {
                    what: "target viscosity must be positive",
                });
            }
            if !walther_x(value).is_finite() {
                return Err(BlendError::InvalidMixtureConstraint {
                    what: "target viscosity is too low for the Walther correlation",
                });
            }
            Ok(MixtureMode::Target { viscosity: value })
        }
        Constraint::Range { min, max } => {
            for bound in [min, max].into_iter().flatten() {
                if !bound.is_finite() || bound <= 0.0 {
                    return Err(BlendError::InvalidMixtureConstraint {
                        what: "viscosity bounds must be positive",
                    });
                }
                if !walther_x(bound).is_finite() {
                    return Err(BlendError::InvalidMixtureConstraint {
                        what: "viscosity bounds are too low for the Walther correlation",
                    });
                }
            }
            if let (Some(lo), Some(hi)) = (min, max) {
                if lo > hi {
                    return Err(BlendError::InvalidMixtureConstraint {
                        what: "minimum viscosity exceeds maximum",
                    });
                }
            }
            Ok(MixtureMode::Range { min, max })
        }
        Constraint::Free | Constraint::ObjectiveMin | Constraint::ObjectiveMax => {
            Ok(MixtureMode::Unconstrained)
        }
    }
}
