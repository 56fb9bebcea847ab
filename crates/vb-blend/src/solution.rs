//! Solver output.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Whether the reported composition is the only feasible one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlendStatus {
    Unique,
    Multiple,
}

/// Feasible share interval of one variable component, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FractionRange {
    /// Component position in the input.
    pub index: usize,
    pub min: f64,
    pub max: f64,
}

impl FractionRange {
    pub fn contains(&self, percent: f64, tol: f64) -> bool {
        percent >= self.min - tol && percent <= self.max + tol
    }
}

/// How much work the solve did and what it had to leave out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlendDiagnostics {
    pub fixed_components: usize,
    pub variable_components: usize,
    /// Component pairs left out of each vertex enumeration by the cap.
    pub skipped_pairs: usize,
}

impl BlendDiagnostics {
    pub fn enumeration_capped(&self) -> bool {
        self.skipped_pairs > 0
    }
}

/// A feasible composition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlendSolution {
    /// Share of every component in input order, percent rounded to 2 decimals.
    pub fractions: Vec<f64>,
    /// Blend kinematic viscosity [mm²/s].
    pub viscosity: f64,
    pub status: BlendStatus,
    /// One entry per variable component, in input order.
    pub ranges: Vec<FractionRange>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub diagnostics: BlendDiagnostics,
}

impl BlendSolution {
    pub fn range_for(&self, index: usize) -> Option<&FractionRange> {
        self.ranges.iter().find(|r| r.index == index)
    }

    pub fn total_percent(&self) -> f64 {
        self.fractions.iter().sum()
    }
}
