//! Constraint vocabulary shared by components and the blend itself.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Constraint on a component's share or on the blend viscosity.
///
/// On a component, `Range` and `SetValue` are percentages (0 to 100) and a
/// missing `Range` bound means 0 or 100. On the blend they are viscosities in
/// mm²/s and a missing bound is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Constraint {
    #[default]
    Free,
    Range {
        #[cfg_attr(feature = "serde", serde(default))]
        min: Option<f64>,
        #[cfg_attr(feature = "serde", serde(default))]
        max: Option<f64>,
    },
    ObjectiveMin,
    ObjectiveMax,
    SetValue {
        value: f64,
    },
}

impl Constraint {
    pub fn range(min: f64, max: f64) -> Self {
        Self::Range {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn set(value: f64) -> Self {
        Self::SetValue { value }
    }

    pub fn objective(&self) -> Option<Direction> {
        match self {
            Self::ObjectiveMin => Some(Direction::Min),
            Self::ObjectiveMax => Some(Direction::Max),
            _ => None,
        }
    }

    pub fn is_objective(&self) -> bool {
        self.objective().is_some()
    }
}

/// One blend ingredient.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlendComponent {
    /// Kinematic viscosity [mm²/s] at the blend temperature.
    pub viscosity: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constraint: Constraint,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
}

impl BlendComponent {
    pub fn new(viscosity: f64, constraint: Constraint) -> Self {
        Self {
            viscosity,
            constraint,
            name: None,
        }
    }

    pub fn named(name: impl Into<String>, viscosity: f64, constraint: Constraint) -> Self {
        Self {
            viscosity,
            constraint,
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Min,
    Max,
}

/// What the solver extremizes, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Objective {
    None,
    /// The blend's Walther coordinate (and so its viscosity).
    Mixture(Direction),
    /// One component's share.
    Component { index: usize, direction: Direction },
}

impl Objective {
    pub fn minimize(index: usize) -> Self {
        Self::Component {
            index,
            direction: Direction::Min,
        }
    }

    pub fn maximize(index: usize) -> Self {
        Self::Component {
            index,
            direction: Direction::Max,
        }
    }

    /// Build the problem's objective; assumes at most one objective is present.
    pub(crate) fn from_constraints(components: &[BlendComponent], mixture: &Constraint) -> Self {
        if let Some(direction) = mixture.objective() {
            return Self::Mixture(direction);
        }
        components
            .iter()
            .enumerate()
            .find_map(|(index, c)| {
                c.constraint
                    .objective()
                    .map(|direction| Self::Component { index, direction })
            })
            .unwrap_or(Self::None)
    }
}
