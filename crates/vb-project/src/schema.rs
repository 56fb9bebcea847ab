//! Request document definitions.

use crate::numeric::NumericInput;
use crate::preferences::Preferences;
use serde::{Deserialize, Serialize};

/// A file of calculation requests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestDocument {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
    #[serde(default)]
    pub requests: Vec<Request>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Request {
    /// Walther line through two measurements, optionally read at a temperature.
    TwoPoint(TwoPointRequest),
    Extrapolate(ExtrapolateRequest),
    ViscosityIndex(ViscosityIndexRequest),
    Mixture(MixtureRequest),
    TwoBases(TwoBasesRequest),
    Blend(BlendRequest),
}

impl Request {
    pub fn kind(&self) -> &'static str {
        match self {
            Request::TwoPoint(_) => "two_point",
            Request::Extrapolate(_) => "extrapolate",
            Request::ViscosityIndex(_) => "viscosity_index",
            Request::Mixture(_) => "mixture",
            Request::TwoBases(_) => "two_bases",
            Request::Blend(_) => "blend",
        }
    }
}

/// One viscosity measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementDef {
    /// [°C]
    pub temperature: NumericInput,
    /// Kinematic viscosity [mm²/s], or the property value for extrapolation.
    pub value: NumericInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwoPointRequest {
    pub first: MeasurementDef,
    pub second: MeasurementDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluate_at: Option<NumericInput>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// Walther fit in mm²/s.
    #[default]
    KinematicViscosity,
    /// Linear fit in kg/m³, with a thermal expansion coefficient.
    Density,
    /// Linear fit of any other property.
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepDef {
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtrapolateRequest {
    #[serde(default)]
    pub property: PropertyKind,
    pub points: Vec<MeasurementDef>,
    pub target_temperature: NumericInput,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepDef>,
}

/// Either direct 40/100 °C viscosities or two measurements at any temperatures.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ViscosityIndexRequest {
    Standard {
        kv40: NumericInput,
        kv100: NumericInput,
    },
    Measured {
        first: MeasurementDef,
        second: MeasurementDef,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MixturePartDef {
    pub viscosity: NumericInput,
    pub percent: NumericInput,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MixtureRequest {
    pub components: Vec<MixturePartDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TwoBasesRequest {
    pub target: NumericInput,
    pub base_a: NumericInput,
    pub base_b: NumericInput,
    #[serde(default)]
    pub known: Vec<MixturePartDef>,
}

/// Constraint as written in a document.
///
/// On components, values are percentages; on the mixture, viscosities [mm²/s].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintDef {
    #[default]
    Free,
    Range {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<NumericInput>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<NumericInput>,
    },
    ObjectiveMin,
    ObjectiveMax,
    SetValue {
        value: NumericInput,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlendComponentDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub viscosity: NumericInput,
    #[serde(default)]
    pub constraint: ConstraintDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlendRequest {
    pub components: Vec<BlendComponentDef>,
    #[serde(default)]
    pub mixture: ConstraintDef,
}
