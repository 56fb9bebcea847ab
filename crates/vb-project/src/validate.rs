//! Request validation logic.

use crate::numeric::NumericInput;
use crate::schema::{
    BlendRequest, ConstraintDef, ExtrapolateRequest, MeasurementDef, MixturePartDef,
    MixtureRequest, PropertyKind, Request, RequestDocument, TwoBasesRequest, TwoPointRequest,
    ViscosityIndexRequest,
};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Not a number: {field} = {value}")]
    NotANumber { field: String, value: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Too few entries in {field}: need at least {min}, got {got}")]
    TooFew {
        field: String,
        min: usize,
        got: usize,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

/// Read a numeric input, failing with the field name when it is not a finite number.
pub fn number(field: &str, input: &NumericInput) -> Result<f64, ValidationError> {
    match input.value() {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(ValidationError::NotANumber {
            field: field.to_string(),
            value: input.to_string(),
        }),
    }
}

fn positive(field: &str, input: &NumericInput) -> Result<f64, ValidationError> {
    let v = number(field, input)?;
    if v <= 0.0 {
        return Err(invalid(field, v, "must be positive"));
    }
    Ok(v)
}

fn percent(field: &str, input: &NumericInput) -> Result<f64, ValidationError> {
    let v = number(field, input)?;
    if !(0.0..=100.0).contains(&v) {
        return Err(invalid(field, v, "must be between 0 and 100"));
    }
    Ok(v)
}

fn invalid(field: &str, value: f64, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn at_least<T>(field: &str, items: &[T], min: usize) -> Result<(), ValidationError> {
    if items.len() < min {
        return Err(ValidationError::TooFew {
            field: field.to_string(),
            min,
            got: items.len(),
        });
    }
    Ok(())
}

pub fn validate_document(doc: &RequestDocument) -> Result<(), ValidationError> {
    if doc.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: doc.version,
        });
    }
    if doc.preferences.decimals > 12 {
        return Err(invalid(
            "preferences.decimals",
            f64::from(doc.preferences.decimals),
            "at most 12 decimals",
        ));
    }
    for request in &doc.requests {
        validate_request(request)?;
    }
    Ok(())
}

/// Check that every number in a request parses and lies in its domain.
///
/// Feasibility (for example whether a blend target is reachable) is left to
/// the calculators.
pub fn validate_request(request: &Request) -> Result<(), ValidationError> {
    match request {
        Request::TwoPoint(r) => validate_two_point(r),
        Request::Extrapolate(r) => validate_extrapolate(r),
        Request::ViscosityIndex(r) => validate_viscosity_index(r),
        Request::Mixture(r) => validate_mixture(r),
        Request::TwoBases(r) => validate_two_bases(r),
        Request::Blend(r) => validate_blend(r),
    }
}

fn measurement(field: &str, m: &MeasurementDef, viscosity: bool) -> Result<(), ValidationError> {
    number(&format!("{field}.temperature"), &m.temperature)?;
    if viscosity {
        positive(&format!("{field}.value"), &m.value)?;
    } else {
        number(&format!("{field}.value"), &m.value)?;
    }
    Ok(())
}

fn distinct_temperatures(a: &MeasurementDef, b: &MeasurementDef) -> Result<(), ValidationError> {
    let t1 = number("first.temperature", &a.temperature)?;
    let t2 = number("second.temperature", &b.temperature)?;
    if t1 == t2 {
        return Err(invalid(
            "second.temperature",
            t2,
            "must differ from first.temperature",
        ));
    }
    Ok(())
}

fn validate_two_point(r: &TwoPointRequest) -> Result<(), ValidationError> {
    measurement("first", &r.first, true)?;
    measurement("second", &r.second, true)?;
    distinct_temperatures(&r.first, &r.second)?;
    if let Some(t) = &r.evaluate_at {
        number("evaluate_at", t)?;
    }
    Ok(())
}

fn validate_extrapolate(r: &ExtrapolateRequest) -> Result<(), ValidationError> {
    at_least("points", &r.points, 2)?;
    let viscosity = r.property == PropertyKind::KinematicViscosity;
    for (i, p) in r.points.iter().enumerate() {
        measurement(&format!("points[{i}]"), p, viscosity)?;
    }
    number("target_temperature", &r.target_temperature)?;
    if let Some(sweep) = &r.sweep {
        if sweep.num_points < 2 {
            return Err(invalid(
                "sweep.num_points",
                sweep.num_points as f64,
                "at least 2 points",
            ));
        }
        if !sweep.start.is_finite() || !sweep.end.is_finite() || sweep.start == sweep.end {
            return Err(invalid("sweep.end", sweep.end, "must differ from sweep.start"));
        }
    }
    Ok(())
}

fn validate_viscosity_index(r: &ViscosityIndexRequest) -> Result<(), ValidationError> {
    match r {
        ViscosityIndexRequest::Standard { kv40, kv100 } => {
            positive("kv40", kv40)?;
            positive("kv100", kv100)?;
        }
        ViscosityIndexRequest::Measured { first, second } => {
            measurement("first", first, true)?;
            measurement("second", second, true)?;
            distinct_temperatures(first, second)?;
        }
    }
    Ok(())
}

fn parts(field: &str, parts: &[MixturePartDef]) -> Result<f64, ValidationError> {
    let mut total = 0.0;
    for (i, part) in parts.iter().enumerate() {
        positive(&format!("{field}[{i}].viscosity"), &part.viscosity)?;
        total += percent(&format!("{field}[{i}].percent"), &part.percent)?;
    }
    Ok(total)
}

fn validate_mixture(r: &MixtureRequest) -> Result<(), ValidationError> {
    at_least("components", &r.components, 1)?;
    parts("components", &r.components)?;
    Ok(())
}

fn validate_two_bases(r: &TwoBasesRequest) -> Result<(), ValidationError> {
    positive("target", &r.target)?;
    positive("base_a", &r.base_a)?;
    positive("base_b", &r.base_b)?;
    let known = parts("known", &r.known)?;
    if known >= 100.0 {
        return Err(invalid("known", known, "known components must leave room for the bases"));
    }
    Ok(())
}

fn validate_constraint(field: &str, c: &ConstraintDef, as_percent: bool) -> Result<(), ValidationError> {
    let check = |name: String, input: &NumericInput| {
        if as_percent {
            percent(&name, input)
        } else {
            positive(&name, input)
        }
    };
    match c {
        ConstraintDef::Range { min, max } => {
            let lo = min
                .as_ref()
                .map(|v| check(format!("{field}.min"), v))
                .transpose()?;
            let hi = max
                .as_ref()
                .map(|v| check(format!("{field}.max"), v))
                .transpose()?;
            if let (Some(lo), Some(hi)) = (lo, hi) {
                if lo > hi {
                    return Err(invalid(&format!("{field}.min"), lo, "exceeds max"));
                }
            }
        }
        ConstraintDef::SetValue { value } => {
            check(format!("{field}.value"), value)?;
        }
        ConstraintDef::Free | ConstraintDef::ObjectiveMin | ConstraintDef::ObjectiveMax => {}
    }
    Ok(())
}

fn validate_blend(r: &BlendRequest) -> Result<(), ValidationError> {
    at_least("components", &r.components, 1)?;
    for (i, c) in r.components.iter().enumerate() {
        positive(&format!("components[{i}].viscosity"), &c.viscosity)?;
        validate_constraint(&format!("components[{i}].constraint"), &c.constraint, true)?;
    }
    validate_constraint("mixture", &r.mixture, false)
}
