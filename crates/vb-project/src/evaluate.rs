//! Run validated requests against the calculators.

use crate::schema::{
    ExtrapolateRequest, MixtureRequest, PropertyKind, Request, TwoBasesRequest, TwoPointRequest,
    ViscosityIndexRequest,
};
use crate::validate::{ValidationError, number, validate_request};
use crate::{ProjectError, ProjectResult};
use serde::{Deserialize, Serialize};
use vb_blend::{BlendSolution, solve_complex_blend};
use vb_walther::{
    TemperatureSweep, WaltherLine, extrapolate_property, extrapolate_viscosity, solve_two_bases,
    thermal_expansion_coefficient, try_mixture_viscosity, try_viscosity_index,
    viscosity_index_from_points,
};

/// Result of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    TwoPoint(LineOutcome),
    Extrapolate(ExtrapolationOutcome),
    ViscosityIndex(IndexOutcome),
    Mixture(MixtureOutcome),
    TwoBases(SplitOutcome),
    Blend(BlendOutcome),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineOutcome {
    pub slope: f64,
    pub intercept: f64,
    pub equation: String,
    /// `(temperature, viscosity)` when an evaluation temperature was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluated: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrapolationOutcome {
    pub property: PropertyKind,
    pub equation: String,
    pub target_temperature: f64,
    pub value: f64,
    /// Volumetric thermal expansion coefficient [1/K], density fits only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansion_coefficient: Option<f64>,
    pub table: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexOutcome {
    pub kv40: f64,
    pub kv100: f64,
    pub index: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixtureOutcome {
    pub viscosity: f64,
    pub total_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitOutcome {
    pub percent_a: f64,
    pub percent_b: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlendOutcome {
    /// Display name per component, in input order.
    pub names: Vec<String>,
    pub solution: BlendSolution,
}

/// Validate and run one request.
pub fn evaluate(request: &Request) -> ProjectResult<Outcome> {
    validate_request(request)?;
    Ok(match request {
        Request::TwoPoint(r) => Outcome::TwoPoint(two_point(r)?),
        Request::Extrapolate(r) => Outcome::Extrapolate(extrapolate(r)?),
        Request::ViscosityIndex(r) => Outcome::ViscosityIndex(viscosity_index(r)?),
        Request::Mixture(r) => Outcome::Mixture(mixture(r)?),
        Request::TwoBases(r) => Outcome::TwoBases(two_bases(r)?),
        Request::Blend(r) => {
            let (components, mix) = r.to_problem()?;
            let names = components
                .iter()
                .enumerate()
                .map(|(i, c)| c.name.clone().unwrap_or_else(|| format!("Component {}", i + 1)))
                .collect();
            let solution = solve_complex_blend(&components, &mix)?;
            Outcome::Blend(BlendOutcome { names, solution })
        }
    })
}

fn two_point(r: &TwoPointRequest) -> ProjectResult<LineOutcome> {
    let a = r.first.viscosity_point("first")?;
    let b = r.second.viscosity_point("second")?;
    let line = WaltherLine::try_from_points(a.viscosity, a.temperature, b.viscosity, b.temperature)?;
    let evaluated = r
        .evaluate_at
        .as_ref()
        .map(|t| number("evaluate_at", t))
        .transpose()?
        .map(|t| (t, line.viscosity_at(t)));
    Ok(LineOutcome {
        slope: line.slope,
        intercept: line.intercept,
        equation: line.to_string(),
        evaluated,
    })
}

fn extrapolate(r: &ExtrapolateRequest) -> ProjectResult<ExtrapolationOutcome> {
    let target = number("target_temperature", &r.target_temperature)?;
    let sweep = match &r.sweep {
        Some(s) => TemperatureSweep::new(s.start, s.end, s.num_points)?,
        None if r.property == PropertyKind::KinematicViscosity => {
            TemperatureSweep::viscosity_table()
        }
        None => TemperatureSweep::property_table(),
    };

    if r.property == PropertyKind::KinematicViscosity {
        let points = r
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| p.viscosity_point(&format!("points[{i}]")))
            .collect::<Result<Vec<_>, ValidationError>>()?;
        let fit = extrapolate_viscosity(&points, target)?;
        return Ok(ExtrapolationOutcome {
            property: r.property,
            equation: fit.line.to_string(),
            target_temperature: target,
            value: fit.viscosity,
            expansion_coefficient: None,
            table: sweep.viscosity_curve(&fit.line),
        });
    }

    let points = r
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| p.property_point(&format!("points[{i}]")))
        .collect::<Result<Vec<_>, ValidationError>>()?;
    let fit = extrapolate_property(&points, target)?;
    let expansion_coefficient = match r.property {
        PropertyKind::Density => thermal_expansion_coefficient(&points, &fit.fit),
        _ => None,
    };
    Ok(ExtrapolationOutcome {
        property: r.property,
        equation: fit.fit.to_string(),
        target_temperature: target,
        value: fit.value,
        expansion_coefficient,
        table: sweep.property_curve(&fit.fit),
    })
}

fn viscosity_index(r: &ViscosityIndexRequest) -> ProjectResult<IndexOutcome> {
    match r {
        ViscosityIndexRequest::Standard { kv40, kv100 } => {
            let kv40 = number("kv40", kv40)?;
            let kv100 = number("kv100", kv100)?;
            Ok(IndexOutcome {
                kv40,
                kv100,
                index: try_viscosity_index(kv40, kv100)?,
            })
        }
        ViscosityIndexRequest::Measured { first, second } => {
            let a = first.viscosity_point("first")?;
            let b = second.viscosity_point("second")?;
            let report =
                viscosity_index_from_points(a.viscosity, a.temperature, b.viscosity, b.temperature)?;
            Ok(IndexOutcome {
                kv40: report.kv40,
                kv100: report.kv100,
                index: report.index,
            })
        }
    }
}

fn mixture(r: &MixtureRequest) -> ProjectResult<MixtureOutcome> {
    let parts = r
        .components
        .iter()
        .enumerate()
        .map(|(i, p)| p.to_known(&format!("components[{i}]")))
        .collect::<Result<Vec<_>, ValidationError>>()?;
    let total_percent: f64 = parts.iter().map(|p| p.percent).sum();
    if (total_percent - 100.0).abs() > 0.01 {
        return Err(ProjectError::Validation(ValidationError::InvalidValue {
            field: "components".to_string(),
            value: total_percent.to_string(),
            reason: "percentages must sum to 100".to_string(),
        }));
    }
    let viscosities: Vec<f64> = parts.iter().map(|p| p.viscosity).collect();
    let fractions: Vec<f64> = parts.iter().map(|p| p.percent / 100.0).collect();
    Ok(MixtureOutcome {
        viscosity: try_mixture_viscosity(&viscosities, &fractions)?,
        total_percent,
    })
}

fn two_bases(r: &TwoBasesRequest) -> ProjectResult<SplitOutcome> {
    let known = r
        .known
        .iter()
        .enumerate()
        .map(|(i, p)| p.to_known(&format!("known[{i}]")))
        .collect::<Result<Vec<_>, ValidationError>>()?;
    let split = solve_two_bases(
        number("target", &r.target)?,
        number("base_a", &r.base_a)?,
        number("base_b", &r.base_b)?,
        &known,
    )?;
    Ok(SplitOutcome {
        percent_a: split.percent_a,
        percent_b: split.percent_b,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{MeasurementDef, MixturePartDef};

    #[test]
    fn viscosity_index_both_forms() {
        let standard = Request::ViscosityIndex(ViscosityIndexRequest::Standard {
            kv40: "46".into(),
            kv100: "6,8".into(),
        });
        let Outcome::ViscosityIndex(vi) = evaluate(&standard).unwrap() else {
            panic!("wrong outcome");
        };
        assert_eq!(vi.index, 101.4);

        let measured = Request::ViscosityIndex(ViscosityIndexRequest::Measured {
            first: MeasurementDef {
                temperature: 40.0.into(),
                value: 46.0.into(),
            },
            second: MeasurementDef {
                temperature: 100.0.into(),
                value: 6.8.into(),
            },
        });
        let Outcome::ViscosityIndex(vi) = evaluate(&measured).unwrap() else {
            panic!("wrong outcome");
        };
        assert!((vi.kv40 - 46.0).abs() < 1e-9);
        assert_eq!(vi.index, 101.4);
    }

    #[test]
    fn mixture_requires_full_blend() {
        let request = Request::Mixture(MixtureRequest {
            components: vec![
                MixturePartDef {
                    viscosity: 100.0.into(),
                    percent: 60.0.into(),
                },
                MixturePartDef {
                    viscosity: 10.0.into(),
                    percent: 30.0.into(),
                },
            ],
        });
        assert!(matches!(
            evaluate(&request),
            Err(ProjectError::Validation(ValidationError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn calculator_errors_pass_through() {
        let request = Request::TwoBases(TwoBasesRequest {
            target: 500.0.into(),
            base_a: 100.0.into(),
            base_b: 10.0.into(),
            known: vec![],
        });
        assert!(matches!(evaluate(&request), Err(ProjectError::Walther(_))));
    }
}
