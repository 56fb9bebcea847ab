//! Conversion of document definitions into calculator inputs.

use crate::numeric::NumericInput;
use crate::schema::{BlendRequest, ConstraintDef, MeasurementDef, MixturePartDef};
use crate::validate::{ValidationError, number};
use vb_blend::{BlendComponent, Constraint};
use vb_walther::{KnownComponent, PropertyPoint, ViscosityPoint};

impl MeasurementDef {
    pub fn viscosity_point(&self, field: &str) -> Result<ViscosityPoint, ValidationError> {
        Ok(ViscosityPoint::new(
            number(&format!("{field}.temperature"), &self.temperature)?,
            number(&format!("{field}.value"), &self.value)?,
        ))
    }

    pub fn property_point(&self, field: &str) -> Result<PropertyPoint, ValidationError> {
        Ok(PropertyPoint::new(
            number(&format!("{field}.temperature"), &self.temperature)?,
            number(&format!("{field}.value"), &self.value)?,
        ))
    }
}

impl MixturePartDef {
    pub fn to_known(&self, field: &str) -> Result<KnownComponent, ValidationError> {
        Ok(KnownComponent {
            percent: number(&format!("{field}.percent"), &self.percent)?,
            viscosity: number(&format!("{field}.viscosity"), &self.viscosity)?,
        })
    }
}

impl ConstraintDef {
    pub fn to_constraint(&self, field: &str) -> Result<Constraint, ValidationError> {
        let opt = |name: &str, v: &Option<NumericInput>| {
            v.as_ref()
                .map(|v| number(&format!("{field}.{name}"), v))
                .transpose()
        };
        Ok(match self {
            ConstraintDef::Free => Constraint::Free,
            ConstraintDef::Range { min, max } => Constraint::Range {
                min: opt("min", min)?,
                max: opt("max", max)?,
            },
            ConstraintDef::ObjectiveMin => Constraint::ObjectiveMin,
            ConstraintDef::ObjectiveMax => Constraint::ObjectiveMax,
            ConstraintDef::SetValue { value } => Constraint::SetValue {
                value: number(&format!("{field}.value"), value)?,
            },
        })
    }
}

impl BlendRequest {
    /// Components and mixture constraint ready for the blend solver.
    pub fn to_problem(&self) -> Result<(Vec<BlendComponent>, Constraint), ValidationError> {
        let components = self
            .components
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let viscosity = number(&format!("components[{i}].viscosity"), &c.viscosity)?;
                let constraint = c
                    .constraint
                    .to_constraint(&format!("components[{i}].constraint"))?;
                Ok(BlendComponent {
                    viscosity,
                    constraint,
                    name: c.name.clone(),
                })
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;
        let mixture = self.mixture.to_constraint("mixture")?;
        Ok((components, mixture))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BlendComponentDef;

    #[test]
    fn blend_request_to_problem() {
        let request = BlendRequest {
            components: vec![
                BlendComponentDef {
                    name: Some("SN150".into()),
                    viscosity: "29,5".into(),
                    constraint: ConstraintDef::Range {
                        min: Some("10".into()),
                        max: None,
                    },
                },
                BlendComponentDef {
                    name: None,
                    viscosity: 100.0.into(),
                    constraint: ConstraintDef::ObjectiveMax,
                },
            ],
            mixture: ConstraintDef::SetValue {
                value: "46,0 cSt".into(),
            },
        };
        let (components, mixture) = request.to_problem().unwrap();
        assert_eq!(components[0].viscosity, 29.5);
        assert_eq!(components[0].name.as_deref(), Some("SN150"));
        assert_eq!(
            components[0].constraint,
            Constraint::Range {
                min: Some(10.0),
                max: None
            }
        );
        assert_eq!(components[1].constraint, Constraint::ObjectiveMax);
        assert_eq!(mixture, Constraint::set(46.0));
    }

    #[test]
    fn bad_numbers_name_the_field() {
        let request = BlendRequest {
            components: vec![BlendComponentDef {
                name: None,
                viscosity: "thick".into(),
                constraint: ConstraintDef::Free,
            }],
            mixture: ConstraintDef::Free,
        };
        let err = request.to_problem().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::NotANumber { ref field, .. } if field == "components[0].viscosity"
        ));
    }
}
