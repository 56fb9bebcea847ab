//! Temperature extrapolation from measured points.
//!
//! Fits either a Walther line (kinematic viscosity) or a straight line (any
//! other property), evaluates it at a requested temperature, and tabulates the
//! fit over a temperature sweep for charting.

use crate::error::{WaltherError, WaltherResult};
use crate::regression::{
    LinearFit, PropertyPoint, ViscosityPoint, linear_regression, walther_regression,
};
use crate::walther::WaltherLine;
use vb_core::ensure_finite;

/// Walther fit plus its value at the requested temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrapolation {
    pub line: WaltherLine,
    pub target_temperature: f64,
    pub viscosity: f64,
}

/// Linear fit plus its value at the requested temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyExtrapolation {
    pub fit: LinearFit,
    pub target_temperature: f64,
    pub value: f64,
}

pub fn extrapolate_viscosity(
    points: &[ViscosityPoint],
    target_temperature: f64,
) -> WaltherResult<Extrapolation> {
    let line = walther_regression(points).ok_or(WaltherError::InsufficientData {
        what: "need two valid viscosity points at distinct temperatures",
    })?;
    let viscosity = line.viscosity_at(target_temperature);
    if !viscosity.is_finite() {
        return Err(WaltherError::NonPhysical {
            what: "extrapolated viscosity",
        });
    }
    Ok(Extrapolation {
        line,
        target_temperature,
        viscosity,
    })
}

pub fn extrapolate_property(
    points: &[PropertyPoint],
    target_temperature: f64,
) -> WaltherResult<PropertyExtrapolation> {
    let fit = linear_regression(points).ok_or(WaltherError::InsufficientData {
        what: "need two points at distinct temperatures",
    })?;
    let value = ensure_finite(fit.value_at(target_temperature), "extrapolated property")?;
    Ok(PropertyExtrapolation {
        fit,
        target_temperature,
        value,
    })
}

/// Volumetric thermal expansion coefficient [1/K] from a density fit.
///
/// Uses the fitted density at the mean measured temperature as reference.
/// `None` when there are no points or the reference density is zero.
pub fn thermal_expansion_coefficient(points: &[PropertyPoint], fit: &LinearFit) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    let mean_t = points.iter().map(|p| p.temperature).sum::<f64>() / points.len() as f64;
    let reference = fit.value_at(mean_t);
    if reference == 0.0 {
        return None;
    }
    Some(-fit.slope / reference)
}

/// Evenly stepped temperatures between two bounds [°C], both included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureSweep {
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
}

impl TemperatureSweep {
    pub fn new(start: f64, end: f64, num_points: usize) -> WaltherResult<Self> {
        if !start.is_finite() || !end.is_finite() {
            return Err(WaltherError::InvalidArg {
                what: "sweep bounds must be finite",
            });
        }
        if num_points < 2 {
            return Err(WaltherError::InvalidArg {
                what: "sweep must have at least 2 points",
            });
        }
        if (start - end).abs() < 1e-12 {
            return Err(WaltherError::InvalidArg {
                what: "sweep start and end must be different",
            });
        }
        Ok(Self {
            start,
            end,
            num_points,
        })
    }

    /// -20 °C to 100 °C in 10 K steps, the usual viscosity table.
    pub fn viscosity_table() -> Self {
        Self {
            start: -20.0,
            end: 100.0,
            num_points: 13,
        }
    }

    /// 0 °C to 100 °C in 10 K steps, the usual property table.
    pub fn property_table() -> Self {
        Self {
            start: 0.0,
            end: 100.0,
            num_points: 11,
        }
    }

    pub fn temperatures(&self) -> Vec<f64> {
        let delta = (self.end - self.start) / (self.num_points - 1) as f64;
        let mut points: Vec<f64> = (0..self.num_points)
            .map(|i| self.start + i as f64 * delta)
            .collect();
        // Ensure exact endpoint
        if let Some(last) = points.last_mut() {
            *last = self.end;
        }
        points
    }

    /// `(temperature, viscosity)` pairs along a Walther line.
    pub fn viscosity_curve(&self, line: &WaltherLine) -> Vec<(f64, f64)> {
        self.temperatures()
            .into_iter()
            .map(|t| (t, line.viscosity_at(t)))
            .collect()
    }

    /// `(temperature, value)` pairs along a linear fit.
    pub fn property_curve(&self, fit: &LinearFit) -> Vec<(f64, f64)> {
        self.temperatures()
            .into_iter()
            .map(|t| (t, fit.value_at(t)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viscosity_extrapolation_matches_line() {
        let points = [
            ViscosityPoint::new(40.0, 46.0),
            ViscosityPoint::new(100.0, 6.8),
        ];
        let result = extrapolate_viscosity(&points, 40.0).unwrap();
        assert!((result.viscosity - 46.0).abs() < 1e-6);

        let cold = extrapolate_viscosity(&points, 0.0).unwrap();
        assert!(cold.viscosity > 46.0);
    }

    #[test]
    fn viscosity_extrapolation_needs_data() {
        let points = [ViscosityPoint::new(40.0, 46.0)];
        assert!(matches!(
            extrapolate_viscosity(&points, 20.0),
            Err(WaltherError::InsufficientData { .. })
        ));
    }

    #[test]
    fn property_extrapolation_and_expansion() {
        let points = [
            PropertyPoint::new(15.0, 870.0),
            PropertyPoint::new(40.0, 853.75),
        ];
        let result = extrapolate_property(&points, 90.0).unwrap();
        assert!((result.fit.slope + 0.65).abs() < 1e-9);
        assert!((result.value - 821.25).abs() < 1e-9);

        let beta = thermal_expansion_coefficient(&points, &result.fit).unwrap();
        // 0.65 / rho(27.5 °C) = 0.65 / 861.875
        assert!((beta - 0.65 / 861.875).abs() < 1e-12);
    }

    #[test]
    fn sweep_validation() {
        assert!(TemperatureSweep::new(0.0, 100.0, 1).is_err());
        assert!(TemperatureSweep::new(20.0, 20.0, 5).is_err());
        assert!(TemperatureSweep::new(f64::NAN, 20.0, 5).is_err());
    }

    #[test]
    fn standard_tables() {
        let temps = TemperatureSweep::viscosity_table().temperatures();
        assert_eq!(temps.len(), 13);
        assert_eq!(temps[0], -20.0);
        assert_eq!(temps[12], 100.0);
        assert!((temps[2] - 0.0).abs() < 1e-12);

        let temps = TemperatureSweep::property_table().temperatures();
        assert_eq!(temps.len(), 11);
        assert!((temps[4] - 40.0).abs() < 1e-12);
    }

    #[test]
    fn curves_follow_fits() {
        let line = WaltherLine::from_points(46.0, 40.0, 6.8, 100.0);
        let sweep = TemperatureSweep::new(40.0, 100.0, 4).unwrap();
        let curve = sweep.viscosity_curve(&line);
        assert_eq!(curve.len(), 4);
        assert!((curve[0].1 - 46.0).abs() < 1e-9);
        assert!((curve[3].1 - 6.8).abs() < 1e-9);
        assert!(curve.windows(2).all(|w| w[0].1 > w[1].1));

        let fit = LinearFit {
            slope: 2.0,
            intercept: 1.0,
        };
        let values = sweep.property_curve(&fit);
        assert_eq!(values[1], (60.0, 121.0));
    }
}
