//! Least-squares fits against temperature.

use crate::walther::{WaltherLine, log_temperature, walther_x};
use std::fmt;
use vb_core::units::KELVIN_OFFSET;

/// Denominators below this mean the abscissa has no spread.
const MIN_DENOMINATOR: f64 = 1e-12;

/// Measured kinematic viscosity [mm²/s] at a temperature [°C].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViscosityPoint {
    pub temperature: f64,
    pub viscosity: f64,
}

impl ViscosityPoint {
    pub fn new(temperature: f64, viscosity: f64) -> Self {
        Self {
            temperature,
            viscosity,
        }
    }

    fn is_usable(&self) -> bool {
        self.temperature.is_finite()
            && self.temperature > -KELVIN_OFFSET
            && walther_x(self.viscosity).is_finite()
    }
}

/// Any scalar property (density, heat capacity, conductivity) at a temperature [°C].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyPoint {
    pub temperature: f64,
    pub value: f64,
}

impl PropertyPoint {
    pub fn new(temperature: f64, value: f64) -> Self {
        Self { temperature, value }
    }
}

/// `value = intercept + slope * T`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    pub fn value_at(&self, temp_c: f64) -> f64 {
        self.intercept + self.slope * temp_c
    }
}

impl fmt::Display for LinearFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.slope >= 0.0 { '+' } else { '-' };
        write!(
            f,
            "y(T) = {:.4} {} {:.4}*T",
            self.intercept,
            sign,
            self.slope.abs()
        )
    }
}

/// Ordinary least squares of `y` on `x`. Returns `(slope, intercept)`.
fn least_squares(pairs: impl Iterator<Item = (f64, f64)>) -> Option<(f64, f64)> {
    let mut n = 0usize;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0, 0.0, 0.0, 0.0);
    for (x, y) in pairs {
        n += 1;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }
    if n < 2 {
        return None;
    }

    let n = n as f64;
    let denom = n * sum_x2 - sum_x * sum_x;
    if denom.abs() < MIN_DENOMINATOR {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denom;
    let intercept = (sum_y - slope * sum_x) / n;
    Some((slope, intercept))
}

/// Plain linear fit of a property against temperature.
///
/// `None` for fewer than two points or when every point shares one temperature.
pub fn linear_regression(points: &[PropertyPoint]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }
    least_squares(points.iter().map(|p| (p.temperature, p.value)))
        .map(|(slope, intercept)| LinearFit { slope, intercept })
}

/// Walther fit: least squares of `x` against `log10(T + 273.15)`.
///
/// Points with non-positive viscosity or temperatures at or below absolute zero
/// are dropped. The returned slope follows the [`WaltherLine`] sign convention.
pub fn walther_regression(points: &[ViscosityPoint]) -> Option<WaltherLine> {
    if points.len() < 2 {
        return None;
    }
    least_squares(
        points
            .iter()
            .filter(|p| p.is_usable())
            .map(|p| (log_temperature(p.temperature), walther_x(p.viscosity))),
    )
    .map(|(slope_raw, intercept)| WaltherLine::new(-slope_raw, intercept))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::walther::walther_params;

    #[test]
    fn linear_fit_recovers_exact_line() {
        let points: Vec<PropertyPoint> = [0.0, 20.0, 40.0, 80.0]
            .iter()
            .map(|&t| PropertyPoint::new(t, 880.0 - 0.65 * t))
            .collect();
        let fit = linear_regression(&points).unwrap();
        assert!((fit.slope + 0.65).abs() < 1e-9);
        assert!((fit.intercept - 880.0).abs() < 1e-9);
        assert!((fit.value_at(100.0) - 815.0).abs() < 1e-9);
    }

    #[test]
    fn linear_fit_degenerate_inputs() {
        assert!(linear_regression(&[]).is_none());
        assert!(linear_regression(&[PropertyPoint::new(20.0, 1.0)]).is_none());
        let same_t = [PropertyPoint::new(20.0, 1.0), PropertyPoint::new(20.0, 2.0)];
        assert!(linear_regression(&same_t).is_none());
    }

    #[test]
    fn walther_fit_of_two_points_matches_two_point_line() {
        let points = [
            ViscosityPoint::new(40.0, 100.0),
            ViscosityPoint::new(100.0, 11.0),
        ];
        let fit = walther_regression(&points).unwrap();
        let line = walther_params(100.0, 40.0, 11.0, 100.0);
        assert!((fit.slope - line.slope).abs() < 1e-9);
        assert!((fit.intercept - line.intercept).abs() < 1e-9);
    }

    #[test]
    fn walther_fit_drops_unusable_points() {
        let points = [
            ViscosityPoint::new(40.0, 100.0),
            ViscosityPoint::new(60.0, -3.0),
            ViscosityPoint::new(-300.0, 50.0),
            ViscosityPoint::new(80.0, 0.2),
            ViscosityPoint::new(100.0, 11.0),
        ];
        let fit = walther_regression(&points).unwrap();
        let line = walther_params(100.0, 40.0, 11.0, 100.0);
        assert!((fit.slope - line.slope).abs() < 1e-9);
        assert!((fit.intercept - line.intercept).abs() < 1e-9);
    }

    #[test]
    fn walther_fit_ignores_points_below_walther_domain() {
        let points = [
            ViscosityPoint::new(40.0, 0.2),
            ViscosityPoint::new(100.0, 0.3),
        ];
        assert!(walther_regression(&points).is_none());
    }

    #[test]
    fn walther_fit_needs_two_usable_points() {
        let points = [
            ViscosityPoint::new(40.0, 100.0),
            ViscosityPoint::new(100.0, 0.0),
        ];
        assert!(walther_regression(&points).is_none());
        let same_t = [
            ViscosityPoint::new(40.0, 100.0),
            ViscosityPoint::new(40.0, 90.0),
        ];
        assert!(walther_regression(&same_t).is_none());
    }

    #[test]
    fn walther_fit_of_collinear_points_is_exact() {
        let line = walther_params(320.0, 40.0, 24.0, 100.0);
        let points: Vec<ViscosityPoint> = [0.0, 25.0, 40.0, 70.0, 100.0]
            .iter()
            .map(|&t| ViscosityPoint::new(t, line.viscosity_at(t)))
            .collect();
        let fit = walther_regression(&points).unwrap();
        assert!((fit.slope - line.slope).abs() < 1e-7);
        assert!((fit.intercept - line.intercept).abs() < 1e-7);
    }

    #[test]
    fn linear_fit_display() {
        let fit = LinearFit {
            slope: -0.65,
            intercept: 880.0,
        };
        assert_eq!(fit.to_string(), "y(T) = 880.0000 - 0.6500*T");
    }
}
