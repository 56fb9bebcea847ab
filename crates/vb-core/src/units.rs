// vb-core/src/units.rs

use uom::si::f64::{
    DiffusionCoefficient as UomDiffusionCoefficient,
    ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
// uom files m²/s under diffusion coefficient; kinematic viscosity shares the dimension.
pub type KinVisc = UomDiffusionCoefficient;
pub type Temperature = UomThermodynamicTemperature;

/// Offset between degrees Celsius and kelvin.
pub const KELVIN_OFFSET: f64 = 273.15;

/// Kinematic viscosity from mm²/s (cSt), the unit every correlation here works in.
#[inline]
pub fn cst(v: f64) -> KinVisc {
    use uom::si::diffusion_coefficient::square_millimeter_per_second;
    KinVisc::new::<square_millimeter_per_second>(v)
}

#[inline]
pub fn celsius(t: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(t)
}

#[inline]
pub fn k(t: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(t)
}

#[inline]
pub fn to_cst(v: KinVisc) -> f64 {
    use uom::si::diffusion_coefficient::square_millimeter_per_second;
    v.get::<square_millimeter_per_second>()
}

#[inline]
pub fn to_celsius(t: Temperature) -> f64 {
    use uom::si::thermodynamic_temperature::degree_celsius;
    t.get::<degree_celsius>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        let _v = cst(46.0);
        let _t = celsius(40.0);
        let _tk = k(313.15);
    }

    #[test]
    fn celsius_roundtrip() {
        let t = k(373.15);
        assert!((to_celsius(t) - 100.0).abs() < 1e-9);
        assert!((to_celsius(celsius(40.0)) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn cst_roundtrip() {
        assert!((to_cst(cst(32.5)) - 32.5).abs() < 1e-9);
    }

    #[test]
    fn cst_is_square_millimeter_per_second() {
        use uom::si::diffusion_coefficient::{centistokes, square_meter_per_second};
        let v = cst(46.0);
        assert!((v.get::<centistokes>() - 46.0).abs() < 1e-9);
        assert!((v.get::<square_meter_per_second>() - 46.0e-6).abs() < 1e-15);
    }
}
