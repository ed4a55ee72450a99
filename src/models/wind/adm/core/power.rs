use std::f64::consts::PI;

use uom::si::{
    f64::{Area, Length, MassDensity, Power, Velocity},
    length::meter,
    mass_density::kilogram_per_cubic_meter,
    velocity::meter_per_second,
};

use super::TurbineParams;

/// Power extracted by an actuator disk.
///
/// Uses the local power coefficient `C_P'`, defined on the disk velocity
/// rather than the freestream:
///
/// ```text
/// P = 1/2 · ρ · (π D² / 4) · C_P' · u_d³
/// ```
#[must_use]
pub fn disk_power(
    disk_velocity: Velocity,
    diameter: Length,
    density: MassDensity,
    cp_prime: f64,
) -> Power {
    let area: Area = diameter * diameter * (PI / 4.0);
    density * area * disk_velocity * disk_velocity * disk_velocity * (0.5 * cp_prime)
}

/// Power of a turbine at disk velocity `disk_speed`, in simulation units.
///
/// Simulation quantities are nondimensional, so they are read as SI values
/// with unit density. The model assumes `C_P' = C_T'`.
pub(crate) fn turbine_power(params: &TurbineParams, disk_speed: f64) -> Power {
    disk_power(
        Velocity::new::<meter_per_second>(disk_speed),
        Length::new::<meter>(*params.diam.as_ref()),
        MassDensity::new::<kilogram_per_cubic_meter>(1.0),
        *params.ct.as_ref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::power::{kilowatt, watt};

    #[test]
    fn unit_rotor() {
        let power = disk_power(
            Velocity::new::<meter_per_second>(2.0),
            Length::new::<meter>(1.0),
            MassDensity::new::<kilogram_per_cubic_meter>(1.0),
            2.0,
        );
        assert_relative_eq!(power.get::<watt>(), 2.0 * PI, epsilon = 1e-12);
    }

    #[test]
    fn scales_with_cube_of_velocity() {
        let power_at = |u: f64| {
            disk_power(
                Velocity::new::<meter_per_second>(u),
                Length::new::<meter>(126.0),
                MassDensity::new::<kilogram_per_cubic_meter>(1.225),
                1.33,
            )
        };
        assert_relative_eq!(
            power_at(10.0).get::<kilowatt>(),
            8.0 * power_at(5.0).get::<kilowatt>(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn turbine_uses_its_thrust_coefficient() {
        let params = TurbineParams::new(0.0, 0.0, 0.0, 2.0, 1.0).unwrap();
        assert_relative_eq!(
            turbine_power(&params, 2.0).get::<watt>(),
            2.0 * PI,
            epsilon = 1e-12
        );
    }
}
