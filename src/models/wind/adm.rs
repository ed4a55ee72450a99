//! Actuator disk models (ADM) for turbines in large-eddy simulations.
//!
//! The computational core is in the internal `core` module and is built
//! around the [`Turbine`] entity. [`ActuatorDisk`] exposes a turbine with a
//! built kernel as a [`twine_core::Model`] from velocity fields to disk
//! samples.

mod core;

pub use self::core::{
    AdmError, Cached, ControlPoints, DEFAULT_BUFFER_FACTOR, Grid, KernelRequest, KernelType,
    Normalization, SortKey, Turbine, TurbineParams, ZERO_FLOOR, check_alignment,
    correction_factor, disk_power, rotor_equivalent_wind_speed, synthesize_kernel,
};

use ndarray::Array3;
use twine_core::Model;
use uom::si::f64::Power;

use self::core::turbine_power;

/// Rotor-equivalent wind speed and power sampled from one velocity field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiskSample {
    pub rews: f64,
    pub power: Power,
}

/// Model adapter sampling velocity fields with a fixed turbine kernel.
///
/// The kernel and correction factor are taken from the turbine when the
/// adapter is built, so later changes to the turbine do not affect it.
#[derive(Debug, Clone)]
pub struct ActuatorDisk {
    params: TurbineParams,
    kernel: Array3<f64>,
    correction: f64,
}

impl ActuatorDisk {
    /// Builds an adapter from a turbine, computing its kernel if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the kernel or correction factor cannot be computed.
    /// See [`Turbine::kernel`] and [`Turbine::correction`].
    pub fn new(
        turbine: &mut Turbine,
        grid: &Grid,
        request: &KernelRequest,
    ) -> Result<Self, AdmError> {
        let kernel = turbine.kernel(grid, request)?.clone();
        let correction = turbine.correction()?;
        Ok(Self {
            params: *turbine.params(),
            kernel,
            correction,
        })
    }

    #[must_use]
    pub fn kernel(&self) -> &Array3<f64> {
        &self.kernel
    }

    #[must_use]
    pub fn correction(&self) -> f64 {
        self.correction
    }
}

impl Model for ActuatorDisk {
    type Input = Array3<f64>;
    type Output = DiskSample;
    type Error = AdmError;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        let (field, kernel) = (input.view(), self.kernel.view());
        check_alignment(&field, &kernel)?;

        let rews = rotor_equivalent_wind_speed(field, kernel, self.correction);
        Ok(DiskSample {
            rews,
            power: turbine_power(&self.params, rews),
        })
    }
}
