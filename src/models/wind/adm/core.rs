//! Actuator disk geometry, kernels, and sampling.
//!
//! Everything here operates on plain arrays in simulation units. The
//! [`Turbine`] entity ties the pieces together and caches what it computes.

mod control_points;
mod correction;
mod error;
mod grid;
mod kernel;
mod params;
mod power;
mod rews;
mod sort;
mod turbine;

#[cfg(test)]
pub(crate) mod test_support;

pub use control_points::ControlPoints;
pub use correction::correction_factor;
pub use error::AdmError;
pub use grid::Grid;
pub use kernel::{DEFAULT_BUFFER_FACTOR, KernelType, Normalization, ZERO_FLOOR, synthesize_kernel};
pub use params::TurbineParams;
pub use power::disk_power;
pub use rews::{check_alignment, rotor_equivalent_wind_speed};
pub use sort::SortKey;
pub use turbine::{Cached, KernelRequest, Turbine};

pub(crate) use power::turbine_power;
