//! Gaussian-smoothed actuator disk kernels (ADM type 5, Shapiro et al., 2019).
//!
//! A kernel is a superposition of isotropic Gaussians, one per control point:
//!
//! ```text
//! K(p) = Σ_c C1 · exp(-6 / Δ² · |p - c|²),    C1 = (6 / (π Δ²))^(3/2)
//! ```
//!
//! where `Δ` is the filter width. Each Gaussian integrates to one, so before
//! normalization `Σ K · dx · dy · dz` is close to the number of control points.
//!
//! Gaussians are only evaluated inside a sub-box of the grid around the disk,
//! padded by a multiple of the filter width, which keeps the cost independent
//! of the size of the simulation domain.

use std::f64::consts::PI;

use ndarray::{Array1, Array3, ArrayView1, Zip, s};

use crate::support::constraint::StrictlyPositive;

use super::{AdmError, ControlPoints, Grid};

/// Values below this floor are set to exactly zero before normalization.
pub const ZERO_FLOOR: f64 = 1e-10;

/// Default sub-box padding, in filter widths.
pub const DEFAULT_BUFFER_FACTOR: f64 = 3.0;

/// Supported actuator disk kernel families.
///
/// Type codes follow the numbering used by the simulation's ADM inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelType {
    /// Type 5: a disk of control points smoothed by Gaussians.
    SmoothedDisk,
}

impl KernelType {
    /// Numeric type code of this kernel family.
    #[must_use]
    pub fn code(self) -> u32 {
        match self {
            Self::SmoothedDisk => 5,
        }
    }
}

impl TryFrom<u32> for KernelType {
    type Error = AdmError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            5 => Ok(Self::SmoothedDisk),
            code => Err(AdmError::UnsupportedKernelType { code }),
        }
    }
}

/// How a kernel is scaled after it is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Normalization {
    /// The kernel sums to one; used to sample weighted averages.
    #[default]
    Sum,

    /// The kernel integrates to one over the grid volume; used as a forcing density.
    Volume,
}

/// Builds a normalized kernel on `grid` from a set of control points.
///
/// Only the nodes within `buffer_factor · filter_width` of the control
/// points' bounding box are evaluated; every other node is zero.
///
/// # Errors
///
/// Returns [`AdmError::InvalidParameter`] for a filter width that is not
/// strictly positive, and [`AdmError::DegenerateKernel`] if no node of the
/// grid carries weight (no control points, or a disk too far from the grid).
pub fn synthesize_kernel(
    grid: &Grid,
    points: &ControlPoints,
    filter_width: f64,
    buffer_factor: f64,
    normalization: Normalization,
) -> Result<Array3<f64>, AdmError> {
    let mut kernel = accumulate(grid, points, filter_width, buffer_factor)?;

    kernel.mapv_inplace(|value| if value < ZERO_FLOOR { 0.0 } else { value });

    let total = kernel.sum();
    if !(total > 0.0 && total.is_finite()) {
        return Err(AdmError::DegenerateKernel);
    }

    let scale = match normalization {
        Normalization::Sum => total,
        Normalization::Volume => {
            let [dx, dy, dz] = grid.spacing();
            total * dx * dy * dz
        }
    };
    kernel.mapv_inplace(|value| value / scale);

    Ok(kernel)
}

/// Sums the control-point Gaussians over the local sub-box of the grid.
fn accumulate(
    grid: &Grid,
    points: &ControlPoints,
    filter_width: f64,
    buffer_factor: f64,
) -> Result<Array3<f64>, AdmError> {
    let filter_width = StrictlyPositive::new(filter_width)
        .map_err(|err| AdmError::invalid("filterwidth", err))?
        .into_inner();

    let [nx, ny, nz] = grid.shape();
    let mut kernel = Array3::zeros((nx, ny, nz));

    let Some((lower, upper)) = points.bounds() else {
        return Ok(kernel);
    };

    let buffer = buffer_factor * filter_width;
    let [xs, ys, zs] = grid.index_box(lower.map(|v| v - buffer), upper.map(|v| v + buffer));
    log::trace!(
        "kernel sub-box x={xs:?}, y={ys:?}, z={zs:?} for {} control points",
        points.len()
    );

    let x = grid.x().slice(s![xs.clone()]);
    let y = grid.y().slice(s![ys.clone()]);
    let z = grid.z().slice(s![zs.clone()]);
    let mut local = kernel.slice_mut(s![xs, ys, zs]);

    let c1 = (6.0 / (PI * filter_width * filter_width)).powf(1.5);
    let decay = 6.0 / (filter_width * filter_width);

    // The Gaussian is separable, so each control point needs three 1D factors.
    for &[xc, yc, zc] in points.iter() {
        let gx = gaussian_factor(x, xc, decay) * c1;
        let gy = gaussian_factor(y, yc, decay);
        let gz = gaussian_factor(z, zc, decay);

        Zip::indexed(&mut local).for_each(|(i, j, k), value| {
            *value += gx[i] * gy[j] * gz[k];
        });
    }

    Ok(kernel)
}

fn gaussian_factor(axis: ArrayView1<'_, f64>, center: f64, decay: f64) -> Array1<f64> {
    axis.mapv(|node| (-decay * (node - center).powi(2)).exp())
}
