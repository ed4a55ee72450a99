use ndarray::{ArrayView3, Zip};

use super::AdmError;

/// Rotor-equivalent wind speed of a velocity field sampled by a kernel.
///
/// Computes `M · Σ(field ⊙ kernel)` over the whole domain. With a kernel that
/// sums to one this is a kernel-weighted average of the disk-normal velocity.
///
/// # Panics
///
/// Panics if `field` and `kernel` have different shapes.
/// Use [`check_alignment`] first when the shapes are not known to agree.
#[must_use]
pub fn rotor_equivalent_wind_speed(
    field: ArrayView3<'_, f64>,
    kernel: ArrayView3<'_, f64>,
    correction: f64,
) -> f64 {
    Zip::from(&field)
        .and(&kernel)
        .fold(0.0, |sum, &u, &k| sum + u * k)
        * correction
}

/// Checks that a velocity field has the same shape as the kernel sampling it.
///
/// # Errors
///
/// Returns [`AdmError::ShapeMismatch`] if the shapes differ.
pub fn check_alignment(
    field: &ArrayView3<'_, f64>,
    kernel: &ArrayView3<'_, f64>,
) -> Result<(), AdmError> {
    if field.shape() == kernel.shape() {
        Ok(())
    } else {
        Err(AdmError::ShapeMismatch {
            field: field.shape().to_vec(),
            kernel: kernel.shape().to_vec(),
        })
    }
}
