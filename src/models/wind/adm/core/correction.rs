use std::f64::consts::PI;

use crate::support::constraint::{
    Constrained, ConstraintResult, NonNegative, StrictlyPositive, UnitIntervalLowerOpen,
};

/// Filtering correction factor `M` for a smoothed actuator disk.
///
/// Smoothing the disk forcing with a Gaussian of width `filter_width` biases
/// the sampled disk velocity. A first-order Taylor expansion of that bias
/// (Shapiro et al., 2019) gives
///
/// ```text
/// M = 1 / (1 + C_T' / 2 · Δ / sqrt(3π) / D)
/// ```
///
/// which rescales a rotor-equivalent wind speed toward the unfiltered value.
/// `M` tends to one as the filter width vanishes.
///
/// # Errors
///
/// Returns an error if `ct` or `filter_width` is negative, if `diameter` is
/// not strictly positive, or if the result falls outside `(0, 1]` (for an
/// infinite thrust coefficient).
pub fn correction_factor(
    ct: f64,
    filter_width: f64,
    diameter: f64,
) -> ConstraintResult<Constrained<f64, UnitIntervalLowerOpen>> {
    let ct = NonNegative::new(ct)?.into_inner();
    let filter_width = NonNegative::new(filter_width)?.into_inner();
    let diameter = StrictlyPositive::new(diameter)?.into_inner();

    UnitIntervalLowerOpen::new(1.0 / (1.0 + ct / 2.0 * filter_width / (3.0 * PI).sqrt() / diameter))
}
