//! Structured grids defined by three coordinate axes.

use std::ops::Range;

use ndarray::Array1;

use super::AdmError;

/// A structured grid given by strictly increasing `x`, `y`, and `z` axes.
///
/// Spacing is taken from the first two points of each axis, so axes are
/// expected to be uniform.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    x: Array1<f64>,
    y: Array1<f64>,
    z: Array1<f64>,
}

impl Grid {
    /// Builds a grid from its coordinate axes.
    ///
    /// # Errors
    ///
    /// Returns [`AdmError::InvalidGrid`] if an axis has fewer than two points
    /// or is not strictly increasing.
    pub fn new(x: Array1<f64>, y: Array1<f64>, z: Array1<f64>) -> Result<Self, AdmError> {
        check_axis('x', &x)?;
        check_axis('y', &y)?;
        check_axis('z', &z)?;
        Ok(Self { x, y, z })
    }

    /// Builds a grid of `n` evenly spaced points from `start` to `end` on every axis.
    ///
    /// # Errors
    ///
    /// Returns [`AdmError::InvalidGrid`] if `n < 2` or `end <= start`.
    pub fn uniform(start: f64, end: f64, n: usize) -> Result<Self, AdmError> {
        let axis = Array1::linspace(start, end, n);
        Self::new(axis.clone(), axis.clone(), axis)
    }

    #[must_use]
    pub fn x(&self) -> &Array1<f64> {
        &self.x
    }

    #[must_use]
    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    #[must_use]
    pub fn z(&self) -> &Array1<f64> {
        &self.z
    }

    /// Number of nodes along each axis.
    #[must_use]
    pub fn shape(&self) -> [usize; 3] {
        [self.x.len(), self.y.len(), self.z.len()]
    }

    /// Node spacing `[dx, dy, dz]`.
    #[must_use]
    pub fn spacing(&self) -> [f64; 3] {
        [
            self.x[1] - self.x[0],
            self.y[1] - self.y[0],
            self.z[1] - self.z[0],
        ]
    }

    /// Resolves a bounding box to index ranges on each axis.
    ///
    /// Each range runs from the node nearest `lower` through the node nearest
    /// `upper`, inclusive. Boxes that stick out of the grid are clipped to its
    /// edges, so every range holds at least one node.
    #[must_use]
    pub fn index_box(&self, lower: [f64; 3], upper: [f64; 3]) -> [Range<usize>; 3] {
        [
            index_range(&self.x, lower[0], upper[0]),
            index_range(&self.y, lower[1], upper[1]),
            index_range(&self.z, lower[2], upper[2]),
        ]
    }
}

fn check_axis(axis: char, values: &Array1<f64>) -> Result<(), AdmError> {
    if values.len() < 2 {
        return Err(AdmError::InvalidGrid {
            axis,
            reason: "at least two points are required",
        });
    }

    // Written so that NaN fails the check.
    let increasing = values
        .windows(2)
        .into_iter()
        .all(|pair| pair[1] > pair[0]);
    if !increasing {
        return Err(AdmError::InvalidGrid {
            axis,
            reason: "points must be strictly increasing",
        });
    }

    Ok(())
}

fn index_range(axis: &Array1<f64>, lower: f64, upper: f64) -> Range<usize> {
    let start = nearest(axis, lower);
    let end = nearest(axis, upper).max(start);
    start..end + 1
}

/// Index of the axis node closest to `value`, preferring the lower index on ties.
fn nearest(axis: &Array1<f64>, value: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, &node) in axis.iter().enumerate() {
        let distance = (node - value).abs();
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}
