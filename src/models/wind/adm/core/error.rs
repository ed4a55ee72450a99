use thiserror::Error;

use crate::support::constraint::ConstraintError;

/// Errors that can occur while building or evaluating an actuator disk.
///
/// None of these are transient: each one reflects a configuration or usage
/// mistake and is returned to the caller unchanged.
#[derive(Debug, Error)]
pub enum AdmError {
    /// A required turbine parameter is absent from the configuration source.
    #[error("turbine input is missing required parameter `{name}`")]
    MissingParameter { name: &'static str },

    /// A turbine parameter is present but unusable.
    #[error("turbine parameter `{name}` is invalid")]
    InvalidParameter {
        name: &'static str,

        /// Why the value was rejected.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The requested sort key does not name a field of this turbine.
    #[error("`{key}` is not a sortable turbine field")]
    InvalidSortKey { key: String },

    /// A rotor-equivalent wind speed was requested without a kernel.
    #[error("no kernel has been computed or supplied")]
    MissingKernel,

    /// A kernel was requested without a filter width.
    #[error("no filter width in the turbine input or the kernel request")]
    MissingFilterWidth,

    /// Only ADM type 5 kernels are available.
    #[error("unsupported ADM kernel type {code}")]
    UnsupportedKernelType { code: u32 },

    /// A grid axis cannot define a structured grid.
    #[error("invalid {axis} axis: {reason}")]
    InvalidGrid { axis: char, reason: &'static str },

    /// A velocity field is not aligned with the kernel it is sampled with.
    #[error("velocity field shape {field:?} does not match kernel shape {kernel:?}")]
    ShapeMismatch { field: Vec<usize>, kernel: Vec<usize> },

    /// The kernel has no nonzero value on the grid, so it cannot be normalized.
    #[error("kernel has no support on the grid")]
    DegenerateKernel,

    /// A numeric constraint was violated.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
}

impl AdmError {
    /// Creates an invalid parameter error with its underlying cause.
    pub(super) fn invalid(
        name: &'static str,
        err: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InvalidParameter {
            name,
            source: Box::new(err),
        }
    }
}
