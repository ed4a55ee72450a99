//! # Twine Wind Models
//!
//! Actuator disk turbine models for large-eddy simulation post-processing,
//! built for [Twine](https://github.com/isentropic-dev/twine).
//!
//! ## Crate layout
//!
//! - [`models`]: Domain-specific [`twine_core::Model`] implementations.
//!   The actuator disk model lives in [`models::wind::adm`].
//! - [`support`]: Supporting utilities used by models, such as numeric
//!   constraints and namelist lookups.
//!
//! ## Utility code lifecycle
//!
//! Modules in [`support`] are part of the public API because they're useful,
//! but their APIs are not stable. Breaking changes may occur as needed.
//!
//! Utility code starts in a model's internal `core` module and moves to
//! [`support`] once it is useful across models or domains.

pub mod models;
pub mod support;
