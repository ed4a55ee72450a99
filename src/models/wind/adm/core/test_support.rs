//! Shared fixtures for actuator disk tests.

use super::{Grid, Turbine, TurbineParams};

/// A cube spanning `[-2, 2]` on every axis with spacing `0.05`.
pub(crate) fn unit_grid() -> Grid {
    Grid::uniform(-2.0, 2.0, 81).unwrap()
}

/// A unit-diameter turbine at the origin with `C_T' = 2` and filter width `0.2`.
pub(crate) fn reference_turbine() -> Turbine {
    let params = TurbineParams::new(0.0, 0.0, 0.0, 2.0, 1.0)
        .unwrap()
        .with_filter_width(0.2)
        .unwrap();
    Turbine::new(params)
}
