//! The turbine entity: parameters plus lazily computed kernel and correction.

use std::{cmp::Ordering, fmt};

use ndarray::{Array3, ArrayView3};
use uom::si::f64::Power;

use crate::support::{
    constraint::{Constrained, UnitIntervalLowerOpen},
    namelist::Namelist,
};

use super::{
    AdmError, ControlPoints, Grid, KernelType, Normalization, SortKey, TurbineParams,
    correction::correction_factor,
    kernel::{DEFAULT_BUFFER_FACTOR, synthesize_kernel},
    power::turbine_power,
    rews::{check_alignment, rotor_equivalent_wind_speed},
};

/// A lazily computed value.
///
/// `Invalidated` marks a value that was computed and then explicitly
/// discarded, as distinct from one that was never computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cached<T> {
    #[default]
    Unset,
    Computed(T),
    Invalidated,
}

impl<T> Cached<T> {
    /// Returns the cached value, if one is held.
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Computed(value) => Some(value),
            Self::Unset | Self::Invalidated => None,
        }
    }

    #[must_use]
    pub fn is_computed(&self) -> bool {
        matches!(self, Self::Computed(_))
    }

    fn invalidate(&mut self) {
        if self.is_computed() {
            *self = Self::Invalidated;
        }
    }
}

/// Options for building an actuator disk kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelRequest {
    /// ADM type code; only type 5 is supported.
    pub adm_type: u32,

    /// Filter width overriding the turbine's configured one.
    pub filter_width: Option<f64>,

    /// Sub-box padding around the disk, in filter widths.
    pub buffer_factor: f64,

    /// Whether the kernel sums or integrates to one.
    pub normalization: Normalization,

    /// Rebuild the kernel even if one is already cached.
    pub overwrite: bool,
}

impl Default for KernelRequest {
    fn default() -> Self {
        Self {
            adm_type: KernelType::SmoothedDisk.code(),
            filter_width: None,
            buffer_factor: DEFAULT_BUFFER_FACTOR,
            normalization: Normalization::Sum,
            overwrite: false,
        }
    }
}

/// A single actuator disk turbine.
///
/// The kernel and correction factor are computed on first use and cached
/// until explicitly overwritten or invalidated.
///
/// # Example
///
/// ```
/// use ndarray::Array3;
/// use twine_wind_models::models::wind::adm::{Grid, KernelRequest, Turbine, TurbineParams};
///
/// let params = TurbineParams::new(0.0, 0.0, 0.0, 2.0, 1.0)?.with_filter_width(0.2)?;
/// let mut turbine = Turbine::new(params);
///
/// let grid = Grid::uniform(-2.0, 2.0, 41)?;
/// turbine.kernel(&grid, &KernelRequest::default())?;
///
/// let field = Array3::from_elem((41, 41, 41), 8.0);
/// let speed = turbine.rews(field.view(), None)?;
/// assert!((speed - 8.0).abs() < 1e-9);
/// # Ok::<(), twine_wind_models::models::wind::adm::AdmError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Turbine {
    params: TurbineParams,
    index: Option<usize>,
    sort_key: SortKey,
    kernel: Cached<Array3<f64>>,
    correction: Cached<f64>,
    kernel_builds: usize,
}

impl Turbine {
    #[must_use]
    pub fn new(params: TurbineParams) -> Self {
        let turbine = Self {
            params,
            index: None,
            sort_key: SortKey::default(),
            kernel: Cached::Unset,
            correction: Cached::Unset,
            kernel_builds: 0,
        };
        log::debug!("initialized {turbine}");
        turbine
    }

    /// Builds a turbine from a nested namelist.
    ///
    /// # Errors
    ///
    /// Returns an error if a required parameter is missing or invalid.
    /// See [`TurbineParams::from_namelist`].
    pub fn from_namelist(namelist: &Namelist) -> Result<Self, AdmError> {
        TurbineParams::from_namelist(namelist).map(Self::new)
    }

    /// Sets the turbine's position in an external turbine array.
    #[must_use]
    pub fn with_index(self, index: usize) -> Self {
        Self {
            index: Some(index),
            ..self
        }
    }

    #[must_use]
    pub fn params(&self) -> &TurbineParams {
        &self.params
    }

    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Disk-center coordinates `[xloc, yloc, zloc]`.
    #[must_use]
    pub fn position(&self) -> [f64; 3] {
        self.params.position()
    }

    #[must_use]
    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Sets the field used by [`Turbine::sort_array`], by name.
    ///
    /// # Errors
    ///
    /// Returns [`AdmError::InvalidSortKey`] if the name is not a turbine field,
    /// or names an optional field this turbine does not have.
    pub fn set_sort(&mut self, name: &str) -> Result<(), AdmError> {
        let key: SortKey = name.parse()?;
        if key.value(&self.params, self.index).is_none() {
            return Err(AdmError::InvalidSortKey {
                key: name.to_owned(),
            });
        }
        self.sort_key = key;
        Ok(())
    }

    /// Orders two turbines by `key`.
    ///
    /// With [`SortKey::Xloc`], turbines are ordered by `xloc`, then `yloc`.
    /// Turbines missing an optional field order after those that have it.
    #[must_use]
    pub fn cmp_by(&self, other: &Self, key: SortKey) -> Ordering {
        key.compare((&self.params, self.index), (&other.params, other.index))
    }

    /// Sorts a turbine array in place by a single key.
    ///
    /// The sort is stable, so turbines that compare equal keep their order.
    pub fn sort_array_by(turbines: &mut [Self], key: SortKey) {
        turbines.sort_by(|lhs, rhs| lhs.cmp_by(rhs, key));
    }

    /// Sorts a turbine array in place by the first turbine's sort key.
    ///
    /// The array is ordered by one key even if its turbines were configured
    /// with different ones.
    pub fn sort_array(turbines: &mut [Self]) {
        let key = turbines.first().map(Self::sort_key).unwrap_or_default();
        log::debug!("sorting {} turbines by {key}", turbines.len());
        Self::sort_array_by(turbines, key);
    }

    /// Returns the correction factor, computing and caching it on first use.
    ///
    /// The factor is `1.0` unless the turbine has a filter width and
    /// `use_correction` is set.
    ///
    /// # Errors
    ///
    /// Returns [`AdmError::Constraint`] if the factor falls outside `(0, 1]`.
    pub fn correction(&mut self) -> Result<f64, AdmError> {
        if let Some(&factor) = self.correction.get() {
            return Ok(factor);
        }
        let factor = self.evaluate_correction()?.into_inner();
        self.correction = Cached::Computed(factor);
        Ok(factor)
    }

    /// Evaluates the correction factor without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns [`AdmError::Constraint`] if the factor falls outside `(0, 1]`.
    pub fn evaluate_correction(
        &self,
    ) -> Result<Constrained<f64, UnitIntervalLowerOpen>, AdmError> {
        match self.params.filter_width {
            Some(width) if self.params.use_correction => Ok(correction_factor(
                *self.params.ct.as_ref(),
                width.into_inner(),
                *self.params.diam.as_ref(),
            )?),
            _ => Ok(UnitIntervalLowerOpen::one()),
        }
    }

    /// Returns the cached correction factor state.
    #[must_use]
    pub fn cached_correction(&self) -> &Cached<f64> {
        &self.correction
    }

    /// Discards the cached correction factor.
    pub fn invalidate_correction(&mut self) {
        self.correction.invalidate();
    }

    /// Control points of this turbine's disk for the grid's spacing.
    #[must_use]
    pub fn control_points(&self, grid: &Grid) -> ControlPoints {
        let [_, dy, dz] = grid.spacing();
        ControlPoints::for_turbine(&self.params, dy, dz)
    }

    /// Returns the turbine's kernel on `grid`, building and caching it if needed.
    ///
    /// A cached kernel is returned as is unless `request.overwrite` is set.
    /// The caller is responsible for passing the grid the cache was built on.
    /// The ADM type is checked first, even when a kernel is cached.
    ///
    /// # Errors
    ///
    /// See [`Turbine::compute_kernel`].
    pub fn kernel(
        &mut self,
        grid: &Grid,
        request: &KernelRequest,
    ) -> Result<&Array3<f64>, AdmError> {
        KernelType::try_from(request.adm_type)?;
        if request.overwrite || !self.kernel.is_computed() {
            let kernel = self.compute_kernel(grid, request)?;
            self.kernel = Cached::Computed(kernel);
            self.kernel_builds += 1;
            log::debug!("computed kernel for {self}");
        }
        self.kernel.get().ok_or(AdmError::MissingKernel)
    }

    /// Builds a kernel for this turbine without caching it.
    ///
    /// # Errors
    ///
    /// - [`AdmError::UnsupportedKernelType`] for any ADM type other than 5.
    /// - [`AdmError::MissingFilterWidth`] if neither the request nor the
    ///   turbine provides a filter width.
    /// - [`AdmError::DegenerateKernel`] if the disk has no support on the grid.
    pub fn compute_kernel(
        &self,
        grid: &Grid,
        request: &KernelRequest,
    ) -> Result<Array3<f64>, AdmError> {
        match KernelType::try_from(request.adm_type)? {
            KernelType::SmoothedDisk => {
                let filter_width = request
                    .filter_width
                    .or_else(|| self.params.filter_width.map(|width| width.into_inner()))
                    .ok_or(AdmError::MissingFilterWidth)?;

                synthesize_kernel(
                    grid,
                    &self.control_points(grid),
                    filter_width,
                    request.buffer_factor,
                    request.normalization,
                )
            }
        }
    }

    /// Returns the cached kernel, if any.
    #[must_use]
    pub fn cached_kernel(&self) -> Option<&Array3<f64>> {
        self.kernel.get()
    }

    /// Discards the cached kernel.
    pub fn invalidate_kernel(&mut self) {
        self.kernel.invalidate();
    }

    /// Number of kernels this turbine has built into its cache.
    #[must_use]
    pub fn kernel_builds(&self) -> usize {
        self.kernel_builds
    }

    /// Rotor-equivalent wind speed of a disk-normal velocity field.
    ///
    /// Samples with `kernel` if given, otherwise with the cached kernel, and
    /// applies the correction factor (computed and cached on first use).
    ///
    /// # Errors
    ///
    /// - [`AdmError::MissingKernel`] if no kernel is given or cached.
    /// - [`AdmError::ShapeMismatch`] if the field and kernel shapes differ.
    pub fn rews(
        &mut self,
        field: ArrayView3<'_, f64>,
        kernel: Option<ArrayView3<'_, f64>>,
    ) -> Result<f64, AdmError> {
        if kernel.is_none() && !self.kernel.is_computed() {
            return Err(AdmError::MissingKernel);
        }

        let correction = self.correction()?;

        let kernel = match kernel {
            Some(kernel) => kernel.reborrow(),
            None => self.kernel.get().ok_or(AdmError::MissingKernel)?.view(),
        };
        check_alignment(&field, &kernel)?;

        Ok(rotor_equivalent_wind_speed(field, kernel, correction))
    }

    /// Power at a known disk velocity, with unit density and `C_P' = C_T'`.
    #[must_use]
    pub fn power_from_speed(&self, disk_speed: f64) -> Power {
        turbine_power(&self.params, disk_speed)
    }

    /// Power from a velocity field, sampled with the cached kernel.
    ///
    /// # Errors
    ///
    /// See [`Turbine::rews`].
    pub fn power_from_field(&mut self, field: ArrayView3<'_, f64>) -> Result<Power, AdmError> {
        let disk_speed = self.rews(field, None)?;
        Ok(self.power_from_speed(disk_speed))
    }
}

impl fmt::Display for Turbine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "turbine at x={:.3}, y={:.3}, z={:.3}",
            self.params.xloc, self.params.yloc, self.params.zloc
        )
    }
}
