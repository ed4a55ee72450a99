//! Turbine parameters and how they are read from configuration.

use serde::Deserialize;
use uom::si::{angle::degree, f64::Angle};

use crate::support::{
    constraint::{Constrained, NonNegative, StrictlyPositive},
    namelist::Namelist,
};

use super::AdmError;

/// Geometry and operating parameters of a single actuator disk.
///
/// Coordinates are in simulation units and locate the disk center.
/// Values are validated at construction and immutable afterwards.
///
/// Parameters can be read from a nested [`Namelist`] with
/// [`TurbineParams::from_namelist`], or deserialized from a flat record:
///
/// ```
/// use twine_wind_models::models::wind::adm::TurbineParams;
///
/// let params: TurbineParams = serde_json::from_str(
///     r#"{ "xloc": 5.0, "yloc": 2.5, "zloc": 0.7, "ct": 1.33, "diam": 1.0, "yaw": 20.0 }"#,
/// )
/// .unwrap();
///
/// assert_eq!(params.xloc, 5.0);
/// assert!(!params.use_correction);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "ParamRecord")]
pub struct TurbineParams {
    pub xloc: f64,
    pub yloc: f64,
    pub zloc: f64,

    /// Local thrust coefficient `C_T'`.
    pub ct: Constrained<f64, NonNegative>,

    /// Rotor diameter.
    pub diam: Constrained<f64, StrictlyPositive>,

    /// Rotation of the disk normal about the vertical axis.
    pub yaw: Angle,

    /// Rotation of the disk normal about the horizontal axis.
    pub tilt: Angle,

    /// Gaussian smoothing length scale, required only to build a kernel.
    pub filter_width: Option<Constrained<f64, StrictlyPositive>>,

    /// Whether sampled wind speeds get the filtering correction factor.
    pub use_correction: bool,
}

impl TurbineParams {
    /// Namelist keys that must be present, in the order they are checked.
    pub const REQUIRED: [&'static str; 5] = ["xloc", "yloc", "zloc", "ct", "diam"];

    /// Creates parameters for an unyawed, untilted disk without a filter width.
    ///
    /// # Errors
    ///
    /// Returns [`AdmError::InvalidParameter`] if `ct` is negative or `diam` is
    /// not strictly positive.
    pub fn new(xloc: f64, yloc: f64, zloc: f64, ct: f64, diam: f64) -> Result<Self, AdmError> {
        Ok(Self {
            xloc,
            yloc,
            zloc,
            ct: NonNegative::new(ct).map_err(|err| AdmError::invalid("ct", err))?,
            diam: StrictlyPositive::new(diam).map_err(|err| AdmError::invalid("diam", err))?,
            yaw: Angle::new::<degree>(0.0),
            tilt: Angle::new::<degree>(0.0),
            filter_width: None,
            use_correction: false,
        })
    }

    /// Reads parameters from a nested namelist.
    ///
    /// Keys are resolved with [`Namelist::find`], so they may appear at any
    /// depth. Angles are read in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`AdmError::MissingParameter`] naming the first absent key of
    /// [`Self::REQUIRED`], or [`AdmError::InvalidParameter`] for a value of the
    /// wrong type or outside its valid range.
    pub fn from_namelist(namelist: &Namelist) -> Result<Self, AdmError> {
        let number = |name: &'static str| {
            namelist
                .find_f64(name)
                .map_err(|err| AdmError::invalid(name, err))
        };
        let required = |name: &'static str| -> Result<f64, AdmError> {
            number(name)?.ok_or(AdmError::MissingParameter { name })
        };

        let record = ParamRecord {
            xloc: required("xloc")?,
            yloc: required("yloc")?,
            zloc: required("zloc")?,
            ct: required("ct")?,
            diam: required("diam")?,
            yaw: number("yaw")?.unwrap_or_default(),
            tilt: number("tilt")?.unwrap_or_default(),
            filterwidth: number("filterwidth")?,
            usecorrection: namelist
                .find_bool("usecorrection")
                .map_err(|err| AdmError::invalid("usecorrection", err))?
                .unwrap_or_default(),
        };

        Self::try_from(record)
    }

    /// Returns these parameters with the given yaw.
    #[must_use]
    pub fn with_yaw(self, yaw: Angle) -> Self {
        Self { yaw, ..self }
    }

    /// Returns these parameters with the given tilt.
    #[must_use]
    pub fn with_tilt(self, tilt: Angle) -> Self {
        Self { tilt, ..self }
    }

    /// Returns these parameters with the given filter width.
    ///
    /// # Errors
    ///
    /// Returns [`AdmError::InvalidParameter`] if the width is not strictly positive.
    pub fn with_filter_width(self, filter_width: f64) -> Result<Self, AdmError> {
        let filter_width = StrictlyPositive::new(filter_width)
            .map_err(|err| AdmError::invalid("filterwidth", err))?;
        Ok(Self {
            filter_width: Some(filter_width),
            ..self
        })
    }

    /// Returns these parameters with the filtering correction switched on or off.
    #[must_use]
    pub fn with_correction(self, use_correction: bool) -> Self {
        Self {
            use_correction,
            ..self
        }
    }

    /// Disk-center coordinates `[xloc, yloc, zloc]`.
    #[must_use]
    pub fn position(&self) -> [f64; 3] {
        [self.xloc, self.yloc, self.zloc]
    }

    /// Rotor radius.
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.diam.as_ref() / 2.0
    }
}

/// Unvalidated parameters as they appear in configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
struct ParamRecord {
    xloc: f64,
    yloc: f64,
    zloc: f64,
    ct: f64,
    diam: f64,
    #[serde(default)]
    yaw: f64,
    #[serde(default)]
    tilt: f64,
    #[serde(default)]
    filterwidth: Option<f64>,
    #[serde(default)]
    usecorrection: bool,
}

impl TryFrom<ParamRecord> for TurbineParams {
    type Error = AdmError;

    fn try_from(record: ParamRecord) -> Result<Self, Self::Error> {
        let params = Self::new(record.xloc, record.yloc, record.zloc, record.ct, record.diam)?
            .with_yaw(Angle::new::<degree>(record.yaw))
            .with_tilt(Angle::new::<degree>(record.tilt))
            .with_correction(record.usecorrection);

        match record.filterwidth {
            Some(width) => params.with_filter_width(width),
            None => Ok(params),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use serde_json::json;

    fn namelist(value: serde_json::Value) -> Namelist {
        Namelist::try_from(value).unwrap()
    }

    #[test]
    fn reads_nested_namelist() {
        let nml = namelist(json!({
            "input": { "nx": 64 },
            "ad_coriolisinput": {
                "actuatordisk": {
                    "xloc": 5.0, "yloc": 2.5, "zloc": 0.7,
                    "ct": 1.33, "diam": 1,
                    "yaw": 25.0, "filterwidth": 0.08, "usecorrection": ".true.",
                },
            },
        }));

        let params = TurbineParams::from_namelist(&nml).unwrap();
        assert_eq!(params.position(), [5.0, 2.5, 0.7]);
        assert_relative_eq!(*params.ct.as_ref(), 1.33);
        assert_relative_eq!(params.radius(), 0.5);
        assert_relative_eq!(params.yaw.get::<degree>(), 25.0, epsilon = 1e-12);
        assert_relative_eq!(params.tilt.get::<degree>(), 0.0);
        assert_relative_eq!(*params.filter_width.unwrap().as_ref(), 0.08);
        assert!(params.use_correction);
    }

    #[test]
    fn optional_fields_default() {
        let nml = namelist(json!({ "xloc": 0, "yloc": 0, "zloc": 0, "ct": 2, "diam": 1 }));
        let params = TurbineParams::from_namelist(&nml).unwrap();
        assert_eq!(params.filter_width, None);
        assert!(!params.use_correction);
        assert_relative_eq!(params.yaw.get::<degree>(), 0.0);
    }

    #[test]
    fn names_the_first_missing_parameter() {
        let nml = namelist(json!({ "xloc": 0, "zloc": 0, "diam": 1 }));
        assert!(matches!(
            TurbineParams::from_namelist(&nml),
            Err(AdmError::MissingParameter { name: "yloc" })
        ));

        let nml = namelist(json!({ "xloc": 0, "yloc": 0, "zloc": 0, "diam": 1 }));
        assert!(matches!(
            TurbineParams::from_namelist(&nml),
            Err(AdmError::MissingParameter { name: "ct" })
        ));
    }

    #[test]
    fn rejects_invalid_values() {
        let nml = namelist(json!({ "xloc": 0, "yloc": 0, "zloc": 0, "ct": 2, "diam": 0 }));
        assert!(matches!(
            TurbineParams::from_namelist(&nml),
            Err(AdmError::InvalidParameter { name: "diam", .. })
        ));

        let nml = namelist(json!({
            "xloc": 0, "yloc": 0, "zloc": 0, "ct": 2, "diam": 1, "filterwidth": "wide",
        }));
        assert!(matches!(
            TurbineParams::from_namelist(&nml),
            Err(AdmError::InvalidParameter { name: "filterwidth", .. })
        ));
    }

    #[test]
    fn deserializes_flat_record() {
        let params: TurbineParams = serde_json::from_value(json!({
            "xloc": 1.0, "yloc": 2.0, "zloc": 3.0, "ct": 1.0, "diam": 2.0,
            "tilt": -5.0, "filterwidth": 0.1, "usecorrection": true,
        }))
        .unwrap();
        assert_relative_eq!(params.tilt.get::<degree>(), -5.0, epsilon = 1e-12);
        assert!(params.use_correction);

        let err = serde_json::from_value::<TurbineParams>(json!({
            "xloc": 1.0, "yloc": 2.0, "zloc": 3.0, "ct": -1.0, "diam": 2.0,
        }));
        assert!(err.is_err());
    }
}
