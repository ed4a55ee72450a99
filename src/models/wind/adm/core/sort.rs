use std::{cmp::Ordering, fmt, str::FromStr};

use uom::si::angle::degree;

use super::{AdmError, TurbineParams};

/// Turbine field used to order a turbine array.
///
/// The default, [`SortKey::Xloc`], orders by streamwise position and breaks
/// ties with `yloc`. Every other key compares its own field only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortKey {
    #[default]
    Xloc,
    Yloc,
    Zloc,
    Ct,
    Diam,
    Yaw,
    Tilt,
    FilterWidth,
    /// Position in the external turbine array.
    Index,
}

impl SortKey {
    /// Configuration name of the field.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Xloc => "xloc",
            Self::Yloc => "yloc",
            Self::Zloc => "zloc",
            Self::Ct => "ct",
            Self::Diam => "diam",
            Self::Yaw => "yaw",
            Self::Tilt => "tilt",
            Self::FilterWidth => "filterwidth",
            Self::Index => "n",
        }
    }

    /// Reads the field from a turbine, or `None` if the turbine doesn't have it.
    pub(super) fn value(self, params: &TurbineParams, index: Option<usize>) -> Option<f64> {
        match self {
            Self::Xloc => Some(params.xloc),
            Self::Yloc => Some(params.yloc),
            Self::Zloc => Some(params.zloc),
            Self::Ct => Some(*params.ct.as_ref()),
            Self::Diam => Some(*params.diam.as_ref()),
            Self::Yaw => Some(params.yaw.get::<degree>()),
            Self::Tilt => Some(params.tilt.get::<degree>()),
            Self::FilterWidth => params.filter_width.map(|width| width.into_inner()),
            Self::Index => index.map(|n| n as f64),
        }
    }

    /// Compares two turbines by this key.
    ///
    /// Turbines missing an optional field sort after those that have it.
    pub(super) fn compare(
        self,
        (lhs, lhs_index): (&TurbineParams, Option<usize>),
        (rhs, rhs_index): (&TurbineParams, Option<usize>),
    ) -> Ordering {
        if self == Self::Xloc {
            return cmp_f64(lhs.xloc, rhs.xloc).then_with(|| cmp_f64(lhs.yloc, rhs.yloc));
        }

        match (self.value(lhs, lhs_index), self.value(rhs, rhs_index)) {
            (Some(a), Some(b)) => cmp_f64(a, b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Total order on floats in which `-0.0` and `0.0` are equal.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    if a == b {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

impl FromStr for SortKey {
    type Err = AdmError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key = match name.to_ascii_lowercase().as_str() {
            "xloc" => Self::Xloc,
            "yloc" => Self::Yloc,
            "zloc" => Self::Zloc,
            "ct" => Self::Ct,
            "diam" => Self::Diam,
            "yaw" => Self::Yaw,
            "tilt" => Self::Tilt,
            "filterwidth" => Self::FilterWidth,
            "n" => Self::Index,
            _ => {
                return Err(AdmError::InvalidSortKey {
                    key: name.to_owned(),
                });
            }
        };
        Ok(key)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for key in [
            SortKey::Xloc,
            SortKey::Yloc,
            SortKey::Zloc,
            SortKey::Ct,
            SortKey::Diam,
            SortKey::Yaw,
            SortKey::Tilt,
            SortKey::FilterWidth,
            SortKey::Index,
        ] {
            assert_eq!(key.name().parse::<SortKey>().unwrap(), key);
        }
        assert_eq!("XLOC".parse::<SortKey>().unwrap(), SortKey::Xloc);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert!(matches!(
            "hub_height".parse::<SortKey>(),
            Err(AdmError::InvalidSortKey { ref key }) if key == "hub_height"
        ));
    }

    #[test]
    fn xloc_breaks_ties_with_yloc() {
        let a = TurbineParams::new(1.0, 2.0, 0.0, 1.0, 1.0).unwrap();
        let b = TurbineParams::new(1.0, 1.0, 9.0, 1.0, 1.0).unwrap();
        let c = TurbineParams::new(0.0, 5.0, 0.0, 1.0, 1.0).unwrap();

        let cmp = |x, y| SortKey::Xloc.compare((x, None), (y, None));
        assert_eq!(cmp(&a, &b), Ordering::Greater);
        assert_eq!(cmp(&c, &a), Ordering::Less);
        assert_eq!(cmp(&a, &a), Ordering::Equal);
    }

    #[test]
    fn other_keys_ignore_position() {
        let a = TurbineParams::new(0.0, 0.0, 0.0, 1.0, 1.0).unwrap();
        let b = TurbineParams::new(9.0, 9.0, 0.0, 1.0, 1.0).unwrap();
        assert_eq!(
            SortKey::Zloc.compare((&a, None), (&b, None)),
            Ordering::Equal
        );
        assert_eq!(
            SortKey::Index.compare((&a, Some(3)), (&b, Some(1))),
            Ordering::Greater
        );
    }

    #[test]
    fn signed_zeros_compare_equal() {
        let a = TurbineParams::new(-0.0, 5.0, 0.0, 1.0, 1.0).unwrap();
        let b = TurbineParams::new(0.0, -1.0, -0.0, 1.0, 1.0).unwrap();
        assert_eq!(
            SortKey::Xloc.compare((&a, None), (&b, None)),
            Ordering::Greater
        );
        assert_eq!(
            SortKey::Zloc.compare((&a, None), (&b, None)),
            Ordering::Equal
        );
        assert_eq!(cmp_f64(-1.0, -0.0), Ordering::Less);
        assert_eq!(cmp_f64(f64::NAN, 1.0), Ordering::Greater);
    }
}
