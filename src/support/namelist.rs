//! Nested key-value configuration sources.
//!
//! Simulation inputs arrive as namelists: groups of keyed values that may be
//! nested to any depth (for example, a turbine group inside an actuator disk
//! group). Consumers usually don't care which group a key lives in, so
//! [`Namelist`] resolves keys by recursive search.
//!
//! # Lookup order
//!
//! [`Namelist::find`] walks the tree depth-first in document order and returns
//! the first match. At each level a key is compared against the entry itself
//! before descending into that entry's children, so for
//!
//! ```json
//! { "a": { "diam": 2.0 }, "diam": 1.0 }
//! ```
//!
//! the nested `diam = 2.0` wins because its parent comes first.
//! Keys compare ASCII case-insensitively, matching Fortran namelist rules.
//! `null` values are treated as absent and the search continues.
//!
//! # Example
//!
//! ```
//! use twine_wind_models::support::namelist::Namelist;
//!
//! let nml = Namelist::from_json_str(
//!     r#"{ "actuator_disk": { "xLoc": 5.0, "useCorrection": true } }"#,
//! )
//! .unwrap();
//!
//! assert_eq!(nml.find_f64("xloc").unwrap(), Some(5.0));
//! assert_eq!(nml.find_bool("usecorrection").unwrap(), Some(true));
//! assert_eq!(nml.find_f64("yloc").unwrap(), None);
//! ```

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors that can occur while reading a [`Namelist`].
#[derive(Debug, Error)]
pub enum NamelistError {
    /// The source text is not valid JSON.
    #[error("failed to parse namelist")]
    Parse(#[from] serde_json::Error),

    /// The top-level value is not a table of keyed entries.
    #[error("namelist root must be a table, found {found}")]
    NotATable { found: &'static str },

    /// A key was found but holds a value of the wrong type.
    #[error("namelist key `{key}` should be {expected}, found {found}")]
    WrongType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A nested key-value configuration source.
///
/// Entries keep their document order, which defines lookup precedence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namelist(Map<String, Value>);

impl Namelist {
    /// Parses a namelist from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`NamelistError::Parse`] for malformed JSON and
    /// [`NamelistError::NotATable`] if the root is not an object.
    pub fn from_json_str(text: &str) -> Result<Self, NamelistError> {
        Self::try_from(serde_json::from_str::<Value>(text)?)
    }

    /// Returns the first value stored under `key` at any depth.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&Value> {
        search(&self.0, key)
    }

    /// Returns the first numeric value stored under `key`.
    ///
    /// Integers are widened to `f64`.
    ///
    /// # Errors
    ///
    /// Returns [`NamelistError::WrongType`] if the key holds a non-numeric value.
    pub fn find_f64(&self, key: &str) -> Result<Option<f64>, NamelistError> {
        self.find(key)
            .map(|value| {
                value.as_f64().ok_or_else(|| NamelistError::WrongType {
                    key: key.to_owned(),
                    expected: "a number",
                    found: kind(value),
                })
            })
            .transpose()
    }

    /// Returns the first logical value stored under `key`.
    ///
    /// Besides JSON booleans, the Fortran spellings `.true.`, `.false.`, `t`,
    /// and `f` are accepted in any case.
    ///
    /// # Errors
    ///
    /// Returns [`NamelistError::WrongType`] if the key holds a non-logical value.
    pub fn find_bool(&self, key: &str) -> Result<Option<bool>, NamelistError> {
        self.find(key)
            .map(|value| {
                logical(value).ok_or_else(|| NamelistError::WrongType {
                    key: key.to_owned(),
                    expected: "a logical",
                    found: kind(value),
                })
            })
            .transpose()
    }
}

impl TryFrom<Value> for Namelist {
    type Error = NamelistError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(NamelistError::NotATable {
                found: kind(&other),
            }),
        }
    }
}

impl From<Map<String, Value>> for Namelist {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn search<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    for (name, value) in map {
        if name.eq_ignore_ascii_case(key) && !value.is_null() {
            return Some(value);
        }
        if let Value::Object(inner) = value {
            if let Some(found) = search(inner, key) {
                return Some(found);
            }
        }
    }
    None
}

fn logical(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.to_ascii_lowercase().as_str() {
            ".true." | "t" | "true" => Some(true),
            ".false." | "f" | "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn namelist(value: Value) -> Namelist {
        Namelist::try_from(value).unwrap()
    }

    #[test]
    fn finds_keys_at_any_depth() {
        let nml = namelist(json!({
            "input": { "runid": 3 },
            "ad_coriolisinput": { "turbine": { "xloc": 4.5, "diam": 1 } },
        }));

        assert_eq!(nml.find_f64("xloc").unwrap(), Some(4.5));
        assert_eq!(nml.find_f64("diam").unwrap(), Some(1.0));
        assert_eq!(nml.find_f64("runid").unwrap(), Some(3.0));
        assert_eq!(nml.find_f64("ct").unwrap(), None);
    }

    #[test]
    fn first_match_in_document_order_wins() {
        let nml = namelist(json!({
            "first": { "deep": { "ct": 1.5 } },
            "ct": 2.0,
        }));
        assert_eq!(nml.find_f64("ct").unwrap(), Some(1.5));

        let nml = namelist(json!({
            "ct": 2.0,
            "first": { "deep": { "ct": 1.5 } },
        }));
        assert_eq!(nml.find_f64("ct").unwrap(), Some(2.0));
    }

    #[test]
    fn keys_are_case_insensitive() {
        let nml = namelist(json!({ "FilterWidth": 0.2 }));
        assert_eq!(nml.find_f64("filterwidth").unwrap(), Some(0.2));
    }

    #[test]
    fn null_values_are_skipped() {
        let nml = namelist(json!({ "yaw": null, "group": { "yaw": 10.0 } }));
        assert_eq!(nml.find_f64("yaw").unwrap(), Some(10.0));
    }

    #[test]
    fn fortran_logicals() {
        let nml = namelist(json!({ "a": ".TRUE.", "b": "f", "c": false, "d": 1 }));
        assert_eq!(nml.find_bool("a").unwrap(), Some(true));
        assert_eq!(nml.find_bool("b").unwrap(), Some(false));
        assert_eq!(nml.find_bool("c").unwrap(), Some(false));
        assert!(matches!(
            nml.find_bool("d"),
            Err(NamelistError::WrongType { ref key, .. }) if key == "d"
        ));
    }

    #[test]
    fn wrong_numeric_type_is_an_error() {
        let nml = namelist(json!({ "xloc": "upstream" }));
        assert!(matches!(
            nml.find_f64("xloc"),
            Err(NamelistError::WrongType {
                expected: "a number",
                found: "a string",
                ..
            })
        ));
    }

    #[test]
    fn root_must_be_a_table() {
        assert!(matches!(
            Namelist::from_json_str("[1, 2]"),
            Err(NamelistError::NotATable { found: "an array" })
        ));
        assert!(matches!(
            Namelist::from_json_str("{ not json"),
            Err(NamelistError::Parse(_))
        ));
    }
}
