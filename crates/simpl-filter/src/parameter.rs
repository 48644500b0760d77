//! Typed filter parameters.
//!
//! Filters expose their configuration as a list of [`ParameterSpec`]s and
//! get/set values by key as [`ParameterValue`]s. Pipeline files store the
//! same values, tagged by kind.

use serde::{Deserialize, Serialize};
use simpl_core::{AttributeMatrixType, DataArrayPath, NumericType, ParameterError};
use std::fmt;
use std::path::PathBuf;

/// How a parameter relates to the data structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterCategory {
    /// A plain setting.
    Parameter,
    /// Path of an input that must already exist.
    RequiredArray,
    /// Path of an output the filter creates.
    CreatedArray,
    /// Anything else.
    Uncategorized,
}

/// Kind of value a parameter holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// `bool`.
    Bool,
    /// `i64`.
    Int,
    /// `f64`.
    Float,
    /// Free text.
    String,
    /// A data structure path.
    Path,
    /// Several data structure paths.
    PathList,
    /// A file system path.
    FilePath,
    /// An element type.
    NumericType,
    /// An attribute matrix type.
    MatrixType,
    /// A shape.
    Dims,
    /// Several floats.
    FloatVec,
}

impl ParameterKind {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Path => "path",
            Self::PathList => "path_list",
            Self::FilePath => "file_path",
            Self::NumericType => "numeric_type",
            Self::MatrixType => "matrix_type",
            Self::Dims => "dims",
            Self::FloatVec => "float_vec",
        }
    }
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parameter value.
///
/// Serializes adjacently tagged: `{"type": "path", "value": "C/M/X"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ParameterValue {
    /// `bool`.
    Bool(bool),
    /// `i64`.
    Int(i64),
    /// `f64`.
    Float(f64),
    /// Free text.
    String(String),
    /// A data structure path.
    Path(DataArrayPath),
    /// Several data structure paths.
    PathList(Vec<DataArrayPath>),
    /// A file system path.
    FilePath(PathBuf),
    /// An element type.
    NumericType(NumericType),
    /// An attribute matrix type.
    MatrixType(AttributeMatrixType),
    /// A shape.
    Dims(Vec<usize>),
    /// Several floats.
    FloatVec(Vec<f64>),
}

impl ParameterValue {
    /// Kind of this value.
    pub fn kind(&self) -> ParameterKind {
        match self {
            Self::Bool(_) => ParameterKind::Bool,
            Self::Int(_) => ParameterKind::Int,
            Self::Float(_) => ParameterKind::Float,
            Self::String(_) => ParameterKind::String,
            Self::Path(_) => ParameterKind::Path,
            Self::PathList(_) => ParameterKind::PathList,
            Self::FilePath(_) => ParameterKind::FilePath,
            Self::NumericType(_) => ParameterKind::NumericType,
            Self::MatrixType(_) => ParameterKind::MatrixType,
            Self::Dims(_) => ParameterKind::Dims,
            Self::FloatVec(_) => ParameterKind::FloatVec,
        }
    }

    /// Convert into `T`, or fail with [`ParameterError::WrongType`] naming
    /// `key`.
    ///
    /// An `Int` is accepted where a `Float` is expected.
    pub fn extract<T: FromParameter>(self, key: &str) -> Result<T, ParameterError> {
        let actual = self.kind();
        T::from_parameter(self).ok_or_else(|| ParameterError::WrongType {
            key: key.to_string(),
            expected: T::KIND.name(),
            actual: actual.name(),
        })
    }
}

/// A Rust type a [`ParameterValue`] can be converted into.
pub trait FromParameter: Sized {
    /// The kind of value expected.
    const KIND: ParameterKind;

    /// Unwrap the matching variant.
    fn from_parameter(value: ParameterValue) -> Option<Self>;
}

macro_rules! parameter_conversions {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ParameterValue {
                fn from(v: $ty) -> Self {
                    ParameterValue::$variant(v)
                }
            }

            impl FromParameter for $ty {
                const KIND: ParameterKind = ParameterKind::$variant;

                fn from_parameter(value: ParameterValue) -> Option<Self> {
                    match value {
                        ParameterValue::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

parameter_conversions! {
    bool => Bool,
    i64 => Int,
    String => String,
    DataArrayPath => Path,
    Vec<DataArrayPath> => PathList,
    PathBuf => FilePath,
    NumericType => NumericType,
    AttributeMatrixType => MatrixType,
    Vec<usize> => Dims,
    Vec<f64> => FloatVec,
}

impl From<f64> for ParameterValue {
    fn from(v: f64) -> Self {
        ParameterValue::Float(v)
    }
}

impl FromParameter for f64 {
    const KIND: ParameterKind = ParameterKind::Float;

    fn from_parameter(value: ParameterValue) -> Option<Self> {
        match value {
            ParameterValue::Float(v) => Some(v),
            ParameterValue::Int(v) => Some(v as f64),
            _ => None,
        }
    }
}

impl From<&str> for ParameterValue {
    fn from(v: &str) -> Self {
        ParameterValue::String(v.to_string())
    }
}

/// Static description of one filter parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParameterSpec {
    /// Key used by `parameter`/`set_parameter` and in pipeline files.
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Relation to the data structure.
    pub category: ParameterCategory,
    /// Value kind.
    pub kind: ParameterKind,
}

impl ParameterSpec {
    /// A spec in the [`ParameterCategory::Parameter`] category.
    pub const fn new(key: &'static str, label: &'static str, kind: ParameterKind) -> Self {
        Self {
            key,
            label,
            category: ParameterCategory::Parameter,
            kind,
        }
    }

    /// A required input path.
    pub const fn required(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            category: ParameterCategory::RequiredArray,
            kind: ParameterKind::Path,
        }
    }

    /// A created output path.
    pub const fn created(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            category: ParameterCategory::CreatedArray,
            kind: ParameterKind::Path,
        }
    }

    /// The same spec in another category.
    pub const fn with_category(mut self, category: ParameterCategory) -> Self {
        self.category = category;
        self
    }
}

/// The error a filter returns for a key it does not know.
pub fn unknown_parameter(filter: &str, key: &str) -> ParameterError {
    ParameterError::UnknownParameter {
        filter: filter.to_string(),
        key: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_matching_variant() {
        let v = ParameterValue::from(DataArrayPath::new("C", "M", "X"));
        let p: DataArrayPath = v.extract("InputArray").unwrap();
        assert_eq!(p.to_string(), "C/M/X");
    }

    #[test]
    fn extract_wrong_variant_names_both_kinds() {
        let err = ParameterValue::Bool(true)
            .extract::<Vec<usize>>("Dims")
            .unwrap_err();
        assert_eq!(
            err,
            ParameterError::WrongType {
                key: "Dims".into(),
                expected: "dims",
                actual: "bool",
            }
        );
    }

    #[test]
    fn int_widens_to_float() {
        assert_eq!(ParameterValue::Int(3).extract::<f64>("k"), Ok(3.0));
        assert!(ParameterValue::Float(3.0).extract::<i64>("k").is_err());
    }

    #[test]
    fn serde_is_adjacently_tagged() {
        let v = ParameterValue::NumericType(NumericType::Float32);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["type"], "numeric_type");
        assert_eq!(json["value"], "float32");
        let back: ParameterValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);

        let path: ParameterValue =
            serde_json::from_str(r#"{"type":"path","value":"C/M/X"}"#).unwrap();
        assert_eq!(path, ParameterValue::Path(DataArrayPath::new("C", "M", "X")));
    }

    #[test]
    fn kinds_match_variants() {
        assert_eq!(ParameterValue::from("x").kind(), ParameterKind::String);
        assert_eq!(
            ParameterValue::from(vec![1usize, 2]).kind(),
            ParameterKind::Dims
        );
        assert_eq!(
            ParameterValue::from(PathBuf::from("a.json")).kind(),
            ParameterKind::FilePath
        );
    }
}
