//! Error taxonomy for the SIMPL pipeline engine.
//!
//! Errors are organised by layer: [`DataError`] for the data structure
//! (arrays, matrices, containers), [`ParameterError`] for filter parameter
//! access, and [`FilterError`] for what a filter reports to the pipeline.
//! Every data and parameter error maps to an [`ErrorKind`] and a stable
//! negative integer code, so the code a host reports is the same no matter
//! which layer produced it.
//!
//! | Error | Kind | Code |
//! |-------|------|------|
//! | `InvalidName` | Configuration | -10001 |
//! | `IncompletePath` | Configuration | -10002 |
//! | `AlreadyExists` | Configuration | -10003 |
//! | `InvalidShape` | Configuration | -10004 |
//! | `ContainerNotFound` | NotFound | -10010 |
//! | `MatrixNotFound` | NotFound | -10011 |
//! | `ArrayNotFound` | NotFound | -10012 |
//! | `StaleHandle` | NotFound | -10013 |
//! | `TypeMismatch` | TypeMismatch | -10020 |
//! | `ComponentMismatch` | TypeMismatch | -10021 |
//! | `WrongGeometryType` | TypeMismatch | -10022 |
//! | `GeometryMismatch` | TypeMismatch | -10023 |
//! | `TupleCountMismatch` | Allocation | -10030 |
//! | `Allocation` | Allocation | -10031 |
//! | `PartialResize` | Allocation | -10032 |
//! | `UnknownParameter` | Configuration | -10040 |
//! | `WrongType` (parameter) | Configuration | -10041 |
//! | `InvalidValue` (parameter) | Configuration | -10042 |

use std::error::Error;
use std::fmt;

use crate::numeric::NumericType;

/// Broad classification of a failure.
///
/// Cancellation is deliberately absent: a cancelled run is a clean abort,
/// not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Missing or invalid input file, bad parameter, invalid name.
    Configuration,
    /// A referenced container, matrix, or array path does not resolve.
    NotFound,
    /// An array exists but has the wrong element type or shape.
    TypeMismatch,
    /// Creating or resizing storage failed.
    Allocation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Configuration => "configuration error",
            Self::NotFound => "not found",
            Self::TypeMismatch => "type mismatch",
            Self::Allocation => "allocation error",
        };
        f.write_str(s)
    }
}

// ── DataError ──────────────────────────────────────────────────────

/// Errors from the data structure layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataError {
    /// A container, matrix, or array name is not acceptable.
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A path does not reach the level the operation needs.
    IncompletePath {
        /// The offending path.
        path: String,
        /// Number of levels required.
        required: usize,
    },
    /// A tuple or component shape is empty, zero, or overflows.
    InvalidShape {
        /// Description of the problem.
        reason: String,
    },
    /// Something with this path already exists.
    AlreadyExists {
        /// Path of the existing object.
        path: String,
    },
    /// No data container with this name.
    ContainerNotFound {
        /// The container name.
        name: String,
    },
    /// No attribute matrix at this path.
    MatrixNotFound {
        /// The matrix path.
        path: String,
    },
    /// No array at this path.
    ArrayNotFound {
        /// The array path.
        path: String,
    },
    /// An array handle outlived a structural change of its matrix.
    StaleHandle {
        /// The array path.
        path: String,
        /// Matrix generation recorded in the handle.
        handle_generation: u64,
        /// Current matrix generation.
        current_generation: u64,
    },
    /// An array exists but stores a different element type.
    TypeMismatch {
        /// The array path.
        path: String,
        /// The element type the caller asked for.
        expected: NumericType,
        /// The element type actually stored.
        actual: NumericType,
    },
    /// An array exists but has a different component shape.
    ComponentMismatch {
        /// The array path.
        path: String,
        /// The component shape the caller asked for.
        expected: Vec<usize>,
        /// The component shape actually stored.
        actual: Vec<usize>,
    },
    /// A data container has no geometry, or a different kind.
    WrongGeometryType {
        /// The container name.
        container: String,
        /// The geometry kind the caller asked for.
        expected: String,
        /// The geometry kind present, if any.
        actual: Option<String>,
    },
    /// A geometry-bound matrix does not match its geometry's element count.
    GeometryMismatch {
        /// The matrix path.
        path: String,
        /// Element count of the geometry.
        expected: usize,
        /// Tuple count of the matrix.
        actual: usize,
    },
    /// An array's tuple count differs from its matrix.
    TupleCountMismatch {
        /// The array path.
        path: String,
        /// The matrix tuple count.
        expected: usize,
        /// The array tuple count.
        actual: usize,
    },
    /// Storage for an array could not be allocated.
    Allocation {
        /// The array path (or name).
        path: String,
        /// Number of elements requested, if computable.
        elements: Option<usize>,
    },
    /// Resizing a matrix stopped part way through. The arrays listed in
    /// `resized` have the new tuple count; `failed` and every array after it
    /// still have the old one.
    PartialResize {
        /// The matrix path.
        matrix: String,
        /// Arrays successfully resized before the failure.
        resized: Vec<String>,
        /// The array whose reallocation failed.
        failed: String,
    },
}

impl DataError {
    /// Broad classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidName { .. }
            | Self::IncompletePath { .. }
            | Self::InvalidShape { .. }
            | Self::AlreadyExists { .. } => ErrorKind::Configuration,
            Self::ContainerNotFound { .. }
            | Self::MatrixNotFound { .. }
            | Self::ArrayNotFound { .. }
            | Self::StaleHandle { .. } => ErrorKind::NotFound,
            Self::TypeMismatch { .. }
            | Self::ComponentMismatch { .. }
            | Self::WrongGeometryType { .. }
            | Self::GeometryMismatch { .. } => ErrorKind::TypeMismatch,
            Self::TupleCountMismatch { .. }
            | Self::Allocation { .. }
            | Self::PartialResize { .. } => ErrorKind::Allocation,
        }
    }

    /// Stable negative status code (see the module table).
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidName { .. } => -10001,
            Self::IncompletePath { .. } => -10002,
            Self::AlreadyExists { .. } => -10003,
            Self::InvalidShape { .. } => -10004,
            Self::ContainerNotFound { .. } => -10010,
            Self::MatrixNotFound { .. } => -10011,
            Self::ArrayNotFound { .. } => -10012,
            Self::StaleHandle { .. } => -10013,
            Self::TypeMismatch { .. } => -10020,
            Self::ComponentMismatch { .. } => -10021,
            Self::WrongGeometryType { .. } => -10022,
            Self::GeometryMismatch { .. } => -10023,
            Self::TupleCountMismatch { .. } => -10030,
            Self::Allocation { .. } => -10031,
            Self::PartialResize { .. } => -10032,
        }
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName { name, reason } => write!(f, "invalid name '{name}': {reason}"),
            Self::IncompletePath { path, required } => {
                write!(f, "path '{path}' must name {required} level(s)")
            }
            Self::InvalidShape { reason } => write!(f, "invalid shape: {reason}"),
            Self::AlreadyExists { path } => write!(f, "'{path}' already exists"),
            Self::ContainerNotFound { name } => {
                write!(f, "data container '{name}' does not exist")
            }
            Self::MatrixNotFound { path } => write!(f, "attribute matrix '{path}' does not exist"),
            Self::ArrayNotFound { path } => write!(f, "array '{path}' does not exist"),
            Self::StaleHandle {
                path,
                handle_generation,
                current_generation,
            } => write!(
                f,
                "stale handle for '{path}': generation {handle_generation}, \
                 matrix is at generation {current_generation}"
            ),
            Self::TypeMismatch {
                path,
                expected,
                actual,
            } => write!(f, "array '{path}' stores {actual}, expected {expected}"),
            Self::ComponentMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "array '{path}' has component shape {actual:?}, expected {expected:?}"
            ),
            Self::WrongGeometryType {
                container,
                expected,
                actual,
            } => match actual {
                Some(actual) => write!(
                    f,
                    "data container '{container}' has {actual} geometry, expected {expected}"
                ),
                None => write!(
                    f,
                    "data container '{container}' has no geometry, expected {expected}"
                ),
            },
            Self::GeometryMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "attribute matrix '{path}' has {actual} tuples but its geometry has \
                 {expected} elements"
            ),
            Self::TupleCountMismatch {
                path,
                expected,
                actual,
            } => write!(
                f,
                "array '{path}' has {actual} tuples, matrix has {expected}"
            ),
            Self::Allocation { path, elements } => match elements {
                Some(n) => write!(f, "could not allocate {n} elements for '{path}'"),
                None => write!(f, "allocation size for '{path}' overflows"),
            },
            Self::PartialResize {
                matrix,
                resized,
                failed,
            } => write!(
                f,
                "resize of '{matrix}' failed at array '{failed}' after resizing {} array(s)",
                resized.len()
            ),
        }
    }
}

impl Error for DataError {}

// ── ParameterError ─────────────────────────────────────────────────

/// Errors from reading or writing filter parameters by key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParameterError {
    /// The filter has no parameter with this key.
    UnknownParameter {
        /// Filter name.
        filter: String,
        /// The unknown key.
        key: String,
    },
    /// The value has the wrong variant for this parameter.
    WrongType {
        /// The parameter key.
        key: String,
        /// Expected value kind.
        expected: &'static str,
        /// Supplied value kind.
        actual: &'static str,
    },
    /// The value has the right variant but is out of range.
    InvalidValue {
        /// The parameter key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ParameterError {
    /// Stable negative status code.
    pub fn code(&self) -> i32 {
        match self {
            Self::UnknownParameter { .. } => -10040,
            Self::WrongType { .. } => -10041,
            Self::InvalidValue { .. } => -10042,
        }
    }
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownParameter { filter, key } => {
                write!(f, "filter '{filter}' has no parameter '{key}'")
            }
            Self::WrongType {
                key,
                expected,
                actual,
            } => write!(f, "parameter '{key}' expects {expected}, got {actual}"),
            Self::InvalidValue { key, reason } => {
                write!(f, "invalid value for parameter '{key}': {reason}")
            }
        }
    }
}

impl Error for ParameterError {}

// ── FilterError ────────────────────────────────────────────────────

/// The error a filter reports from `data_check` or `execute`.
///
/// Carries a negative integer code and a human-readable message. The
/// pipeline runner propagates both unchanged to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterError {
    /// Broad classification.
    pub kind: ErrorKind,
    /// Negative status code.
    pub code: i32,
    /// Human-readable description.
    pub message: String,
}

impl FilterError {
    /// Build an error. `code` must be negative.
    pub fn new(kind: ErrorKind, code: i32, message: impl Into<String>) -> Self {
        debug_assert!(code < 0, "filter error codes are negative, got {code}");
        Self {
            kind,
            code,
            message: message.into(),
        }
    }

    /// A [`ErrorKind::Configuration`] error.
    pub fn configuration(code: i32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, code, message)
    }

    /// A [`ErrorKind::NotFound`] error.
    pub fn not_found(code: i32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, code, message)
    }

    /// A [`ErrorKind::TypeMismatch`] error.
    pub fn type_mismatch(code: i32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, code, message)
    }

    /// A [`ErrorKind::Allocation`] error.
    pub fn allocation(code: i32, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Allocation, code, message)
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl Error for FilterError {}

impl From<DataError> for FilterError {
    fn from(e: DataError) -> Self {
        Self::new(e.kind(), e.code(), e.to_string())
    }
}

impl From<ParameterError> for FilterError {
    fn from(e: ParameterError) -> Self {
        Self::new(ErrorKind::Configuration, e.code(), e.to_string())
    }
}
