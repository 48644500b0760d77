//! [`DataArrayPath`]: string addresses into a data container array.

use crate::error::DataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between path levels.
pub const SEPARATOR: char = '/';

/// Address of a data container, an attribute matrix, or a typed array.
///
/// A path has up to three levels, `container/matrix/array`. Unset levels
/// are empty strings; a path may stop early (`"Image"` names a container,
/// `"Image/CellData"` a matrix) but may not skip a level.
///
/// Filters hold paths, never references: every path is resolved against
/// the data container array each time it is used.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataArrayPath {
    container: String,
    matrix: String,
    array: String,
}

/// Check a single name for use as a container, matrix, or array name.
///
/// Names must be non-empty, must not contain the path separator, and must
/// not carry leading or trailing whitespace.
pub fn validate_name(name: &str) -> Result<(), DataError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.contains(SEPARATOR) {
        Some("name contains '/'")
    } else if name.trim() != name {
        Some("name has leading or trailing whitespace")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(DataError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

impl DataArrayPath {
    /// Full three-level path. Levels are not validated; use
    /// [`DataArrayPath::parse`] for untrusted input.
    pub fn new(
        container: impl Into<String>,
        matrix: impl Into<String>,
        array: impl Into<String>,
    ) -> Self {
        Self {
            container: container.into(),
            matrix: matrix.into(),
            array: array.into(),
        }
    }

    /// Path naming a data container.
    pub fn for_container(container: impl Into<String>) -> Self {
        Self::new(container, "", "")
    }

    /// Path naming an attribute matrix.
    pub fn for_matrix(container: impl Into<String>, matrix: impl Into<String>) -> Self {
        Self::new(container, matrix, "")
    }

    /// Parse `"container[/matrix[/array]]"`, validating every level.
    ///
    /// The empty string parses to the empty (unset) path.
    pub fn parse(s: &str) -> Result<Self, DataError> {
        if s.is_empty() {
            return Ok(Self::default());
        }
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        if parts.len() > 3 {
            return Err(DataError::InvalidName {
                name: s.to_string(),
                reason: "path has more than three levels".to_string(),
            });
        }
        for part in &parts {
            validate_name(part)?;
        }
        let level = |i: usize| parts.get(i).map(|p| p.to_string()).unwrap_or_default();
        Ok(Self {
            container: level(0),
            matrix: level(1),
            array: level(2),
        })
    }

    /// Number of set levels: 0 (unset) through 3 (array).
    pub fn depth(&self) -> usize {
        if self.container.is_empty() {
            0
        } else if self.matrix.is_empty() {
            1
        } else if self.array.is_empty() {
            2
        } else {
            3
        }
    }

    /// Whether no level is set.
    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }

    /// Container name (may be empty).
    pub fn container_name(&self) -> &str {
        &self.container
    }

    /// Matrix name, if set.
    pub fn matrix_name(&self) -> Option<&str> {
        (!self.matrix.is_empty()).then_some(self.matrix.as_str())
    }

    /// Array name, if set.
    pub fn array_name(&self) -> Option<&str> {
        (!self.array.is_empty()).then_some(self.array.as_str())
    }

    /// This path truncated to its container.
    pub fn container_path(&self) -> Self {
        Self::for_container(self.container.clone())
    }

    /// This path truncated to its matrix.
    pub fn matrix_path(&self) -> Self {
        Self::for_matrix(self.container.clone(), self.matrix.clone())
    }

    /// Sibling path with the matrix level replaced.
    pub fn with_matrix(&self, matrix: impl Into<String>) -> Self {
        Self::new(self.container.clone(), matrix, "")
    }

    /// Sibling path with the array level replaced.
    pub fn with_array(&self, array: impl Into<String>) -> Self {
        Self::new(self.container.clone(), self.matrix.clone(), array)
    }

    /// Require at least `depth` levels, every one of them a valid name.
    ///
    /// Also rejects paths that skip a level (an array with no matrix).
    pub fn require_depth(&self, depth: usize) -> Result<(), DataError> {
        let skipped = (self.container.is_empty() && !self.matrix.is_empty())
            || (self.matrix.is_empty() && !self.array.is_empty());
        if skipped || self.depth() < depth {
            return Err(DataError::IncompletePath {
                path: self.to_string(),
                required: depth,
            });
        }
        let levels = [&self.container, &self.matrix, &self.array];
        for name in levels.iter().take(self.depth()) {
            validate_name(name)?;
        }
        Ok(())
    }
}

impl fmt::Display for DataArrayPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.container)?;
        if !self.matrix.is_empty() {
            write!(f, "{SEPARATOR}{}", self.matrix)?;
        }
        if !self.array.is_empty() {
            write!(f, "{SEPARATOR}{}", self.array)?;
        }
        Ok(())
    }
}

impl FromStr for DataArrayPath {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DataArrayPath {
    type Error = DataError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<DataArrayPath> for String {
    fn from(path: DataArrayPath) -> Self {
        path.to_string()
    }
}
