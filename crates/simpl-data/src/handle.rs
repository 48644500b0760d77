//! [`ArrayRef`]: a generation-checked weak reference to an array.

use simpl_core::DataArrayPath;
use std::fmt;

/// A weak reference to an array: its path plus the generation of its
/// attribute matrix at the time it was resolved.
///
/// An `ArrayRef` owns nothing. It is re-resolved through the
/// [`DataContainerArray`](crate::DataContainerArray) on every access, and
/// resolution fails with `StaleHandle` once the matrix has been resized or
/// had an array removed or renamed since the reference was taken.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct ArrayRef {
    path: DataArrayPath,
    generation: u64,
}

impl ArrayRef {
    pub(crate) fn new(path: DataArrayPath, generation: u64) -> Self {
        Self { path, generation }
    }

    /// Path of the referenced array.
    pub fn path(&self) -> &DataArrayPath {
        &self.path
    }

    /// Matrix generation recorded at resolution time.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl fmt::Display for ArrayRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrayRef({}, gen={})", self.path, self.generation)
    }
}
