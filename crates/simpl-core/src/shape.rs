//! The [`Dims`] shape alias and overflow-checked shape arithmetic.

use smallvec::SmallVec;

/// A tuple or component shape.
///
/// Uses `SmallVec<[usize; 4]>` so that the shapes that occur in practice
/// (scalars, 3-vectors, 3D image dimensions, 3x3 tensors) never touch the
/// heap. Longer shapes spill transparently.
pub type Dims = SmallVec<[usize; 4]>;

/// Product of all extents in `dims`, or `None` on overflow.
///
/// The empty shape has product 1.
pub fn shape_product(dims: &[usize]) -> Option<usize> {
    dims.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Build a [`Dims`] from any slice.
pub fn dims(values: &[usize]) -> Dims {
    Dims::from_slice(values)
}
