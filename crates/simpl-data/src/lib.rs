//! The SIMPL data structure: typed arrays grouped into attribute matrices,
//! grouped into data containers, grouped into one data container array.
//!
//! ```text
//! DataContainerArray
//! └── DataContainer × N (+ optional Geometry)
//!     └── AttributeMatrix × N (tuple shape, type tag, generation)
//!         └── AnyArray × N (DataArray<T> for every element type)
//! ```
//!
//! Every collection is insertion-ordered (`IndexMap`). The data container
//! array is the single mutable state a pipeline threads through its
//! filters; filters address it only by [`DataArrayPath`] or by
//! generation-checked [`ArrayRef`] handles.
//!
//! # Placeholders
//!
//! During preflight, filters create arrays as zero-tuple, unallocated
//! *placeholders*. A placeholder describes the array (element type,
//! component shape) without holding data and is exempt from the rule that
//! every array of a matrix has the matrix tuple count.
//!
//! [`DataArrayPath`]: simpl_core::DataArrayPath

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod any_array;
pub mod array;
pub mod container;
pub mod container_array;
pub mod geometry;
pub mod handle;
pub mod matrix;
mod outline;
pub mod schema;
mod named_seq;

pub use any_array::{AnyArray, ArrayElement};
pub use array::DataArray;
pub use container::DataContainer;
pub use container_array::DataContainerArray;
pub use geometry::{
    EdgeGeom, Geometry, GeometryKind, GeometryType, ImageGeom, TriangleGeom, VertexGeom,
};
pub use handle::ArrayRef;
pub use matrix::AttributeMatrix;
pub use schema::{ArraySchema, ContainerSchema, DataStructureSchema, MatrixSchema};
