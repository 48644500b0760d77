//! Core vocabulary for the SIMPL pipeline engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! names every other crate speaks: data paths, primitive element types,
//! attribute matrix type tags, shapes, and the error taxonomy shared by
//! the data structure, the filters, and the pipeline runner.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod matrix_type;
pub mod numeric;
pub mod path;
pub mod shape;

pub use error::{DataError, ErrorKind, FilterError, ParameterError};
pub use matrix_type::AttributeMatrixType;
pub use numeric::{Element, NumericType, UnknownNumericType};
pub use path::DataArrayPath;
pub use shape::{dims, shape_product, Dims};
