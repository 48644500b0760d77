//! SIMPL: a filter pipeline engine over named, dynamically typed data.
//!
//! This is the facade crate that re-exports the public API of the SIMPL
//! sub-crates. Most users only need this one dependency.
//!
//! # Quick start
//!
//! ```rust
//! use simpl::prelude::*;
//! use simpl::filters::{CreateAttributeMatrix, CreateDataArray, CreateDataContainer, ScaleDataArray};
//!
//! let x = DataArrayPath::new("C", "M", "X");
//! let mut pipeline = Pipeline::new("example")
//!     .with(CreateDataContainer::new("C"))
//!     .with(CreateAttributeMatrix::new(
//!         DataArrayPath::for_matrix("C", "M"),
//!         AttributeMatrixType::Generic,
//!         &[8],
//!     ))
//!     .with(CreateDataArray::new(x.clone(), NumericType::Float32).with_init(2.0))
//!     .with(ScaleDataArray::new(x.clone(), 0.5));
//!
//! let mut dca = DataContainerArray::new();
//! let report = PipelineRunner::new().run(&mut pipeline, &mut dca).unwrap();
//! assert_eq!(report.status, RunStatus::Completed);
//! assert!(dca.typed_array::<f32>(&x).unwrap().as_slice().iter().all(|&v| v == 1.0));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `simpl-core` | Paths, element and matrix types, errors |
//! | [`data`] | `simpl-data` | Arrays, matrices, containers, geometry, handles |
//! | [`filter`] | `simpl-filter` | Filter trait, context, parameters, observers |
//! | [`filters`] | `simpl-filters` | Core filters and the core registry |
//! | [`pipeline`] | `simpl-pipeline` | Pipelines, the runner, pipeline files |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Paths, element types, matrix types, and the error taxonomy
/// (`simpl-core`).
pub use simpl_core as types;

/// The data structure: [`data::DataContainerArray`] down to
/// [`data::DataArray`] (`simpl-data`).
pub use simpl_data as data;

/// The [`filter::Filter`] trait and what filters run against
/// (`simpl-filter`).
pub use simpl_filter as filter;

/// Core filters (`simpl-filters`).
pub use simpl_filters as filters;

/// Pipelines and the runner (`simpl-pipeline`).
pub use simpl_pipeline as pipeline;

/// Common imports for typical SIMPL usage.
///
/// ```rust
/// use simpl::prelude::*;
/// ```
pub mod prelude {
    // Core vocabulary
    pub use simpl_core::{
        AttributeMatrixType, DataArrayPath, ErrorKind, FilterError, NumericType,
    };

    // Data structure
    pub use simpl_data::{
        AnyArray, ArrayRef, AttributeMatrix, DataArray, DataContainer, DataContainerArray,
        Geometry, ImageGeom,
    };

    // Filters
    pub use simpl_filter::{
        CancelToken, ExecuteOutcome, Filter, FilterContext, FilterInstance, FilterRegistry,
        ParameterSpec, ParameterValue, PipelineEvent, PipelineObserver,
    };
    pub use simpl_filters::core_registry;

    // Pipelines
    pub use simpl_pipeline::{
        Pipeline, PipelineError, PipelineFile, PipelineRunner, RunReport, RunStatus,
    };
}
