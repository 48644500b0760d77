//! Core filters for the SIMPL pipeline engine.
//!
//! Structural filters create, rename, remove and resize parts of the data
//! structure; [`ScaleDataArray`] and [`CopyDataArray`] process values;
//! [`DataContainerReader`] and [`DataContainerWriter`] move container
//! arrays to and from JSON data files.
//!
//! [`core_registry`] returns a [`FilterRegistry`] holding every filter
//! here, for building pipelines from pipeline files.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod copy_data_array;
pub mod create_attribute_matrix;
pub mod create_data_array;
pub mod create_data_container;
pub mod create_image_geometry;
pub mod data_container_reader;
pub mod data_container_writer;
pub mod remove_arrays;
pub mod rename_attribute_array;
pub mod resize_attribute_matrix;
pub mod scale_data_array;

pub use copy_data_array::CopyDataArray;
pub use create_attribute_matrix::CreateAttributeMatrix;
pub use create_data_array::CreateDataArray;
pub use create_data_container::CreateDataContainer;
pub use create_image_geometry::CreateImageGeometry;
pub use data_container_reader::DataContainerReader;
pub use data_container_writer::DataContainerWriter;
pub use remove_arrays::RemoveArrays;
pub use rename_attribute_array::RenameAttributeArray;
pub use resize_attribute_matrix::ResizeAttributeMatrix;
pub use scale_data_array::ScaleDataArray;

use simpl_core::FilterError;
use simpl_data::ArrayRef;
use simpl_filter::{Filter, FilterRegistry, RegistryError};

/// `execute` was called without a successful `data_check` before it.
pub const DATA_CHECK_NOT_RUN: i32 = -11099;

pub(crate) fn stored_handle<'a>(
    handle: &'a Option<ArrayRef>,
    filter: &str,
) -> Result<&'a ArrayRef, FilterError> {
    handle.as_ref().ok_or_else(|| {
        FilterError::configuration(
            DATA_CHECK_NOT_RUN,
            format!("{filter}: execute called before data_check"),
        )
    })
}

fn boxed<F: Filter + Default>() -> Box<dyn Filter> {
    Box::new(F::default())
}

/// Register every core filter in `registry`.
pub fn register_core_filters(registry: &mut FilterRegistry) -> Result<(), RegistryError> {
    registry.register(boxed::<CreateDataContainer>)?;
    registry.register(boxed::<CreateImageGeometry>)?;
    registry.register(boxed::<CreateAttributeMatrix>)?;
    registry.register(boxed::<CreateDataArray>)?;
    registry.register(boxed::<CopyDataArray>)?;
    registry.register(boxed::<ScaleDataArray>)?;
    registry.register(boxed::<RenameAttributeArray>)?;
    registry.register(boxed::<RemoveArrays>)?;
    registry.register(boxed::<ResizeAttributeMatrix>)?;
    registry.register(boxed::<DataContainerReader>)?;
    registry.register(boxed::<DataContainerWriter>)?;
    Ok(())
}

/// A registry holding every core filter.
pub fn core_registry() -> FilterRegistry {
    let mut registry = FilterRegistry::new();
    if let Err(e) = register_core_filters(&mut registry) {
        tracing::error!("core filter registration failed: {e}");
    }
    registry
}
