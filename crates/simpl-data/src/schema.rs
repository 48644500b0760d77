//! [`DataStructureSchema`]: a data-free description of a container array.
//!
//! The schema is what a preflight produces for display and what two
//! preflights of the same pipeline must agree on.

use serde::{Deserialize, Serialize};
use simpl_core::{AttributeMatrixType, DataArrayPath, NumericType};
use std::fmt;

use crate::any_array::AnyArray;
use crate::container::DataContainer;
use crate::geometry::GeometryKind;
use crate::matrix::AttributeMatrix;

/// Description of one array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArraySchema {
    /// Array name.
    pub name: String,
    /// Element type.
    pub numeric_type: NumericType,
    /// Component shape.
    pub component_dims: Vec<usize>,
    /// Tuple count (0 for placeholders).
    pub tuples: usize,
    /// Whether the array is a placeholder.
    pub placeholder: bool,
}

/// Description of one attribute matrix.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixSchema {
    /// Matrix name.
    pub name: String,
    /// Type tag.
    pub matrix_type: AttributeMatrixType,
    /// Tuple shape.
    pub tuple_dims: Vec<usize>,
    /// Arrays in order.
    pub arrays: Vec<ArraySchema>,
}

/// Description of one data container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSchema {
    /// Container name.
    pub name: String,
    /// Geometry kind, if any.
    pub geometry: Option<GeometryKind>,
    /// Matrices in order.
    pub matrices: Vec<MatrixSchema>,
}

/// Ordered description of every container, matrix, and array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataStructureSchema {
    /// Containers in order.
    pub containers: Vec<ContainerSchema>,
}

impl From<&AnyArray> for ArraySchema {
    fn from(a: &AnyArray) -> Self {
        Self {
            name: a.name().to_string(),
            numeric_type: a.numeric_type(),
            component_dims: a.component_dims().to_vec(),
            tuples: a.tuples(),
            placeholder: a.is_placeholder(),
        }
    }
}

impl From<&AttributeMatrix> for MatrixSchema {
    fn from(m: &AttributeMatrix) -> Self {
        Self {
            name: m.name().to_string(),
            matrix_type: m.matrix_type(),
            tuple_dims: m.tuple_dims().to_vec(),
            arrays: m.arrays().map(ArraySchema::from).collect(),
        }
    }
}

impl From<&DataContainer> for ContainerSchema {
    fn from(dc: &DataContainer) -> Self {
        Self {
            name: dc.name().to_string(),
            geometry: dc.geometry().map(|g| g.kind()),
            matrices: dc.matrices().map(MatrixSchema::from).collect(),
        }
    }
}

impl DataStructureSchema {
    /// Every container, matrix, and array path, depth first.
    pub fn paths(&self) -> Vec<DataArrayPath> {
        let mut out = Vec::new();
        for c in &self.containers {
            out.push(DataArrayPath::for_container(c.name.clone()));
            for m in &c.matrices {
                out.push(DataArrayPath::for_matrix(c.name.clone(), m.name.clone()));
                for a in &m.arrays {
                    out.push(DataArrayPath::new(
                        c.name.clone(),
                        m.name.clone(),
                        a.name.clone(),
                    ));
                }
            }
        }
        out
    }

    /// Whether the schema describes an array at `path`.
    pub fn contains(&self, path: &DataArrayPath) -> bool {
        self.paths().contains(path)
    }
}

impl fmt::Display for DataStructureSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.containers {
            match c.geometry {
                Some(g) => writeln!(f, "{} [{g}]", c.name)?,
                None => writeln!(f, "{}", c.name)?,
            }
            for m in &c.matrices {
                writeln!(f, "  {} ({}, tuples {:?})", m.name, m.matrix_type, m.tuple_dims)?;
                for a in &m.arrays {
                    write!(f, "    {}: {} {:?}", a.name, a.numeric_type, a.component_dims)?;
                    if a.placeholder {
                        write!(f, " (placeholder)")?;
                    }
                    writeln!(f)?;
                }
            }
        }
        Ok(())
    }
}
