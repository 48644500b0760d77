//! [`FilterRegistry`]: filter constructors by name.

use indexmap::IndexMap;
use std::error::Error;
use std::fmt;

use crate::filter::Filter;

/// Builds a filter with default parameters.
pub type FilterConstructor = fn() -> Box<dyn Filter>;

/// Errors from registry operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// No filter is registered under this name.
    UnknownFilter {
        /// The requested name.
        name: String,
    },
    /// A filter with this name is already registered.
    DuplicateFilter {
        /// The conflicting name.
        name: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFilter { name } => write!(f, "unknown filter '{name}'"),
            Self::DuplicateFilter { name } => write!(f, "filter '{name}' is already registered"),
        }
    }
}

impl Error for RegistryError {}

/// Ordered map from filter name to constructor.
#[derive(Clone, Debug, Default)]
pub struct FilterRegistry {
    constructors: IndexMap<String, FilterConstructor>,
}

impl FilterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under the name of the filter it builds.
    pub fn register(&mut self, constructor: FilterConstructor) -> Result<(), RegistryError> {
        let name = constructor().name().to_string();
        if self.constructors.contains_key(&name) {
            return Err(RegistryError::DuplicateFilter { name });
        }
        self.constructors.insert(name, constructor);
        Ok(())
    }

    /// Build a filter by name.
    pub fn create(&self, name: &str) -> Result<Box<dyn Filter>, RegistryError> {
        self.constructors
            .get(name)
            .map(|ctor| ctor())
            .ok_or_else(|| RegistryError::UnknownFilter {
                name: name.to_string(),
            })
    }

    /// Whether a filter is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Number of registered filters.
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}
