//! Serde adapter storing a name-keyed `IndexMap` as a sequence of values
//! that carry their own names.

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::any_array::AnyArray;
use crate::container::DataContainer;
use crate::matrix::AttributeMatrix;

/// A value that knows the key it is stored under.
pub(crate) trait Named {
    fn name(&self) -> &str;
}

impl Named for AnyArray {
    fn name(&self) -> &str {
        AnyArray::name(self)
    }
}

impl Named for AttributeMatrix {
    fn name(&self) -> &str {
        AttributeMatrix::name(self)
    }
}

impl Named for DataContainer {
    fn name(&self) -> &str {
        DataContainer::name(self)
    }
}

pub(crate) fn serialize<S, V>(map: &IndexMap<String, V>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_seq(map.values())
}

pub(crate) fn deserialize<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de> + Named,
{
    let items = Vec::<V>::deserialize(deserializer)?;
    let mut map = IndexMap::with_capacity(items.len());
    for item in items {
        let name = item.name().to_string();
        if map.insert(name.clone(), item).is_some() {
            return Err(D::Error::custom(format!("duplicate name '{name}'")));
        }
    }
    Ok(map)
}
