//! Registry of component type metadata
//!
//! Records, per type name, the immediate base type and the interfaces the
//! type implements. Hosts with real reflection implement [`TypeMetadata`]
//! directly; everything else (tests, scene description files) fills one of
//! these.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::source::TypeMetadata;

/// Information about a registered type
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Immediate base type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Implemented interfaces, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interfaces: Vec<String>,
}

impl TypeInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base type
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Add an implemented interface
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }
}

/// Type name to [`TypeInfo`] lookup
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRegistry {
    by_name: BTreeMap<String, TypeInfo>,
}

impl TypeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, replacing any earlier entry of the same name
    pub fn register(&mut self, name: impl Into<String>, info: TypeInfo) -> &mut Self {
        let name = name.into();
        if self.by_name.insert(name.clone(), info).is_some() {
            log::debug!("Type '{}' re-registered", name);
        }
        self
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, name: impl Into<String>, info: TypeInfo) -> Self {
        self.register(name, info);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TypeInfo> {
        self.by_name.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Iterate registered types in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeInfo)> {
        self.by_name.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl TypeMetadata for TypeRegistry {
    fn base_type(&self, type_name: &str) -> Option<&str> {
        self.get(type_name).and_then(|info| info.base.as_deref())
    }

    fn interfaces(&self, type_name: &str) -> Vec<&str> {
        self.get(type_name)
            .map(|info| info.interfaces.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }
}
