//! Reflectively discovered properties

use serde::{Deserialize, Serialize};

use crate::error::PropertyFault;
use crate::value::Value;

/// Outcome of reading one property: either its entry or a local fault
pub type PropertyRead = std::result::Result<PropertyEntry, PropertyFault>;

/// One (name, type, value) fact about a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyEntry {
    /// Field name as the host knows it
    pub name: String,
    /// Human facing label, when the host has one distinct from `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Runtime type of the value
    #[serde(rename = "type")]
    pub runtime_type: String,
    /// Type the host declared for the field, when it differs in kind from the
    /// runtime type (e.g. an `ObjectReference` slot holding a `Light`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    #[serde(default)]
    pub value: Value,
}

impl PropertyEntry {
    pub fn new(name: impl Into<String>, runtime_type: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            runtime_type: runtime_type.into(),
            declared_type: None,
            value,
        }
    }

    /// Set the display label
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Set the declared type
    pub fn with_declared_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = Some(declared_type.into());
        self
    }

    /// Declared type, if it names something other than the runtime type
    pub fn type_mismatch(&self) -> Option<&str> {
        self.declared_type
            .as_deref()
            .filter(|declared| *declared != self.runtime_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_mismatch_only_when_different() {
        let same = PropertyEntry::new("speed", "float", Value::from(1.0)).with_declared_type("float");
        assert_eq!(same.type_mismatch(), None);

        let differs = PropertyEntry::new("light", "Game.Light", Value::Null)
            .with_declared_type("ObjectReference");
        assert_eq!(differs.type_mismatch(), Some("ObjectReference"));

        let undeclared = PropertyEntry::new("speed", "float", Value::from(1.0));
        assert_eq!(undeclared.type_mismatch(), None);
    }
}
