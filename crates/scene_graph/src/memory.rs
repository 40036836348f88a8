//! Owned in-memory scene
//!
//! [`MemoryScene`] is a plain data description of a scene that implements the
//! adapter traits. It loads from TOML or JSON scene description files, and
//! doubles as the fixture builder for tests. Failure injection (`broken`,
//! `unreadable`) lets a description reproduce hosts that refuse to enumerate
//! part of their object model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, PropertyFault, Result};
use crate::id::ObjectId;
use crate::property::{PropertyEntry, PropertyRead};
use crate::source::{
    ComponentKind, Enablement, SceneComponent, SceneNode, SceneSource, TransformData, TypeMetadata,
};
use crate::type_registry::{TypeInfo, TypeRegistry};
use crate::value::Value;

/// Scene description file data structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MemoryScene {
    #[serde(default = "default_scene_name")]
    pub name: String,
    /// Type metadata for component types
    #[serde(default, skip_serializing_if = "TypeRegistry::is_empty")]
    pub types: TypeRegistry,
    /// Set to make root enumeration fail with this reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broken: Option<String>,
    /// Top-level nodes
    #[serde(default)]
    pub roots: Vec<NodeDesc>,
}

fn default_scene_name() -> String {
    "Scene".to_string()
}

fn default_active() -> bool {
    true
}

/// Node data for serialization
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeDesc {
    pub id: ObjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default)]
    pub layer: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefab: Option<String>,
    /// Set to make component and child enumeration fail with this reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broken: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentDesc>,
    #[serde(default)]
    pub children: Vec<NodeDesc>,
}

/// Component data for serialization
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ComponentDesc {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub kind: ComponentKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_and_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<TransformData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefab: Option<String>,
    /// Set to make property enumeration fail with this reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub broken: Option<String>,
    #[serde(default)]
    pub properties: Vec<PropertyDesc>,
}

/// Property data for serialization
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PropertyDesc {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Runtime type; inferred from the value when absent
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_type: Option<String>,
    #[serde(default)]
    pub value: Value,
    /// Set to make reading this property fail with this reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unreadable: Option<String>,
}

impl MemoryScene {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a top-level node
    pub fn with_root(mut self, node: NodeDesc) -> Self {
        self.roots.push(node);
        self
    }

    /// Register type metadata
    pub fn with_type(mut self, name: impl Into<String>, info: TypeInfo) -> Self {
        self.types.register(name, info);
        self
    }

    /// Parse a TOML scene description
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let scene: Self = toml::from_str(content).map_err(|e| GraphError::Parse(e.to_string()))?;
        scene.check_arrays()?;
        Ok(scene)
    }

    /// Parse a JSON scene description
    pub fn from_json_str(content: &str) -> Result<Self> {
        let scene: Self = serde_json::from_str(content).map_err(|e| GraphError::Parse(e.to_string()))?;
        scene.check_arrays()?;
        Ok(scene)
    }

    /// Reject array values whose `dims` disagree with their items
    fn check_arrays(&self) -> Result<()> {
        fn check_node(node: &NodeDesc) -> Result<()> {
            for component in &node.components {
                for property in &component.properties {
                    if let Value::Array(array) = &property.value {
                        array.check_shape().map_err(|reason| {
                            GraphError::Parse(format!(
                                "property '{}' of component {}: {}",
                                property.name, component.id, reason
                            ))
                        })?;
                    }
                }
            }
            node.children.iter().try_for_each(check_node)
        }
        self.roots.iter().try_for_each(check_node)
    }

    /// Load a scene description file, choosing the format by extension
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let scene = match format.as_deref() {
            Some("toml") => Self::from_toml_str(&std::fs::read_to_string(path)?)?,
            Some("json") => Self::from_json_str(&std::fs::read_to_string(path)?)?,
            _ => return Err(GraphError::UnsupportedFormat(path.to_path_buf())),
        };

        log::info!(
            "Loaded scene '{}' from {} ({} roots)",
            scene.name,
            path.display(),
            scene.roots.len()
        );
        Ok(scene)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| GraphError::Parse(e.to_string()))
    }

    /// Total node count, all depths
    pub fn node_count(&self) -> usize {
        fn count(node: &NodeDesc) -> usize {
            1 + node.children.iter().map(count).sum::<usize>()
        }
        self.roots.iter().map(count).sum()
    }
}

impl NodeDesc {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(id),
            name: name.into(),
            tag: None,
            layer: 0,
            active: true,
            is_static: false,
            prefab: None,
            broken: None,
            components: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    pub fn with_component(mut self, component: ComponentDesc) -> Self {
        self.components.push(component);
        self
    }

    pub fn with_child(mut self, child: NodeDesc) -> Self {
        self.children.push(child);
        self
    }

    /// Make component and child enumeration fail
    pub fn broken(mut self, reason: impl Into<String>) -> Self {
        self.broken = Some(reason.into());
        self
    }

    fn check_readable(&self, what: &'static str) -> Result<()> {
        match &self.broken {
            Some(reason) => Err(GraphError::unavailable(self.id, what, reason.clone())),
            None => Ok(()),
        }
    }
}

impl ComponentDesc {
    pub fn new(id: u64, type_name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: ObjectId::new(id),
            type_name: type_name.into(),
            kind,
            enabled: None,
            active_and_enabled: None,
            transform: None,
            prefab: None,
            broken: None,
            properties: Vec::new(),
        }
    }

    /// Transform component with the given placement
    pub fn new_transform(id: u64, data: TransformData) -> Self {
        let kind = if data.rect.is_some() {
            ComponentKind::RectTransform
        } else {
            ComponentKind::Transform
        };
        let type_name = match kind {
            ComponentKind::RectTransform => "UnityEngine.RectTransform",
            _ => "UnityEngine.Transform",
        };
        let mut desc = Self::new(id, type_name, kind);
        desc.transform = Some(data);
        desc
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_property(mut self, property: PropertyDesc) -> Self {
        self.properties.push(property);
        self
    }

    /// Shorthand for a readable property with inferred type
    pub fn with_value(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_property(PropertyDesc::new(name, value))
    }

    /// Make property enumeration fail
    pub fn broken(mut self, reason: impl Into<String>) -> Self {
        self.broken = Some(reason.into());
        self
    }
}

impl PropertyDesc {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            type_name: None,
            declared_type: None,
            value: value.into(),
            unreadable: None,
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_declared_type(mut self, declared_type: impl Into<String>) -> Self {
        self.declared_type = Some(declared_type.into());
        self
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// A property whose read fails with `reason`
    pub fn unreadable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut desc = Self::new(name, Value::Null);
        desc.unreadable = Some(reason.into());
        desc
    }

    fn read(&self) -> PropertyRead {
        if let Some(reason) = &self.unreadable {
            return Err(PropertyFault::new(self.name.clone(), reason.clone()));
        }
        Ok(PropertyEntry {
            name: self.name.clone(),
            display_name: self.display_name.clone(),
            runtime_type: self
                .type_name
                .clone()
                .unwrap_or_else(|| self.value.type_name()),
            declared_type: self.declared_type.clone(),
            value: self.value.clone(),
        })
    }
}

impl SceneSource for MemoryScene {
    fn roots(&self) -> Result<Vec<&dyn SceneNode>> {
        if let Some(reason) = &self.broken {
            return Err(GraphError::RootsUnavailable(reason.clone()));
        }
        Ok(self.roots.iter().map(|n| n as &dyn SceneNode).collect())
    }

    fn types(&self) -> &dyn TypeMetadata {
        &self.types
    }
}

impl SceneNode for NodeDesc {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    fn layer(&self) -> i32 {
        self.layer
    }

    fn active(&self) -> bool {
        self.active
    }

    fn is_static(&self) -> bool {
        self.is_static
    }

    fn prefab(&self) -> Option<&str> {
        self.prefab.as_deref()
    }

    fn components(&self) -> Result<Vec<&dyn SceneComponent>> {
        self.check_readable("components")?;
        Ok(self.components.iter().map(|c| c as &dyn SceneComponent).collect())
    }

    fn children(&self) -> Result<Vec<&dyn SceneNode>> {
        self.check_readable("children")?;
        Ok(self.children.iter().map(|n| n as &dyn SceneNode).collect())
    }
}

impl SceneComponent for ComponentDesc {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn kind(&self) -> ComponentKind {
        self.kind
    }

    fn transform(&self) -> Option<TransformData> {
        if !self.kind.is_transform_like() {
            return None;
        }
        let mut data = self.transform.unwrap_or_default();
        if self.kind == ComponentKind::RectTransform && data.rect.is_none() {
            data.rect = Some(Default::default());
        }
        Some(data)
    }

    fn enablement(&self) -> Option<Enablement> {
        let toggleable = matches!(self.kind, ComponentKind::Script | ComponentKind::Behaviour);
        if !toggleable && self.enabled.is_none() {
            return None;
        }
        let enabled = self.enabled.unwrap_or(true);
        Some(Enablement {
            enabled,
            active_and_enabled: self.active_and_enabled.unwrap_or(enabled),
        })
    }

    fn prefab(&self) -> Option<&str> {
        self.prefab.as_deref()
    }

    fn properties(&self) -> Result<Vec<PropertyRead>> {
        if let Some(reason) = &self.broken {
            return Err(GraphError::unavailable(self.id, "properties", reason.clone()));
        }
        Ok(self.properties.iter().map(PropertyDesc::read).collect())
    }
}
