//! Adapter contract over a host scene
//!
//! A host exposes its live object model through these traits. Enumeration
//! order must be stable for the duration of one dump: it decides both element
//! order and reference discovery order in the output.

use serde::{Deserialize, Serialize};

use scene_math::{Vec2, Vec3};

use crate::error::Result;
use crate::id::ObjectId;
use crate::property::PropertyRead;

/// The whole scene as seen by the dumper
pub trait SceneSource {
    /// Top-level nodes, in scene order
    fn roots(&self) -> Result<Vec<&dyn SceneNode>>;

    /// Base-type and interface metadata for component types
    fn types(&self) -> &dyn TypeMetadata;
}

/// One node of the source graph
pub trait SceneNode {
    fn id(&self) -> ObjectId;

    fn name(&self) -> &str;

    /// Free-form tag; `None` when the node is untagged
    fn tag(&self) -> Option<&str> {
        None
    }

    /// Layer / category index
    fn layer(&self) -> i32 {
        0
    }

    /// Active in the hierarchy
    fn active(&self) -> bool {
        true
    }

    fn is_static(&self) -> bool {
        false
    }

    /// Prefab relationship, if the node came from one
    fn prefab(&self) -> Option<&str> {
        None
    }

    /// Attached components, in attachment order
    fn components(&self) -> Result<Vec<&dyn SceneComponent>>;

    /// Child nodes, in sibling order
    fn children(&self) -> Result<Vec<&dyn SceneNode>>;
}

/// One component attached to a node
pub trait SceneComponent {
    fn id(&self) -> ObjectId;

    /// Full runtime type name
    fn type_name(&self) -> &str;

    fn kind(&self) -> ComponentKind;

    /// Spatial placement components get first-class treatment
    fn is_transform_like(&self) -> bool {
        self.kind().is_transform_like()
    }

    /// Placement values of a transform-like component
    fn transform(&self) -> Option<TransformData> {
        None
    }

    /// Enabled state, for components that can be toggled
    fn enablement(&self) -> Option<Enablement> {
        None
    }

    fn prefab(&self) -> Option<&str> {
        None
    }

    /// Reflectively enumerated properties.
    ///
    /// The outer error means the component itself could not be read; an inner
    /// fault affects only that property.
    fn properties(&self) -> Result<Vec<PropertyRead>>;
}

/// Base-type and interface metadata, looked up by type name
pub trait TypeMetadata {
    /// Immediate base type, `None` at the top of the chain
    fn base_type(&self, type_name: &str) -> Option<&str>;

    /// Interfaces the type implements
    fn interfaces(&self, type_name: &str) -> Vec<&str>;
}

/// Broad category of a component; decides how it is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Position / rotation / scale
    Transform,
    /// Transform anchored in a parent rectangle
    RectTransform,
    /// User script component
    Script,
    /// Built-in component that can be enabled and disabled
    Behaviour,
    /// Any other component
    Plain,
}

impl ComponentKind {
    #[inline]
    pub fn is_transform_like(&self) -> bool {
        matches!(self, ComponentKind::Transform | ComponentKind::RectTransform)
    }
}

impl Default for ComponentKind {
    fn default() -> Self {
        ComponentKind::Plain
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transform => write!(f, "transform"),
            Self::RectTransform => write!(f, "rect_transform"),
            Self::Script => write!(f, "script"),
            Self::Behaviour => write!(f, "behaviour"),
            Self::Plain => write!(f, "plain"),
        }
    }
}

/// Placement of a transform-like component
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransformData {
    #[serde(default)]
    pub position: Vec3,
    /// Euler angles in degrees
    #[serde(default)]
    pub rotation: Vec3,
    #[serde(default = "default_scale")]
    pub scale: Vec3,
    /// Anchoring, present for rect transforms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rect: Option<RectLayout>,
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

impl Default for TransformData {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            rect: None,
        }
    }
}

impl TransformData {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Anchoring of a rect transform inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectLayout {
    #[serde(default)]
    pub anchored_position: Vec3,
    #[serde(default)]
    pub anchor_min: Vec2,
    #[serde(default)]
    pub anchor_max: Vec2,
    #[serde(default)]
    pub pivot: Vec2,
}

impl Default for RectLayout {
    fn default() -> Self {
        Self {
            anchored_position: Vec3::ZERO,
            anchor_min: Vec2::new(0.5, 0.5),
            anchor_max: Vec2::new(0.5, 0.5),
            pivot: Vec2::new(0.5, 0.5),
        }
    }
}

/// Enabled state of a toggleable component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enablement {
    pub enabled: bool,
    /// Enabled and on an active node
    pub active_and_enabled: bool,
}
