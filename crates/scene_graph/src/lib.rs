//! # scene_graph - Source Scene Contract
//!
//! Everything the dumper needs to know about a host scene, and nothing more:
//! - [`SceneSource`], [`SceneNode`], [`SceneComponent`]: the adapter traits a
//!   host implements over its live object model
//! - [`Value`]: the tagged union standing in for reflectively typed property values
//! - [`TypeMetadata`] / [`TypeRegistry`]: base-type and interface lookups
//! - [`MemoryScene`]: an owned scene that loads from TOML or JSON and
//!   implements the adapter traits
//!
//! The dumper only ever reads through these traits; it never mutates a source.

pub mod id;
pub mod error;
pub mod value;
pub mod property;
pub mod source;
pub mod type_registry;
pub mod memory;

pub use id::*;
pub use error::*;
pub use value::*;
pub use property::*;
pub use source::*;
pub use type_registry::*;
pub use memory::*;

pub use scene_math;

pub mod prelude {
    pub use crate::id::ObjectId;
    pub use crate::error::{GraphError, PropertyFault, Result};
    pub use crate::value::{ArrayValue, ObjectRef, RefKind, Value};
    pub use crate::property::{PropertyEntry, PropertyRead};
    pub use crate::source::{
        ComponentKind, Enablement, RectLayout, SceneComponent, SceneNode, SceneSource,
        TransformData, TypeMetadata,
    };
    pub use crate::type_registry::{TypeInfo, TypeRegistry};
    pub use crate::memory::{ComponentDesc, MemoryScene, NodeDesc, PropertyDesc};
}
