//! # scene_markup - Output Document
//!
//! An owned markup tree stored in an arena:
//! - [`MarkupDocument`] owns every node; [`NodeId`] handles address them
//! - Elements keep attributes in insertion order with unique keys
//! - Each node's parent is fixed at creation and only read for upward walks
//! - [`MarkupDocument::write_xml`] serializes through `quick-xml`

pub mod error;
pub mod name;
pub mod document;
pub mod xml;

pub use error::*;
pub use name::*;
pub use document::*;
pub use xml::*;

pub mod prelude {
    pub use crate::error::{MarkupError, Result};
    pub use crate::document::{Ancestors, MarkupDocument, MarkupNode, NodeId, NodeKind};
    pub use crate::xml::XmlStyle;
}
