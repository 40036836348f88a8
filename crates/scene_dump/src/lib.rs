//! # scene_dump - Scene Graph Dumper
//!
//! Walks a [`SceneSource`] and produces a [`MarkupDocument`]:
//! - one element per scene object, component and property
//! - values rendered as attributes and/or discrete elements
//! - arrays with optional trailing-run compression
//! - superclass and interface listings from [`TypeMetadata`]
//! - `referenced-by` back-annotations on every referenced object, plus a
//!   `references` summary block
//!
//! ```ignore
//! let scene = MemoryScene::load_from_file("level.toml")?;
//! let dump = dump_scene(&scene, &DumpOptions::terse())?;
//! std::fs::write("level.xml", dump.to_xml_string()?)?;
//! ```
//!
//! [`TypeMetadata`]: scene_graph::TypeMetadata

pub mod error;
pub mod diagnostics;
pub mod options;
pub mod index;
pub mod render;
pub mod array;
pub mod ancestry;
pub mod annotate;
pub mod walker;

pub use error::*;
pub use diagnostics::*;
pub use options::*;
pub use index::*;
pub use render::ValueRenderer;
pub use annotate::AnnotationReport;
pub use walker::SceneWalker;

use std::io::Write;

use scene_graph::SceneSource;
use scene_markup::{MarkupDocument, XmlStyle};

/// Version written on the `Scene` root element
pub const DUMP_FORMAT_VERSION: u32 = 1;

/// Result of one parse
#[derive(Debug)]
pub struct SceneDump {
    pub document: MarkupDocument,
    /// Scene object id to its element
    pub objects: ObjectIndex,
    /// Referenced id to referring elements
    pub references: ReferenceIndex,
    /// Recovered faults, in the order they occurred
    pub diagnostics: Vec<Diagnostic>,
    pub annotations: AnnotationReport,
}

impl SceneDump {
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Indented XML with declaration
    pub fn to_xml_string(&self) -> Result<String> {
        Ok(self.document.to_xml_string()?)
    }

    pub fn write_xml<W: Write>(&self, out: W, style: XmlStyle) -> Result<()> {
        Ok(self.document.write_xml(out, style)?)
    }
}

/// Dump `source` with `options`
pub fn dump_scene(source: &dyn SceneSource, options: &DumpOptions) -> Result<SceneDump> {
    SceneWalker::new(options, DUMP_FORMAT_VERSION).parse(source)
}

pub mod prelude {
    pub use crate::error::{DumpError, Result};
    pub use crate::diagnostics::{Diagnostic, Severity};
    pub use crate::options::{Abbreviations, DumpOptions, OmitWhen, Preset};
    pub use crate::walker::SceneWalker;
    pub use crate::{dump_scene, SceneDump, DUMP_FORMAT_VERSION};
}
