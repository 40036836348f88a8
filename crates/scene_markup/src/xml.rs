//! XML serialization

use std::io::Write;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::document::{MarkupDocument, NodeId, NodeKind};
use crate::error::{MarkupError, Result};

/// Output layout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct XmlStyle {
    /// Spaces per nesting level; `None` writes everything on one line
    pub indent: Option<usize>,
    /// Write the `<?xml ...?>` declaration
    pub declaration: bool,
}

impl Default for XmlStyle {
    fn default() -> Self {
        Self {
            indent: Some(2),
            declaration: true,
        }
    }
}

impl XmlStyle {
    /// Single line, with declaration
    pub fn compact() -> Self {
        Self {
            indent: None,
            declaration: true,
        }
    }
}

fn write_error(e: impl std::fmt::Display) -> MarkupError {
    MarkupError::Write(e.to_string())
}

/// Comments may not contain `--` or end in `-`
fn sanitize_comment(text: &str) -> String {
    let mut out = text.replace("--", "- -");
    if out.ends_with('-') {
        out.push(' ');
    }
    out
}

impl MarkupDocument {
    /// Serialize with the default style
    pub fn to_xml_string(&self) -> Result<String> {
        self.to_xml_string_with(XmlStyle::default())
    }

    pub fn to_xml_string_with(&self, style: XmlStyle) -> Result<String> {
        let mut buf = Vec::new();
        self.write_xml(&mut buf, style)?;
        String::from_utf8(buf).map_err(write_error)
    }

    /// Serialize the tree reachable from the root into `out`
    pub fn write_xml<W: Write>(&self, out: W, style: XmlStyle) -> Result<()> {
        let root = self.root().ok_or(MarkupError::NoRoot)?;
        log::trace!("Writing markup document ({} node(s) in arena)", self.len());
        let mut writer = match style.indent {
            Some(width) if width > 0 => Writer::new_with_indent(out, b' ', width),
            _ => Writer::new(out),
        };

        if style.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
                .map_err(write_error)?;
        }
        self.write_node(&mut writer, root)?;
        if style.indent.is_some() {
            writer.get_mut().write_all(b"\n")?;
        }
        Ok(())
    }

    fn write_node<W: Write>(&self, writer: &mut Writer<W>, id: NodeId) -> Result<()> {
        let node = self.node(id)?;
        match &node.kind {
            NodeKind::Element { name, attributes } => {
                let mut start = BytesStart::new(name.as_str());
                for (key, value) in attributes {
                    start.push_attribute((key.as_str(), value.as_str()));
                }
                if node.children().is_empty() {
                    writer.write_event(Event::Empty(start)).map_err(write_error)?;
                } else {
                    writer.write_event(Event::Start(start)).map_err(write_error)?;
                    for child in node.children() {
                        self.write_node(writer, *child)?;
                    }
                    writer
                        .write_event(Event::End(BytesEnd::new(name.as_str())))
                        .map_err(write_error)?;
                }
            }
            NodeKind::Text(text) => {
                writer
                    .write_event(Event::Text(BytesText::new(text)))
                    .map_err(write_error)?;
            }
            NodeKind::Comment(text) => {
                let text = sanitize_comment(text);
                writer
                    .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                    .map_err(write_error)?;
            }
        }
        Ok(())
    }
}
