//! Superclass and interface listings
//!
//! A plain walk up the adapter's base-type chain. The walk stops at the first
//! type in the configured stop-set, at the top of the chain, or after
//! [`MAX_ANCESTRY`] entries (base-type metadata may loop).

use std::collections::BTreeSet;

use scene_graph::{ObjectId, TypeMetadata};
use scene_markup::{MarkupDocument, NodeId};

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::options::DumpOptions;

/// Hard ceiling on superclass chain length
pub const MAX_ANCESTRY: usize = 100;

/// Base types of one component type, nearest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ancestry {
    pub chain: Vec<String>,
    /// The walk hit [`MAX_ANCESTRY`]
    pub truncated: bool,
}

/// Collect the superclasses of `type_name`, excluding the type itself
pub fn superclasses(types: &dyn TypeMetadata, type_name: &str, stop: &BTreeSet<String>) -> Ancestry {
    let mut ancestry = Ancestry::default();
    let mut current = types.base_type(type_name);
    while let Some(base) = current {
        if stop.contains(base) {
            break;
        }
        if ancestry.chain.len() >= MAX_ANCESTRY {
            ancestry.truncated = true;
            break;
        }
        ancestry.chain.push(base.to_string());
        current = types.base_type(base);
    }
    ancestry
}

/// How one listing is laid out
struct Listing<'a> {
    separator: Option<&'a str>,
    inline_max: usize,
    attribute: &'a str,
    container: Option<&'a str>,
    tag: &'a str,
}

impl Listing<'_> {
    /// Write `names` under `element`; returns the node later notes attach to
    fn write(
        &self,
        doc: &mut MarkupDocument,
        element: NodeId,
        options: &DumpOptions,
        names: &[String],
    ) -> Result<NodeId> {
        if let Some(separator) = self.separator.filter(|s| !s.is_empty()) {
            let joined = names
                .iter()
                .map(|n| options.abbreviate_type(n))
                .collect::<Vec<_>>()
                .join(separator);
            if names.len() <= self.inline_max {
                doc.set_attribute(element, self.attribute, joined)?;
            } else {
                doc.append_text_element(element, self.tag, &joined)?;
            }
            return Ok(element);
        }

        let container = match self.container {
            Some(tag) => doc.append_element(element, tag)?,
            None => element,
        };
        for name in names {
            doc.append_text_element(container, self.tag, &options.abbreviate_type(name))?;
        }
        Ok(container)
    }
}

/// Write the superclass listing of a component element
pub fn write_superclasses(
    doc: &mut MarkupDocument,
    element: NodeId,
    options: &DumpOptions,
    types: &dyn TypeMetadata,
    type_name: &str,
    object: ObjectId,
    diagnostics: &mut Diagnostics,
) -> Result<()> {
    let ancestry = superclasses(types, type_name, &options.superclass_stop_types);
    if ancestry.chain.is_empty() {
        return Ok(());
    }

    let listing = Listing {
        separator: options.superclass_separator.as_deref(),
        inline_max: options.superclass_inline_max,
        attribute: "extends",
        container: options.superclass_container_tag.as_deref(),
        tag: &options.superclass_tag,
    };
    let container = listing.write(doc, element, options, &ancestry.chain)?;

    if ancestry.truncated {
        diagnostics.warn(
            Some(object),
            format!(
                "Superclass chain of '{}' exceeds {} entries; truncated",
                type_name, MAX_ANCESTRY
            ),
        );
        doc.append_comment(container, "superclass chain truncated")?;
    }
    Ok(())
}

/// Interfaces of `type_name` and of every base type, first declaration wins
pub fn implemented_interfaces(types: &dyn TypeMetadata, type_name: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = Some(type_name);
    let mut steps = 0;
    while let Some(name) = current {
        for interface in types.interfaces(name) {
            if !out.iter().any(|i| i == interface) {
                out.push(interface.to_string());
            }
        }
        steps += 1;
        if steps > MAX_ANCESTRY {
            break;
        }
        current = types.base_type(name);
    }
    out
}

/// Write the interface listing of a component element
pub fn write_interfaces(
    doc: &mut MarkupDocument,
    element: NodeId,
    options: &DumpOptions,
    types: &dyn TypeMetadata,
    type_name: &str,
) -> Result<()> {
    let interfaces = implemented_interfaces(types, type_name);
    if interfaces.is_empty() {
        return Ok(());
    }

    let listing = Listing {
        separator: options.interface_separator.as_deref(),
        inline_max: options.interface_inline_max,
        attribute: "implements",
        container: options.interface_container_tag.as_deref(),
        tag: &options.interface_tag,
    };
    listing.write(doc, element, options, &interfaces)?;
    Ok(())
}
