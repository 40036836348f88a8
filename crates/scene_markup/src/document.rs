//! Arena-backed markup tree

use core::fmt;

use indexmap::IndexMap;

use crate::error::{MarkupError, Result};
use crate::name::{encode_attribute_name, encode_name, encode_text, local_part, qualify};

/// Handle to a node in a [`MarkupDocument`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }

    /// Raw arena slot
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Content of a node
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Element with a qualified name and ordered, unique attributes
    Element {
        name: String,
        attributes: IndexMap<String, String>,
    },
    /// Character data
    Text(String),
    /// Comment
    Comment(String),
}

/// One node of the output tree
#[derive(Clone, Debug)]
pub struct MarkupNode {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl MarkupNode {
    /// Parent at creation time; `None` for the root
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }
}

/// Output document
///
/// Owns every node. Ownership flows from parent to child through child lists;
/// the parent link is a plain handle used for upward walks only. Detached
/// nodes stay in the arena but are unreachable from the root.
#[derive(Clone, Debug, Default)]
pub struct MarkupDocument {
    nodes: Vec<MarkupNode>,
    root: Option<NodeId>,
    prefix: Option<String>,
}

impl MarkupDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document whose element names are qualified with `prefix`
    pub fn with_prefix(prefix: Option<String>) -> Self {
        Self {
            prefix: prefix.filter(|p| !p.is_empty()),
            ..Default::default()
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes in the arena, detached ones included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Result<&MarkupNode> {
        self.nodes.get(id.index()).ok_or(MarkupError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut MarkupNode> {
        self.nodes.get_mut(id.index()).ok_or(MarkupError::UnknownNode(id))
    }

    fn push(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(MarkupNode {
            kind,
            parent,
            children: Vec::new(),
        });
        id
    }

    fn element_kind(&self, local: &str) -> NodeKind {
        NodeKind::Element {
            name: qualify(self.prefix(), &encode_name(local)),
            attributes: IndexMap::new(),
        }
    }

    fn ensure_element(&self, id: NodeId) -> Result<()> {
        if self.node(id)?.is_element() {
            Ok(())
        } else {
            Err(MarkupError::NotAnElement(id))
        }
    }

    /// Create the root element
    pub fn create_root(&mut self, local: &str) -> Result<NodeId> {
        if self.root.is_some() {
            return Err(MarkupError::RootExists);
        }
        let kind = self.element_kind(local);
        let id = self.push(kind, None);
        self.root = Some(id);
        Ok(id)
    }

    /// Declare the document namespace on the root element
    pub fn declare_namespace(&mut self, namespace: &str) -> Result<()> {
        let root = self.root.ok_or(MarkupError::NoRoot)?;
        let key = match &self.prefix {
            Some(p) => format!("xmlns:{}", p),
            None => "xmlns".to_string(),
        };
        if let NodeKind::Element { attributes, .. } = &mut self.node_mut(root)?.kind {
            attributes.insert(key, namespace.to_string());
        }
        Ok(())
    }

    fn attach(&mut self, parent: NodeId, kind: NodeKind, first: bool) -> Result<NodeId> {
        self.ensure_element(parent)?;
        let id = self.push(kind, Some(parent));
        let children = &mut self.node_mut(parent)?.children;
        if first {
            children.insert(0, id);
        } else {
            children.push(id);
        }
        Ok(id)
    }

    /// Append a new element as the last child of `parent`
    pub fn append_element(&mut self, parent: NodeId, local: &str) -> Result<NodeId> {
        let kind = self.element_kind(local);
        self.attach(parent, kind, false)
    }

    /// Insert a new element as the first child of `parent`
    pub fn insert_element_first(&mut self, parent: NodeId, local: &str) -> Result<NodeId> {
        let kind = self.element_kind(local);
        self.attach(parent, kind, true)
    }

    /// Append an element holding only `text`
    pub fn append_text_element(&mut self, parent: NodeId, local: &str, text: &str) -> Result<NodeId> {
        let id = self.append_element(parent, local)?;
        self.set_text(id, text)?;
        Ok(id)
    }

    pub fn append_comment(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        self.attach(parent, NodeKind::Comment(encode_text(text)), false)
    }

    /// Replace the element's text content, keeping child elements and comments
    pub fn set_text(&mut self, element: NodeId, text: &str) -> Result<()> {
        self.ensure_element(element)?;
        let text = encode_text(text);
        let existing = self
            .node(element)?
            .children
            .iter()
            .copied()
            .find(|c| matches!(self.nodes[c.index()].kind, NodeKind::Text(_)));
        match existing {
            Some(id) => self.node_mut(id)?.kind = NodeKind::Text(text),
            None => {
                let id = self.push(NodeKind::Text(text), Some(element));
                self.node_mut(element)?.children.insert(0, id);
            }
        }
        Ok(())
    }

    /// Set an attribute; an existing key keeps its position
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        let key = encode_attribute_name(name);
        let value: String = value.into();
        match &mut self.node_mut(element)?.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.insert(key, encode_text(&value));
                Ok(())
            }
            _ => Err(MarkupError::NotAnElement(element)),
        }
    }

    pub fn attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        match &self.node(element).ok()?.kind {
            NodeKind::Element { attributes, .. } => attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    /// Attributes of an element in insertion order
    pub fn attributes(&self, element: NodeId) -> impl Iterator<Item = (&str, &str)> {
        let attrs = match self.node(element).map(|n| &n.kind) {
            Ok(NodeKind::Element { attributes, .. }) => Some(attributes),
            _ => None,
        };
        attrs
            .into_iter()
            .flat_map(|a| a.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Qualified element name
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match &self.node(id).ok()?.kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Element name without its prefix
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.name(id).map(local_part)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok()?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Child elements with the given local name
    pub fn child_elements<'a>(&'a self, id: NodeId, local: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.children(id)
            .iter()
            .copied()
            .filter(move |c| self.local_name(*c) == Some(local))
    }

    /// Whether the element has no content at all
    pub fn is_empty_element(&self, id: NodeId) -> bool {
        self.children(id).is_empty()
    }

    /// Concatenated text of the node and its descendants
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else { return };
        match &node.kind {
            NodeKind::Text(t) => out.push_str(t),
            NodeKind::Element { .. } => {
                for child in &node.children {
                    self.collect_text(*child, out);
                }
            }
            NodeKind::Comment(_) => {}
        }
    }

    /// Unlink a node from its parent's child list
    pub fn detach(&mut self, id: NodeId) -> Result<()> {
        let parent = match self.node(id)?.parent {
            Some(p) => p,
            None => return Ok(()),
        };
        self.node_mut(parent)?.children.retain(|c| *c != id);
        Ok(())
    }

    /// Walk from `id` up to the root, excluding `id` itself
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// Reachable nodes below `id` in document order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }
}

/// Iterator over a node's ancestors, nearest first
pub struct Ancestors<'a> {
    doc: &'a MarkupDocument,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}
