//! Object and reference indices
//!
//! Both are built during the walk and consumed by the annotation pass. Keys
//! are ordered so the pass visits targets in a stable order.

use std::collections::BTreeMap;

use scene_graph::ObjectId;
use scene_markup::NodeId;

/// Source identity to the element created for it
#[derive(Debug, Clone, Default)]
pub struct ObjectIndex {
    entries: BTreeMap<ObjectId, NodeId>,
}

impl ObjectIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the element for `id`.
    ///
    /// The first registration wins; returns `false` when `id` already has an
    /// element.
    pub fn register(&mut self, id: ObjectId, node: NodeId) -> bool {
        match self.entries.entry(id) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(node);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, id: ObjectId) -> Option<NodeId> {
        self.entries.get(&id).copied()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in identity order
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, NodeId)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }
}

/// Target identity to the elements that reference it, in discovery order
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    edges: BTreeMap<ObjectId, Vec<NodeId>>,
}

impl ReferenceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `referrer` points at `target`
    pub fn add(&mut self, target: ObjectId, referrer: NodeId) {
        self.edges.entry(target).or_default().push(referrer);
    }

    pub fn referrers(&self, target: ObjectId) -> &[NodeId] {
        self.edges.get(&target).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of recorded edges into `target`
    pub fn in_degree(&self, target: ObjectId) -> usize {
        self.referrers(target).len()
    }

    /// Number of distinct targets
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Total edges over all targets
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    /// Targets in ascending identity order with their referrers
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &[NodeId])> + '_ {
        self.edges.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}
