//! Tree walker
//!
//! Depth-first, pre-order traversal of the source scene. One walker performs
//! one parse: [`SceneWalker::parse`] consumes it, so the document and both
//! indices are always fresh.
//!
//! Output shape:
//!
//! ```text
//! Scene version xmlns
//! ├── meta (value-abbreviation*, type-abbreviation*)
//! ├── GameObject name tag id layer activeInHierarchy isStatic prefab
//! │   ├── Transform | RectTransform
//! │   ├── components
//! │   │   └── MonoBehaviour | Behaviour | Component
//! │   │       ├── extends (baseclass*)
//! │   │       ├── implements (interface*)
//! │   │       └── properties (property | property-array)*
//! │   └── gameobjects (GameObject*)
//! └── references (target (referrer*))*
//! ```

use scene_graph::{
    ComponentKind, ObjectId, PropertyEntry, SceneComponent, SceneNode, SceneSource, TypeMetadata,
};
use scene_markup::{MarkupDocument, NodeId};

use crate::ancestry;
use crate::annotate;
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::index::{ObjectIndex, ReferenceIndex};
use crate::options::{DumpOptions, OmitWhen};
use crate::render::ValueRenderer;
use crate::SceneDump;

/// Single-use scene walker
pub struct SceneWalker<'a> {
    options: &'a DumpOptions,
    renderer: ValueRenderer<'a>,
    version: u32,
    doc: MarkupDocument,
    objects: ObjectIndex,
    references: ReferenceIndex,
    diagnostics: Diagnostics,
}

impl<'a> SceneWalker<'a> {
    pub fn new(options: &'a DumpOptions, version: u32) -> Self {
        Self {
            options,
            renderer: ValueRenderer::new(options),
            version,
            doc: MarkupDocument::with_prefix(options.xml_prefix.clone()),
            objects: ObjectIndex::new(),
            references: ReferenceIndex::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Walk `source` and build the annotated document
    pub fn parse(mut self, source: &dyn SceneSource) -> Result<SceneDump> {
        self.options.validate()?;

        let root = self.doc.create_root("Scene")?;
        self.doc.set_attribute(root, "version", self.version.to_string())?;
        if !self.options.xml_namespace.is_empty() {
            self.doc.declare_namespace(&self.options.xml_namespace)?;
        }
        self.write_meta(root)?;

        let types = source.types();
        let roots = source.roots()?;
        log::debug!("Walking {} root node(s)", roots.len());
        for node in roots {
            self.visit_node(root, node, types, 0)?;
        }

        let summary = self.doc.append_element(root, "references")?;
        let report = annotate::annotate(&mut self.doc, &self.objects, &self.references, summary)?;

        log::info!(
            "Dumped {} object(s), {} reference edge(s), {} annotation(s), {} diagnostic(s)",
            self.objects.len(),
            self.references.edge_count(),
            report.annotations,
            self.diagnostics.len()
        );

        Ok(SceneDump {
            document: self.doc,
            objects: self.objects,
            references: self.references,
            diagnostics: self.diagnostics.into_vec(),
            annotations: report,
        })
    }

    fn write_meta(&mut self, root: NodeId) -> Result<()> {
        let options = self.options;
        let values = &options.value_abbreviations;
        let types = &options.type_abbreviations;
        if values.is_empty() && types.is_empty() {
            return Ok(());
        }

        let meta = self.doc.append_element(root, "meta")?;
        for (tag, table) in [("value-abbreviation", values), ("type-abbreviation", types)] {
            for (before, after) in table.iter() {
                let m = self.doc.append_element(meta, tag)?;
                self.doc.set_attribute(m, "before", before)?;
                self.doc.set_attribute(m, "after", after)?;
            }
        }
        Ok(())
    }

    fn trace(&mut self, parent: NodeId, id: ObjectId, what: &str) -> Result<()> {
        if self.options.trace_id != Some(id) {
            return Ok(());
        }
        self.diagnostics.info(Some(id), format!("Found trace id {} ({})", id, what));
        self.doc.append_comment(parent, &format!("traced {} {}", what, id))?;
        Ok(())
    }

    /// Open a container unless the policy splices children into `parent`
    fn open_container(&mut self, parent: NodeId, tag: &str) -> Result<NodeId> {
        match self.options.omit_container_policy {
            OmitWhen::Always => Ok(parent),
            OmitWhen::Never | OmitWhen::IfEmpty => Ok(self.doc.append_element(parent, tag)?),
        }
    }

    fn close_container(&mut self, parent: NodeId, container: NodeId) -> Result<()> {
        if container != parent
            && self.options.omit_container_policy == OmitWhen::IfEmpty
            && self.doc.is_empty_element(container)
        {
            self.doc.detach(container)?;
        }
        Ok(())
    }

    fn visit_node(
        &mut self,
        parent: NodeId,
        node: &dyn SceneNode,
        types: &dyn TypeMetadata,
        depth: usize,
    ) -> Result<()> {
        let id = node.id();
        if depth >= self.options.max_depth {
            self.diagnostics.warn(
                Some(id),
                format!("Depth limit {} reached at '{}'; branch truncated", self.options.max_depth, node.name()),
            );
            self.doc.append_comment(parent, &format!("depth limit reached at {} {}", node.name(), id))?;
            return Ok(());
        }
        if self.objects.contains(id) {
            self.diagnostics.warn(
                Some(id),
                format!("'{}' was already dumped; cycle in scene graph", node.name()),
            );
            self.doc.append_comment(parent, &format!("cycle: {} {} already dumped", node.name(), id))?;
            return Ok(());
        }

        let element = self.doc.append_element(parent, "GameObject")?;
        self.objects.register(id, element);
        self.trace(parent, id, "GameObject")?;

        self.doc.set_attribute(element, "name", node.name())?;
        let tag = node.tag().filter(|t| !t.trim().is_empty() && *t != "Untagged");
        match tag {
            Some(t) => self.doc.set_attribute(element, "tag", t)?,
            None if self.options.include_untagged => self.doc.set_attribute(element, "tag", "Untagged")?,
            None => {}
        }
        self.doc.set_attribute(element, "id", id.to_string())?;
        self.doc.set_attribute(element, "layer", node.layer().to_string())?;
        self.doc.set_attribute(element, "activeInHierarchy", node.active().to_string())?;
        self.doc.set_attribute(element, "isStatic", node.is_static().to_string())?;
        if let Some(prefab) = node.prefab() {
            self.doc.set_attribute(element, "prefab", prefab)?;
        }

        let components = node.components()?;
        let (placement, others): (Vec<&dyn SceneComponent>, Vec<&dyn SceneComponent>) =
            components.into_iter().partition(|c| c.is_transform_like());
        for component in placement {
            self.visit_transform(element, component)?;
        }
        if !others.is_empty() {
            let container = self.open_container(element, "components")?;
            for component in others {
                self.visit_component(container, component, types)?;
            }
            self.close_container(element, container)?;
        }

        let children = node.children()?;
        if !children.is_empty() {
            let container = self.doc.append_element(element, "gameobjects")?;
            for child in children {
                self.visit_node(container, child, types, depth + 1)?;
            }
        }
        Ok(())
    }

    fn register_component(&mut self, id: ObjectId, element: NodeId, type_name: &str) {
        if !self.objects.register(id, element) {
            self.diagnostics.warn(
                Some(id),
                format!("Component '{}' shares an id with an earlier object; not indexed", type_name),
            );
        }
    }

    fn visit_transform(&mut self, parent: NodeId, component: &dyn SceneComponent) -> Result<()> {
        let id = component.id();
        let tag = match component.kind() {
            ComponentKind::RectTransform => "RectTransform",
            _ => "Transform",
        };
        let element = self.doc.append_element(parent, tag)?;
        self.register_component(id, element, component.type_name());
        self.trace(parent, id, tag)?;
        self.doc.set_attribute(element, "id", id.to_string())?;

        let Some(data) = component.transform() else {
            self.diagnostics.warn(
                Some(id),
                format!("{} '{}' has no placement data; values omitted", tag, component.type_name()),
            );
            self.doc.append_comment(element, "placement unavailable")?;
            return Ok(());
        };

        let renderer = self.renderer;
        if component.kind() == ComponentKind::RectTransform {
            let rect = data.rect.unwrap_or_default();
            renderer.render_vector3(&mut self.doc, element, "pos", rect.anchored_position)?;
            renderer.render_compound(&mut self.doc, element, "anchorMin", &rect.anchor_min.into())?;
            renderer.render_compound(&mut self.doc, element, "anchorMax", &rect.anchor_max.into())?;
            renderer.render_compound(&mut self.doc, element, "pivot", &rect.pivot.into())?;
        } else {
            renderer.render_vector3(&mut self.doc, element, "position", data.position)?;
        }
        renderer.render_vector3(&mut self.doc, element, "rotation", data.rotation)?;
        renderer.render_vector3(&mut self.doc, element, "scale", data.scale)?;
        Ok(())
    }

    fn component_tag(&self, kind: ComponentKind) -> &str {
        let options = self.options;
        let tag = match kind {
            ComponentKind::Script => options
                .tagname_script
                .as_deref()
                .or(options.tagname_behaviour.as_deref()),
            ComponentKind::Behaviour => options.tagname_behaviour.as_deref(),
            _ => None,
        };
        tag.unwrap_or("Component")
    }

    fn visit_component(
        &mut self,
        parent: NodeId,
        component: &dyn SceneComponent,
        types: &dyn TypeMetadata,
    ) -> Result<()> {
        let id = component.id();
        let type_name = component.type_name();
        let tag = self.component_tag(component.kind()).to_string();

        let element = self.doc.append_element(parent, &tag)?;
        self.register_component(id, element, type_name);
        self.trace(parent, id, &tag)?;

        self.doc.set_attribute(element, "type", self.options.abbreviate_type(type_name))?;
        self.doc.set_attribute(element, "id", id.to_string())?;
        if let Some(prefab) = component.prefab() {
            self.doc.set_attribute(element, "prefab", prefab)?;
        }
        if let Some(state) = component.enablement() {
            self.doc.set_attribute(element, "enabled", state.enabled.to_string())?;
            self.doc
                .set_attribute(element, "isActiveAndEnabled", state.active_and_enabled.to_string())?;
        }

        ancestry::write_superclasses(
            &mut self.doc,
            element,
            self.options,
            types,
            type_name,
            id,
            &mut self.diagnostics,
        )?;
        ancestry::write_interfaces(&mut self.doc, element, self.options, types, type_name)?;

        let reads = component.properties()?;
        let container = self.open_container(element, "properties")?;
        for read in reads {
            match read {
                Ok(entry) => self.write_property(container, &entry)?,
                Err(fault) => self.diagnostics.warn(Some(id), fault.to_string()),
            }
        }
        self.close_container(element, container)?;
        Ok(())
    }

    fn write_property(&mut self, container: NodeId, entry: &PropertyEntry) -> Result<()> {
        if !self.options.includes_property(entry) {
            log::trace!("Skipping property '{}' ({})", entry.name, entry.runtime_type);
            return Ok(());
        }
        self.renderer
            .render_property(&mut self.doc, &mut self.references, container, entry)?;
        Ok(())
    }
}
