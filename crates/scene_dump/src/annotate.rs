//! Back-reference annotation
//!
//! Runs once the walk is complete, when every target that will ever be
//! written has an element. For each target in the reference index (ascending
//! id) that also has an element, every referrer becomes a `referenced-by`
//! marker inserted as the target's first child, carrying a breadcrumb such as
//! `Root -» Child -» MonoBehaviour(Game.Spawner) •-» target`.

use scene_markup::{MarkupDocument, NodeId};

use crate::error::Result;
use crate::index::{ObjectIndex, ReferenceIndex};

/// Containers skipped when looking for the component that owns a referrer
const PROPERTY_CONTAINERS: &[&str] = &[
    "properties",
    "property",
    "property-array",
    "value",
    "row",
    "col",
    "same-value",
];

const PATH_SEPARATOR: &str = " -» ";
const PROPERTY_SEPARATOR: &str = " •-» ";

/// Outcome of one annotation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnnotationReport {
    /// `referenced-by` markers written
    pub annotations: usize,
    /// Targets that received at least one marker
    pub targets: usize,
    /// Edges whose target was never dumped
    pub dropped: usize,
}

/// Nearest ancestor of `referrer` that is not a property container
pub fn enclosing_component(doc: &MarkupDocument, referrer: NodeId) -> Option<NodeId> {
    doc.ancestors(referrer).find(|a| {
        doc.local_name(*a)
            .map_or(false, |name| !PROPERTY_CONTAINERS.contains(&name))
    })
}

/// `A -» B -» Tag(type) •-» property`
pub fn breadcrumb(doc: &MarkupDocument, component: NodeId, property: &str) -> String {
    let mut names: Vec<&str> = std::iter::once(component)
        .chain(doc.ancestors(component))
        .filter(|n| doc.local_name(*n) == Some("GameObject"))
        .map(|n| doc.attribute(n, "name").unwrap_or_default())
        .collect();
    names.reverse();

    let mut path = String::new();
    for name in names {
        path.push_str(name);
        path.push_str(PATH_SEPARATOR);
    }
    path.push_str(doc.name(component).unwrap_or_default());
    path.push('(');
    path.push_str(doc.attribute(component, "type").unwrap_or_default());
    path.push(')');
    path.push_str(PROPERTY_SEPARATOR);
    path.push_str(property);
    path
}

/// Insert `referenced-by` markers and fill the `references` summary
pub fn annotate(
    doc: &mut MarkupDocument,
    objects: &ObjectIndex,
    references: &ReferenceIndex,
    summary: NodeId,
) -> Result<AnnotationReport> {
    let mut report = AnnotationReport::default();

    for (target, referrers) in references.iter() {
        let Some(target_element) = objects.get(target) else {
            log::debug!("Reference target {} was not dumped; {} edge(s) dropped", target, referrers.len());
            report.dropped += referrers.len();
            continue;
        };

        let target_name = doc
            .attribute(target_element, "name")
            .or_else(|| doc.attribute(target_element, "type"))
            .unwrap_or_default()
            .to_string();
        let entry = doc.append_element(summary, "target")?;
        doc.set_attribute(entry, "id", target.to_string())?;
        doc.set_attribute(entry, "name", target_name)?;
        doc.set_attribute(entry, "count", referrers.len().to_string())?;

        for referrer in referrers {
            let component = enclosing_component(doc, *referrer).unwrap_or(*referrer);
            let property = doc.attribute(*referrer, "name").unwrap_or_default().to_string();
            let component_id = doc.attribute(component, "id").unwrap_or_default().to_string();
            let path = breadcrumb(doc, component, &property);

            let marker = doc.insert_element_first(target_element, "referenced-by")?;
            doc.set_attribute(marker, "component-id", component_id)?;
            doc.set_attribute(marker, "property-name", property)?;
            doc.set_text(marker, &path)?;

            doc.append_text_element(entry, "referrer", &path)?;
            report.annotations += 1;
        }
        report.targets += 1;
    }

    log::debug!(
        "Annotated {} target(s) with {} marker(s); {} edge(s) dropped",
        report.targets,
        report.annotations,
        report.dropped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_graph::ObjectId;

    /// Scene > GameObject(Root) > components > MonoBehaviour > properties > property
    fn scene() -> (MarkupDocument, NodeId, NodeId, NodeId, NodeId) {
        let mut doc = MarkupDocument::new();
        let root = doc.create_root("Scene").unwrap();
        let go = doc.append_element(root, "GameObject").unwrap();
        doc.set_attribute(go, "name", "Root").unwrap();
        let comps = doc.append_element(go, "components").unwrap();
        let comp = doc.append_element(comps, "MonoBehaviour").unwrap();
        doc.set_attribute(comp, "type", "Game.Spawner").unwrap();
        doc.set_attribute(comp, "id", "0x00000002").unwrap();
        let props = doc.append_element(comp, "properties").unwrap();
        let prop = doc.append_element(props, "property").unwrap();
        doc.set_attribute(prop, "name", "target").unwrap();
        (doc, root, go, comp, prop)
    }

    #[test]
    fn test_enclosing_component_skips_containers() {
        let (mut doc, _, _, comp, prop) = scene();
        assert_eq!(enclosing_component(&doc, prop), Some(comp));

        let array = doc.append_element(prop, "property-array").unwrap();
        let item = doc.append_element(array, "value").unwrap();
        assert_eq!(enclosing_component(&doc, item), Some(comp));
    }

    #[test]
    fn test_breadcrumb() {
        let (mut doc, _, go, comp, _) = scene();
        assert_eq!(breadcrumb(&doc, comp, "target"), "Root -» MonoBehaviour(Game.Spawner) •-» target");

        let kids = doc.append_element(go, "gameobjects").unwrap();
        let child = doc.append_element(kids, "GameObject").unwrap();
        doc.set_attribute(child, "name", "Child").unwrap();
        let c = doc.append_element(child, "Component").unwrap();
        doc.set_attribute(c, "type", "Game.Door").unwrap();
        assert_eq!(breadcrumb(&doc, c, "key"), "Root -» Child -» Component(Game.Door) •-» key");
    }

    #[test]
    fn test_annotations_prepend_and_drop_missing() {
        let (mut doc, root, go, _, prop) = scene();
        let first = doc.append_element(go, "placeholder").unwrap();
        let summary = doc.append_element(root, "references").unwrap();

        let mut objects = ObjectIndex::new();
        objects.register(ObjectId::new(1), go);
        let mut refs = ReferenceIndex::new();
        refs.add(ObjectId::new(1), prop);
        refs.add(ObjectId::new(1), prop);
        refs.add(ObjectId::new(99), prop);

        let report = annotate(&mut doc, &objects, &refs, summary).unwrap();
        assert_eq!(report, AnnotationReport { annotations: 2, targets: 1, dropped: 1 });

        let children = doc.children(go);
        assert_eq!(doc.local_name(children[0]), Some("referenced-by"));
        assert_eq!(doc.local_name(children[1]), Some("referenced-by"));
        assert!(children.contains(&first));
        assert_eq!(doc.attribute(children[0], "component-id"), Some("0x00000002"));
        assert_eq!(doc.attribute(children[0], "property-name"), Some("target"));
        assert_eq!(doc.text(children[0]), "Root -» MonoBehaviour(Game.Spawner) •-» target");

        let targets: Vec<_> = doc.child_elements(summary, "target").collect();
        assert_eq!(targets.len(), 1);
        assert_eq!(doc.attribute(targets[0], "id"), Some("0x00000001"));
        assert_eq!(doc.attribute(targets[0], "name"), Some("Root"));
        assert_eq!(doc.attribute(targets[0], "count"), Some("2"));
        assert_eq!(doc.child_elements(targets[0], "referrer").count(), 2);
    }
}
