//! Array layout and tail compression

use scene_graph::{ArrayValue, Value, NULL_TEXT};
use scene_markup::{MarkupDocument, NodeId, Result};

use crate::index::ReferenceIndex;
use crate::render::ValueRenderer;

/// Comparison key for compression; references also compare by target
fn compression_key(value: &Value) -> String {
    match value {
        Value::Reference(r) => format!("{} {}", r, r.id),
        other => other.to_string(),
    }
}

/// Start of the maximal trailing run of items with equal keys.
///
/// Returns `items.len()` when the run is shorter than two items, i.e. there
/// is nothing to collapse.
pub fn trailing_run_start(items: &[Value]) -> usize {
    let Some(last) = items.last() else { return 0 };
    let last_key = compression_key(last);
    let mut start = items.len() - 1;
    while start > 0 && compression_key(&items[start - 1]) == last_key {
        start -= 1;
    }
    if items.len() - start >= 2 {
        start
    } else {
        items.len()
    }
}

fn item_type(array: &ArrayValue, item: &Value) -> String {
    match item {
        Value::Array(nested) => nested.type_name(),
        _ => array.element_type.clone(),
    }
}

impl ValueRenderer<'_> {
    /// Write an array as a `property-array` element
    pub fn render_array(
        &self,
        doc: &mut MarkupDocument,
        refs: &mut ReferenceIndex,
        parent: NodeId,
        name: &str,
        array: &ArrayValue,
    ) -> Result<NodeId> {
        let element = doc.append_element(parent, "property-array")?;
        doc.set_attribute(element, "name", name)?;
        doc.set_attribute(element, "type", self.options.abbreviate_type(&array.type_name()))?;
        doc.set_attribute(element, "dimensions", array.rank().to_string())?;
        doc.set_attribute(element, "length", array.len().to_string())?;

        match array.rank() {
            1 => self.render_items(doc, refs, element, name, array)?,
            2 => self.render_grid(doc, refs, element, name, array)?,
            rank => {
                log::debug!("Array '{}' has {} dimensions; not rendered", name, rank);
                doc.append_comment(element, "array too large to render")?;
            }
        }
        Ok(element)
    }

    fn render_items(
        &self,
        doc: &mut MarkupDocument,
        refs: &mut ReferenceIndex,
        element: NodeId,
        name: &str,
        array: &ArrayValue,
    ) -> Result<()> {
        let items = &array.items;
        if items.is_empty() {
            doc.set_attribute(element, "size", "0")?;
            doc.set_attribute(element, "isEmpty", "true")?;
            return Ok(());
        }

        let compressible = self.options.compress_arrays
            && items.iter().all(|item| !matches!(item, Value::Array(_)));
        let run_start = if compressible && items.len() > 1 {
            trailing_run_start(items)
        } else {
            items.len()
        };

        for (index, item) in items.iter().enumerate().take(run_start) {
            let child = self.render_value(
                doc,
                refs,
                element,
                "value",
                &format!("{}[{}]", name, index),
                &item_type(array, item),
                item,
            )?;
            doc.set_attribute(child, "index", index.to_string())?;
        }

        if run_start < items.len() {
            let last = items.len() - 1;
            let shared = &items[last];
            let run = doc.append_element(element, "same-value")?;
            let text = shared.to_string();
            doc.set_text(run, &self.options.abbreviate_value(&text))?;
            doc.set_attribute(
                run,
                "name",
                format!("«{}[{}]»…«{}[{}]»", name, run_start, name, last),
            )?;
            let type_name = match shared {
                Value::Null => NULL_TEXT.to_string(),
                _ => self.options.abbreviate_type(&item_type(array, shared)),
            };
            doc.set_attribute(run, "type", type_name)?;
            doc.set_attribute(run, "index-from", run_start.to_string())?;
            doc.set_attribute(run, "index-to", last.to_string())?;
            if let Value::Reference(target) = shared {
                doc.set_attribute(run, "target-name", target.name.as_str())?;
                doc.set_attribute(run, "target-id", target.id.to_string())?;
                refs.add(target.id, run);
            }
        }
        Ok(())
    }

    fn render_grid(
        &self,
        doc: &mut MarkupDocument,
        refs: &mut ReferenceIndex,
        element: NodeId,
        name: &str,
        array: &ArrayValue,
    ) -> Result<()> {
        let rows = array.dims.first().copied().unwrap_or(0);
        let cols = array.dims.get(1).copied().unwrap_or(0);
        for row in 0..rows {
            let row_element = doc.append_element(element, "row")?;
            doc.set_attribute(row_element, "row", row.to_string())?;
            for col in 0..cols {
                let item = array.get2(row, col).unwrap_or(&Value::Null);
                let cell = self.render_value(
                    doc,
                    refs,
                    row_element,
                    "col",
                    &format!("{}[{},{}]", name, row, col),
                    &item_type(array, item),
                    item,
                )?;
                doc.set_attribute(cell, "col", col.to_string())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::DumpOptions;
    use scene_graph::{ObjectId, ObjectRef};

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().map(|v| Value::Int(*v)).collect()
    }

    fn render(options: &DumpOptions, array: &ArrayValue) -> (MarkupDocument, NodeId, ReferenceIndex) {
        let mut doc = MarkupDocument::new();
        let root = doc.create_root("properties").unwrap();
        let mut refs = ReferenceIndex::new();
        let e = ValueRenderer::new(options)
            .render_array(&mut doc, &mut refs, root, "items", array)
            .unwrap();
        (doc, e, refs)
    }

    #[test]
    fn test_trailing_run_start() {
        assert_eq!(trailing_run_start(&ints(&[])), 0);
        assert_eq!(trailing_run_start(&ints(&[5])), 1);
        assert_eq!(trailing_run_start(&ints(&[5, 5, 5])), 0);
        assert_eq!(trailing_run_start(&ints(&[1, 2, 3])), 3);
        assert_eq!(trailing_run_start(&ints(&[1, 2, 2])), 1);
        assert_eq!(trailing_run_start(&ints(&[2, 1, 2, 2, 2])), 2);
    }

    #[test]
    fn test_references_with_same_name_not_merged() {
        let a = Value::Reference(ObjectRef::node(ObjectId::new(1), "Enemy"));
        let b = Value::Reference(ObjectRef::node(ObjectId::new(2), "Enemy"));
        assert_eq!(trailing_run_start(&[a.clone(), b.clone()]), 2);
        assert_eq!(trailing_run_start(&[b.clone(), a.clone(), a]), 1);
    }

    #[test]
    fn test_empty_array() {
        let options = DumpOptions::default();
        let (doc, e, _) = render(&options, &ArrayValue::one_dimensional("int", vec![]));
        assert_eq!(doc.attribute(e, "size"), Some("0"));
        assert_eq!(doc.attribute(e, "isEmpty"), Some("true"));
        assert_eq!(doc.attribute(e, "length"), Some("0"));
        assert_eq!(doc.attribute(e, "type"), Some("int[]"));
        assert!(doc.is_empty_element(e));
    }

    #[test]
    fn test_single_item() {
        let options = DumpOptions::default();
        let (doc, e, _) = render(&options, &ArrayValue::one_dimensional("int", ints(&[7])));
        let children = doc.children(e);
        assert_eq!(children.len(), 1);
        assert_eq!(doc.local_name(children[0]), Some("value"));
        assert_eq!(doc.attribute(children[0], "index"), Some("0"));
        assert_eq!(doc.attribute(children[0], "name"), Some("items[0]"));
        assert_eq!(doc.text(children[0]), "7");
    }

    #[test]
    fn test_compressed_tail() {
        let options = DumpOptions::default();
        let (doc, e, _) = render(&options, &ArrayValue::one_dimensional("int", ints(&[1, 2, 9, 9, 9])));
        let children = doc.children(e);
        assert_eq!(children.len(), 3);
        assert_eq!(doc.attribute(children[1], "index"), Some("1"));

        let run = children[2];
        assert_eq!(doc.local_name(run), Some("same-value"));
        assert_eq!(doc.text(run), "9");
        assert_eq!(doc.attribute(run, "index-from"), Some("2"));
        assert_eq!(doc.attribute(run, "index-to"), Some("4"));
        assert_eq!(doc.attribute(run, "name"), Some("«items[2]»…«items[4]»"));
        assert_eq!(doc.attribute(run, "type"), Some("int"));
    }

    #[test]
    fn test_compression_disabled() {
        let options = DumpOptions {
            compress_arrays: false,
            ..DumpOptions::default()
        };
        let (doc, e, _) = render(&options, &ArrayValue::one_dimensional("int", ints(&[5, 5, 5])));
        let children = doc.children(e);
        assert_eq!(children.len(), 3);
        assert!(children.iter().all(|c| doc.local_name(*c) == Some("value")));
    }

    #[test]
    fn test_jagged_arrays_not_compressed() {
        let options = DumpOptions::default();
        let inner = Value::Array(ArrayValue::one_dimensional("int", ints(&[1])));
        let outer = ArrayValue::one_dimensional("int[]", vec![inner.clone(), inner]);
        let (doc, e, _) = render(&options, &outer);
        let children = doc.children(e);
        assert_eq!(children.len(), 2);
        assert_eq!(doc.local_name(children[0]), Some("property-array"));
        assert_eq!(doc.attribute(children[1], "name"), Some("items[1]"));
        assert_eq!(doc.attribute(children[1], "index"), Some("1"));
    }

    #[test]
    fn test_nested_arrays_after_scalars_keep_their_edges() {
        let options = DumpOptions::default();
        let root_ref = Value::Reference(ObjectRef::node(ObjectId::new(1), "Root"));
        let inner = Value::Array(ArrayValue::one_dimensional("GameObject", vec![root_ref]));
        let mixed = ArrayValue::one_dimensional("object", vec![Value::Int(1), inner.clone(), inner]);
        let (doc, e, refs) = render(&options, &mixed);

        assert_eq!(doc.child_elements(e, "same-value").count(), 0);
        assert_eq!(doc.child_elements(e, "property-array").count(), 2);
        assert_eq!(refs.in_degree(ObjectId::new(1)), 2);
        assert_eq!(refs.edge_count(), 2);
    }

    #[test]
    fn test_two_dimensional_grid() {
        let options = DumpOptions::default();
        let grid = ArrayValue::two_dimensional("int", 2, 2, ints(&[1, 2, 3, 4])).unwrap();
        let (doc, e, _) = render(&options, &grid);
        assert_eq!(doc.attribute(e, "dimensions"), Some("2"));
        assert_eq!(doc.attribute(e, "type"), Some("int[,]"));
        let rows: Vec<_> = doc.child_elements(e, "row").collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(doc.attribute(rows[1], "row"), Some("1"));
        let cells: Vec<_> = doc.child_elements(rows[1], "col").collect();
        assert_eq!(doc.attribute(cells[0], "col"), Some("0"));
        assert_eq!(doc.attribute(cells[0], "name"), Some("items[1,0]"));
        assert_eq!(doc.text(cells[1]), "4");
    }

    #[test]
    fn test_higher_rank_placeholder() {
        let options = DumpOptions::default();
        let cube = ArrayValue {
            element_type: "int".into(),
            dims: vec![1, 1, 1],
            items: ints(&[0]),
        };
        let (doc, e, _) = render(&options, &cube);
        assert_eq!(doc.attribute(e, "dimensions"), Some("3"));
        assert_eq!(doc.children(e).len(), 1);
        assert!(!doc.node(doc.children(e)[0]).unwrap().is_element());
    }

    #[test]
    fn test_references_in_arrays_register_edges() {
        let options = DumpOptions::default();
        let target = Value::Reference(ObjectRef::node(ObjectId::new(3), "Spawn"));
        let other = Value::Reference(ObjectRef::node(ObjectId::new(4), "Exit"));
        let array = ArrayValue::one_dimensional("GameObject", vec![other, target.clone(), target]);
        let (doc, _, refs) = render(&options, &array);

        assert_eq!(refs.in_degree(ObjectId::new(4)), 1);
        let run = refs.referrers(ObjectId::new(3));
        assert_eq!(run.len(), 1);
        assert_eq!(doc.local_name(run[0]), Some("same-value"));
        assert_eq!(doc.attribute(run[0], "target-id"), Some("0x00000003"));
    }
}
