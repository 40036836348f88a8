//! Value rendering
//!
//! Turns one [`Value`] into markup under a parent element. Compound values
//! (vectors, colors, rects, matrices, bounds) are written as an attribute
//! named after the property, as discrete child elements, or both, following
//! [`DumpOptions`]. Reference values also record an edge in the
//! [`ReferenceIndex`] so the annotation pass can find their referrer.

use scene_graph::scene_math::{format_float, Aabb, Mat4, Vec3};
use scene_graph::{ObjectRef, PropertyEntry, RefKind, Value, NULL_TEXT};
use scene_markup::{encode_attribute_name, MarkupDocument, NodeId, Result};

use crate::index::ReferenceIndex;
use crate::options::DumpOptions;

/// Attribute keys the dump itself writes on value elements
pub const RESERVED_ATTRIBUTES: &[&str] = &[
    "name",
    "type",
    "id",
    "sp-name",
    "sp-type",
    "sp-enum-index",
    "target-name",
    "target-id",
    "index",
    "index-from",
    "index-to",
    "length",
    "dimensions",
    "size",
    "isEmpty",
];

/// Renders values according to the active options
#[derive(Clone, Copy)]
pub struct ValueRenderer<'a> {
    pub(crate) options: &'a DumpOptions,
}

impl<'a> ValueRenderer<'a> {
    pub fn new(options: &'a DumpOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &DumpOptions {
        self.options
    }

    /// Write one component property as a `property` (or `property-array`)
    /// element under `parent`
    pub fn render_property(
        &self,
        doc: &mut MarkupDocument,
        refs: &mut ReferenceIndex,
        parent: NodeId,
        entry: &PropertyEntry,
    ) -> Result<NodeId> {
        let element = self.render_value(
            doc,
            refs,
            parent,
            "property",
            &entry.name,
            &entry.runtime_type,
            &entry.value,
        )?;
        if let Some(display) = &entry.display_name {
            doc.set_attribute(element, "sp-name", display.as_str())?;
        }
        if let Some(declared) = entry.type_mismatch() {
            doc.set_attribute(element, "sp-type", self.options.abbreviate_type(declared))?;
        }
        Ok(element)
    }

    /// Write `value` as a `tag` element carrying `name` and `type`
    ///
    /// Arrays always produce a `property-array` element regardless of `tag`.
    #[allow(clippy::too_many_arguments)]
    pub fn render_value(
        &self,
        doc: &mut MarkupDocument,
        refs: &mut ReferenceIndex,
        parent: NodeId,
        tag: &str,
        name: &str,
        type_name: &str,
        value: &Value,
    ) -> Result<NodeId> {
        if let Value::Array(array) = value {
            return self.render_array(doc, refs, parent, name, array);
        }

        let element = doc.append_element(parent, tag)?;
        doc.set_attribute(element, "name", name)?;
        let type_text = if type_name.is_empty() {
            NULL_TEXT.to_string()
        } else {
            self.options.abbreviate_type(type_name)
        };
        doc.set_attribute(element, "type", type_text)?;

        match value {
            Value::Null => doc.set_text(element, NULL_TEXT)?,
            Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Char(_)
            | Value::String(_)
            | Value::LayerMask(_) => self.write_text(doc, element, &value.to_string())?,
            Value::Vec2(_) | Value::Vec3(_) | Value::Vec4(_) | Value::Color(_) | Value::Rect(_) => {
                self.render_compound(doc, element, name, value)?
            }
            Value::Mat4(m) => self.render_matrix(doc, element, name, m)?,
            Value::Bounds(b) => self.render_bounds(doc, element, name, b)?,
            Value::Enum { index, .. } => {
                self.write_text(doc, element, &value.to_string())?;
                doc.set_attribute(element, "sp-enum-index", index.to_string())?;
            }
            Value::Reference(target) => self.render_reference(doc, refs, element, target)?,
            Value::Array(_) => {}
        }
        Ok(element)
    }

    /// Element text, value-abbreviated; empty strings leave the element empty
    fn write_text(&self, doc: &mut MarkupDocument, element: NodeId, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        doc.set_text(element, &self.options.abbreviate_value(text))
    }

    fn render_reference(
        &self,
        doc: &mut MarkupDocument,
        refs: &mut ReferenceIndex,
        element: NodeId,
        target: &ObjectRef,
    ) -> Result<()> {
        doc.set_attribute(element, "target-name", target.name.as_str())?;
        doc.set_attribute(element, "target-id", target.id.to_string())?;
        if target.kind == RefKind::Component {
            self.write_text(doc, element, &target.to_string())?;
        }
        refs.add(target.id, element);
        Ok(())
    }

    /// Write the inline text form of a compound value under the property's
    /// own name. Returns false when that name is taken by another attribute.
    fn value_attribute(
        &self,
        doc: &mut MarkupDocument,
        element: NodeId,
        name: &str,
        text: String,
    ) -> Result<bool> {
        let key = encode_attribute_name(name);
        if RESERVED_ATTRIBUTES.contains(&key.as_str()) || doc.attribute(element, &key).is_some() {
            log::debug!("Property '{}' collides with a reserved attribute; writing elements instead", name);
            return Ok(false);
        }
        doc.set_attribute(element, name, text)?;
        Ok(true)
    }

    /// Discrete elements are written when asked for, or when the attribute
    /// form was wanted but its key was taken
    fn wants_elements(&self, attribute_written: bool) -> bool {
        self.options.include_value_as_discrete_elements
            || (self.options.include_value_string_as_property && !attribute_written)
    }

    /// Vectors, colors and rects: `(a, b, ..)` attribute and/or a typed
    /// element with one child per channel
    pub fn render_compound(
        &self,
        doc: &mut MarkupDocument,
        element: NodeId,
        name: &str,
        value: &Value,
    ) -> Result<()> {
        let (tag, channels): (&str, Vec<(&str, f32)>) = match value {
            Value::Vec2(v) => ("Vector2", vec![("x", v.x), ("y", v.y)]),
            Value::Vec3(v) => ("Vector3", vec![("x", v.x), ("y", v.y), ("z", v.z)]),
            Value::Vec4(v) => ("Vector4", vec![("x", v.x), ("y", v.y), ("z", v.z), ("w", v.w)]),
            Value::Color(c) => ("Color", vec![("r", c.r), ("g", c.g), ("b", c.b), ("a", c.a)]),
            Value::Rect(r) => (
                "Rect",
                vec![("x", r.x), ("y", r.y), ("width", r.width), ("height", r.height)],
            ),
            _ => return Ok(()),
        };

        let written = self.options.include_value_string_as_property
            && self.value_attribute(doc, element, name, value.to_string())?;
        if self.wants_elements(written) {
            let e = doc.append_element(element, tag)?;
            doc.set_attribute(e, "name", name)?;
            for (channel, v) in channels {
                doc.append_text_element(e, channel, &format_float(v))?;
            }
        }
        Ok(())
    }

    /// Shorthand for a named `Vector3` under `element`
    pub fn render_vector3(
        &self,
        doc: &mut MarkupDocument,
        element: NodeId,
        name: &str,
        value: Vec3,
    ) -> Result<()> {
        self.render_compound(doc, element, name, &Value::Vec3(value))
    }

    fn render_matrix(
        &self,
        doc: &mut MarkupDocument,
        element: NodeId,
        name: &str,
        matrix: &Mat4,
    ) -> Result<()> {
        let written = self.options.include_value_string_as_property
            && self.value_attribute(doc, element, name, matrix.to_string())?;
        if self.wants_elements(written) {
            let m = doc.append_element(element, "Matrix4x4")?;
            doc.set_attribute(m, "name", name)?;
            for row in matrix.to_rows() {
                let r = doc.append_element(m, "row")?;
                for v in row {
                    doc.append_text_element(r, "col", &format_float(v))?;
                }
            }
        }
        Ok(())
    }

    fn render_bounds(
        &self,
        doc: &mut MarkupDocument,
        element: NodeId,
        name: &str,
        bounds: &Aabb,
    ) -> Result<()> {
        let written = self.options.include_value_string_as_property
            && self.value_attribute(doc, element, name, bounds.to_string())?;
        if self.wants_elements(written) {
            let b = doc.append_element(element, "Bounds")?;
            doc.set_attribute(b, "name", name)?;
            self.render_vector3(doc, b, "center", bounds.center)?;
            self.render_vector3(doc, b, "extents", bounds.extents)?;
            self.render_vector3(doc, b, "max", bounds.max())?;
            self.render_vector3(doc, b, "min", bounds.min())?;
            self.render_vector3(doc, b, "size", bounds.size())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_graph::scene_math::{Color, Vec2};
    use scene_graph::ObjectId;

    fn setup() -> (MarkupDocument, NodeId, ReferenceIndex) {
        let mut doc = MarkupDocument::new();
        let root = doc.create_root("properties").unwrap();
        (doc, root, ReferenceIndex::new())
    }

    fn both() -> DumpOptions {
        DumpOptions {
            include_value_string_as_property: true,
            include_value_as_discrete_elements: true,
            ..DumpOptions::default()
        }
    }

    #[test]
    fn test_scalar_as_text() {
        let options = DumpOptions::default();
        let renderer = ValueRenderer::new(&options);
        let (mut doc, root, mut refs) = setup();

        let e = renderer
            .render_property(&mut doc, &mut refs, root, &PropertyEntry::new("count", "int", Value::Int(42)))
            .unwrap();
        assert_eq!(doc.attribute(e, "name"), Some("count"));
        assert_eq!(doc.attribute(e, "type"), Some("int"));
        assert_eq!(doc.text(e), "42");

        let f = renderer
            .render_value(&mut doc, &mut refs, root, "property", "speed", "float", &Value::Float(1.0))
            .unwrap();
        assert_eq!(doc.text(f), "1.0");

        let mask = renderer
            .render_value(&mut doc, &mut refs, root, "property", "mask", "LayerMask", &Value::LayerMask(0xFF))
            .unwrap();
        assert_eq!(doc.text(mask), "000000FF");
    }

    #[test]
    fn test_null_and_empty_string() {
        let options = DumpOptions::default();
        let renderer = ValueRenderer::new(&options);
        let (mut doc, root, mut refs) = setup();

        let n = renderer
            .render_value(&mut doc, &mut refs, root, "property", "target", "", &Value::Null)
            .unwrap();
        assert_eq!(doc.text(n), "«null»");
        assert_eq!(doc.attribute(n, "type"), Some("«null»"));

        let s = renderer
            .render_value(&mut doc, &mut refs, root, "property", "label", "string", &Value::string(""))
            .unwrap();
        assert!(doc.is_empty_element(s));
    }

    #[test]
    fn test_vector_attribute_and_elements() {
        let options = both();
        let renderer = ValueRenderer::new(&options);
        let (mut doc, root, mut refs) = setup();

        let e = renderer
            .render_value(&mut doc, &mut refs, root, "property", "offset", "Vector3", &Vec3::new(1.0, 2.0, 3.5).into())
            .unwrap();
        assert_eq!(doc.attribute(e, "offset"), Some("(1.0, 2.0, 3.5)"));
        let v = doc.child_elements(e, "Vector3").next().unwrap();
        assert_eq!(doc.attribute(v, "name"), Some("offset"));
        let axes: Vec<_> = doc
            .children(v)
            .iter()
            .map(|c| (doc.local_name(*c).unwrap().to_string(), doc.text(*c)))
            .collect();
        assert_eq!(
            axes,
            vec![
                ("x".to_string(), "1.0".to_string()),
                ("y".to_string(), "2.0".to_string()),
                ("z".to_string(), "3.5".to_string())
            ]
        );
    }

    #[test]
    fn test_attribute_only_by_default() {
        let options = DumpOptions::default();
        let renderer = ValueRenderer::new(&options);
        let (mut doc, root, mut refs) = setup();

        let e = renderer
            .render_value(&mut doc, &mut refs, root, "property", "tint", "Color", &Color::rgba(1.0, 0.5, 0.0, 1.0).into())
            .unwrap();
        assert_eq!(doc.attribute(e, "tint"), Some("(1.0, 0.5, 0.0, 1.0)"));
        assert!(doc.is_empty_element(e));

        let uv = renderer
            .render_value(&mut doc, &mut refs, root, "property", "uv", "Vector2", &Vec2::new(0.0, 1.0).into())
            .unwrap();
        assert_eq!(doc.attribute(uv, "uv"), Some("(0.0, 1.0)"));
    }

    #[test]
    fn test_compound_never_overwrites_own_attributes() {
        let options = DumpOptions::default();
        let renderer = ValueRenderer::new(&options);
        let (mut doc, root, mut refs) = setup();

        let e = renderer
            .render_value(&mut doc, &mut refs, root, "property", "type", "Vector3", &Vec3::new(1.0, 2.0, 3.0).into())
            .unwrap();
        assert_eq!(doc.attribute(e, "name"), Some("type"));
        assert_eq!(doc.attribute(e, "type"), Some("Vector3"));
        let v = doc.child_elements(e, "Vector3").next().unwrap();
        assert_eq!(doc.attribute(v, "name"), Some("type"));
        assert_eq!(doc.children(v).len(), 3);

        let entry = PropertyEntry::new("sp-name", "Bounds", Aabb::default().into()).with_display_name("Box");
        let b = renderer.render_property(&mut doc, &mut refs, root, &entry).unwrap();
        assert_eq!(doc.attribute(b, "sp-name"), Some("Box"));
        assert_eq!(doc.child_elements(b, "Bounds").count(), 1);

        let m = renderer
            .render_value(&mut doc, &mut refs, root, "property", "target-id", "Matrix4x4", &Value::Mat4(Mat4::IDENTITY))
            .unwrap();
        assert_eq!(doc.attribute(m, "target-id"), None);
        assert_eq!(doc.child_elements(m, "Matrix4x4").count(), 1);
    }

    #[test]
    fn test_matrix_rows() {
        let options = both();
        let renderer = ValueRenderer::new(&options);
        let (mut doc, root, mut refs) = setup();

        let e = renderer
            .render_value(&mut doc, &mut refs, root, "property", "m", "Matrix4x4", &Value::Mat4(Mat4::IDENTITY))
            .unwrap();
        assert_eq!(
            doc.attribute(e, "m"),
            Some("【[1.0, 0.0, 0.0, 0.0] , [0.0, 1.0, 0.0, 0.0] , [0.0, 0.0, 1.0, 0.0] , [0.0, 0.0, 0.0, 1.0] 】")
        );
        let m = doc.child_elements(e, "Matrix4x4").next().unwrap();
        let rows: Vec<_> = doc.child_elements(m, "row").collect();
        assert_eq!(rows.len(), 4);
        let second_row: Vec<_> = doc.children(rows[1]).iter().map(|c| doc.text(*c)).collect();
        assert_eq!(second_row, vec!["0.0", "1.0", "0.0", "0.0"]);
    }

    #[test]
    fn test_bounds_discrete() {
        let options = DumpOptions {
            include_value_string_as_property: false,
            include_value_as_discrete_elements: true,
            ..DumpOptions::default()
        };
        let renderer = ValueRenderer::new(&options);
        let (mut doc, root, mut refs) = setup();

        let bounds = Aabb::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let e = renderer
            .render_value(&mut doc, &mut refs, root, "property", "bounds", "Bounds", &bounds.into())
            .unwrap();
        let b = doc.child_elements(e, "Bounds").next().unwrap();
        let names: Vec<_> = doc
            .child_elements(b, "Vector3")
            .map(|v| doc.attribute(v, "name").unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["center", "extents", "max", "min", "size"]);
        assert_eq!(doc.attribute(e, "bounds"), None);
    }

    #[test]
    fn test_enum_label_and_index() {
        let options = DumpOptions::default();
        let renderer = ValueRenderer::new(&options);
        let (mut doc, root, mut refs) = setup();

        let e = renderer
            .render_value(&mut doc, &mut refs, root, "property", "mode", "enum", &Value::enumeration(1, ["Off", "On"]))
            .unwrap();
        assert_eq!(doc.text(e), "On");
        assert_eq!(doc.attribute(e, "sp-enum-index"), Some("1"));

        let bad = renderer
            .render_value(&mut doc, &mut refs, root, "property", "mode", "enum", &Value::enumeration(5, ["Off"]))
            .unwrap();
        assert!(doc.text(bad).starts_with("«error["));
        assert_eq!(doc.attribute(bad, "sp-enum-index"), Some("5"));
    }

    #[test]
    fn test_reference_registers_edge() {
        let options = DumpOptions::default();
        let renderer = ValueRenderer::new(&options);
        let (mut doc, root, mut refs) = setup();

        let node_ref = ObjectRef::node(ObjectId::new(0x10), "Target");
        let e = renderer
            .render_value(&mut doc, &mut refs, root, "property", "target", "GameObject", &node_ref.into())
            .unwrap();
        assert_eq!(doc.attribute(e, "target-name"), Some("Target"));
        assert_eq!(doc.attribute(e, "target-id"), Some("0x00000010"));
        assert_eq!(doc.text(e), "");

        let comp_ref = ObjectRef::component(ObjectId::new(0x11), "Lamp", "Game.Light");
        let c = renderer
            .render_value(&mut doc, &mut refs, root, "property", "light", "Game.Light", &comp_ref.into())
            .unwrap();
        assert_eq!(doc.text(c), "Lamp (Game.Light)");

        assert_eq!(refs.referrers(ObjectId::new(0x10)), &[e]);
        assert_eq!(refs.referrers(ObjectId::new(0x11)), &[c]);
    }

    #[test]
    fn test_property_side_attributes() {
        let options = DumpOptions {
            type_abbreviations: crate::options::Abbreviations::from_pairs([("UnityEngine.", "µ.")]),
            ..DumpOptions::default()
        };
        let renderer = ValueRenderer::new(&options);
        let (mut doc, root, mut refs) = setup();

        let entry = PropertyEntry::new("m_Light", "UnityEngine.Light", Value::Null)
            .with_display_name("Light")
            .with_declared_type("UnityEngine.ObjectReference");
        let e = renderer.render_property(&mut doc, &mut refs, root, &entry).unwrap();
        assert_eq!(doc.attribute(e, "type"), Some("µ.Light"));
        assert_eq!(doc.attribute(e, "sp-name"), Some("Light"));
        assert_eq!(doc.attribute(e, "sp-type"), Some("µ.ObjectReference"));
    }
}
