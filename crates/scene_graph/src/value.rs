//! Tagged property values
//!
//! A host enumerates component properties reflectively; each one arrives here
//! as a [`Value`]. The dumper dispatches on the variant instead of on runtime
//! type checks.

use core::fmt;

use serde::{Deserialize, Serialize};

use scene_math::{format_double, Aabb, Color, Mat4, Rect, Vec2, Vec3, Vec4};

use crate::id::ObjectId;

/// Text written for a missing value
pub const NULL_TEXT: &str = "«null»";

/// A property value read from the source scene
///
/// Serialized externally tagged so scene description files read naturally:
/// `value = { vec3 = [1.0, 2.0, 3.0] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
    /// Unassigned value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// Single character
    Char(char),
    /// String value
    String(String),
    /// Bit mask (layer masks and similar), written as hex
    LayerMask(u32),
    /// Vector2 value
    Vec2(Vec2),
    /// Vector3 value
    Vec3(Vec3),
    /// Vector4 value
    Vec4(Vec4),
    /// Rectangle value
    Rect(Rect),
    /// 4x4 matrix value
    Mat4(Mat4),
    /// Color value (RGBA)
    Color(Color),
    /// Axis-aligned bounding volume
    Bounds(Aabb),
    /// Enum value with its display labels
    Enum { index: i32, labels: Vec<String> },
    /// Reference to another node or component
    Reference(ObjectRef),
    /// Array of values, possibly multi-dimensional
    Array(ArrayValue),
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Create an enum value
    pub fn enumeration<S: Into<String>>(index: i32, labels: impl IntoIterator<Item = S>) -> Self {
        Value::Enum {
            index,
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Create a one-dimensional array value
    pub fn array(element_type: impl Into<String>, items: Vec<Value>) -> Self {
        Value::Array(ArrayValue::one_dimensional(element_type, items))
    }

    /// Check for [`Value::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Get as bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::LayerMask(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Get as float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Get as string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Get as reference
    pub fn as_reference(&self) -> Option<&ObjectRef> {
        match self {
            Value::Reference(r) => Some(r),
            _ => None,
        }
    }

    /// Get as array
    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Label of the active enum entry, `None` for non-enums or an index out of range
    pub fn enum_label(&self) -> Option<&str> {
        match self {
            Value::Enum { index, labels } if *index >= 0 => {
                labels.get(*index as usize).map(String::as_str)
            }
            _ => None,
        }
    }

    /// Fallback type name for values that arrive without one (array items)
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => NULL_TEXT.to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Char(_) => "char".to_string(),
            Value::String(_) => "string".to_string(),
            Value::LayerMask(_) => "LayerMask".to_string(),
            Value::Vec2(_) => "Vector2".to_string(),
            Value::Vec3(_) => "Vector3".to_string(),
            Value::Vec4(_) => "Vector4".to_string(),
            Value::Rect(_) => "Rect".to_string(),
            Value::Mat4(_) => "Matrix4x4".to_string(),
            Value::Color(_) => "Color".to_string(),
            Value::Bounds(_) => "Bounds".to_string(),
            Value::Enum { .. } => "enum".to_string(),
            Value::Reference(r) => r
                .type_name
                .clone()
                .unwrap_or_else(|| r.kind.as_str().to_string()),
            Value::Array(a) => a.type_name(),
        }
    }
}

/// The textual form of a value.
///
/// This is what lands in element text and what array compression compares.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str(NULL_TEXT),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Float(v) => f.write_str(&format_double(*v)),
            Value::Char(v) => write!(f, "{}", v),
            Value::String(v) => f.write_str(v),
            Value::LayerMask(v) => write!(f, "{:08X}", v),
            Value::Vec2(v) => write!(f, "{}", v),
            Value::Vec3(v) => write!(f, "{}", v),
            Value::Vec4(v) => write!(f, "{}", v),
            Value::Rect(v) => write!(f, "{}", v),
            Value::Mat4(v) => write!(f, "{}", v),
            Value::Color(v) => write!(f, "{}", v),
            Value::Bounds(v) => write!(f, "{}", v),
            Value::Enum { index, labels } => match self.enum_label() {
                Some(label) => f.write_str(label),
                None if *index < 0 => write!(f, "«error[enum index {} is negative]»", index),
                None => write!(
                    f,
                    "«error[enum index {} out of range for {} labels]»",
                    index,
                    labels.len()
                ),
            },
            Value::Reference(r) => write!(f, "{}", r),
            Value::Array(a) => write!(f, "{}", a),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(v as f64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec2> for Value {
    fn from(v: Vec2) -> Self {
        Value::Vec2(v)
    }
}

impl From<Vec3> for Value {
    fn from(v: Vec3) -> Self {
        Value::Vec3(v)
    }
}

impl From<Vec4> for Value {
    fn from(v: Vec4) -> Self {
        Value::Vec4(v)
    }
}

impl From<Color> for Value {
    fn from(v: Color) -> Self {
        Value::Color(v)
    }
}

impl From<Mat4> for Value {
    fn from(v: Mat4) -> Self {
        Value::Mat4(v)
    }
}

impl From<Aabb> for Value {
    fn from(v: Aabb) -> Self {
        Value::Bounds(v)
    }
}

impl From<ObjectRef> for Value {
    fn from(v: ObjectRef) -> Self {
        Value::Reference(v)
    }
}

/// What a reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    /// A scene node
    Node,
    /// A component attached to a node
    Component,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::Node => "GameObject",
            RefKind::Component => "Component",
        }
    }
}

impl Default for RefKind {
    fn default() -> Self {
        RefKind::Node
    }
}

/// Reference from a property to another object in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRef {
    /// Identity of the target
    pub id: ObjectId,
    /// Display name of the target (for components, the owning node's name)
    pub name: String,
    #[serde(default)]
    pub kind: RefKind,
    /// Runtime type of a component target
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
}

impl ObjectRef {
    /// Reference to a node
    pub fn node(id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: RefKind::Node,
            type_name: None,
        }
    }

    /// Reference to a component
    pub fn component(
        id: ObjectId,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind: RefKind::Component,
            type_name: Some(type_name.into()),
        }
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.kind, &self.type_name) {
            (RefKind::Component, Some(t)) => write!(f, "{} ({})", self.name, t),
            _ => f.write_str(&self.name),
        }
    }
}

/// Array property value
///
/// Items are stored row-major; `dims` holds the length of each dimension.
/// One-dimensional arrays may hold nested [`Value::Array`] items (jagged
/// arrays).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayValue {
    /// Type name of the items
    pub element_type: String,
    /// Length of each dimension
    pub dims: Vec<usize>,
    /// Items in row-major order
    #[serde(default)]
    pub items: Vec<Value>,
}

impl ArrayValue {
    /// Create a one-dimensional array
    pub fn one_dimensional(element_type: impl Into<String>, items: Vec<Value>) -> Self {
        Self {
            element_type: element_type.into(),
            dims: vec![items.len()],
            items,
        }
    }

    /// Create a two-dimensional array from row-major items.
    ///
    /// Returns `None` if `items` does not hold exactly `rows * cols` values.
    pub fn two_dimensional(
        element_type: impl Into<String>,
        rows: usize,
        cols: usize,
        items: Vec<Value>,
    ) -> Option<Self> {
        if rows * cols != items.len() {
            return None;
        }
        Some(Self {
            element_type: element_type.into(),
            dims: vec![rows, cols],
            items,
        })
    }

    /// Number of dimensions
    #[inline]
    pub fn rank(&self) -> usize {
        self.dims.len().max(1)
    }

    /// Length of the first dimension; one-dimensional arrays count their items
    #[inline]
    pub fn len(&self) -> usize {
        match self.dims.as_slice() {
            [] | [_] => self.items.len(),
            [rows, ..] => *rows,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item of a one-dimensional array
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Item of a two-dimensional array
    pub fn get2(&self, row: usize, col: usize) -> Option<&Value> {
        let cols = self.dims.get(1).copied()?;
        self.items.get(row * cols + col)
    }

    /// Check that `dims` describes `items`, nested arrays included
    pub fn check_shape(&self) -> std::result::Result<(), String> {
        let expected: usize = self.dims.iter().product();
        if !self.dims.is_empty() && expected != self.items.len() {
            return Err(format!(
                "array dims {:?} describe {} item(s) but {} are present",
                self.dims,
                expected,
                self.items.len()
            ));
        }
        for item in &self.items {
            if let Value::Array(nested) = item {
                nested.check_shape()?;
            }
        }
        Ok(())
    }

    /// Array type name, `int[]` / `int[,]` style
    pub fn type_name(&self) -> String {
        format!("{}[{}]", self.element_type, ",".repeat(self.rank() - 1))
    }
}

impl fmt::Display for ArrayValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", item)?;
        }
        f.write_str("]")
    }
}
