//! The descriptor that drives editing.
//!
//! A [`Schema`] is read once from a JSON-like document and then only queried.
//! Reading never fails: a field of the wrong shape is treated as absent, and
//! every lookup the editors need falls back to a permissive default here
//! rather than at the call site.

pub mod defaults;
pub mod document;

use std::sync::LazyLock;

use indexmap::IndexMap;

use crate::core::value::{Kind, Value};

pub use defaults::generate_default;
pub use document::LoadError;

pub const INT_MIN_DEFAULT: i64 = i64::MIN / 2;
pub const INT_MAX_DEFAULT: i64 = i64::MAX / 2;
pub const FLOAT_MIN_DEFAULT: f64 = -1e9 / 2.0;
pub const FLOAT_MAX_DEFAULT: f64 = 1e9 / 2.0;
pub const SPEED_DEFAULT: f64 = 1.0;
/// Byte capacity of the buffer strings are edited through.
pub const TEXT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaType {
    Object,
    Array,
    Int,
    Float,
    String,
    Boolean,
    Null,
    Other(String),
}

impl SchemaType {
    pub fn from_name(name: &str) -> Self {
        match name {
            "object" => Self::Object,
            "array" => Self::Array,
            "int" | "integer" => Self::Int,
            "float" | "number" => Self::Float,
            "string" => Self::String,
            "boolean" | "bool" => Self::Boolean,
            "null" => Self::Null,
            other => Self::Other(other.to_string()),
        }
    }

    /// Runtime kind a value of this type is stored as.
    pub fn kind(&self) -> Kind {
        match self {
            Self::Object => Kind::Object,
            Self::Array => Kind::List,
            Self::Int => Kind::Int,
            Self::Float => Kind::Float,
            Self::String => Kind::Text,
            Self::Boolean => Kind::Bool,
            Self::Null | Self::Other(_) => Kind::Null,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Int | Self::Float)
    }

    /// Type a primitive editor uses for a value with no declared type.
    pub fn infer(value: &Value) -> Self {
        match value {
            Value::Bool(_) => Self::Boolean,
            Value::Int(_) => Self::Int,
            Value::Float(_) => Self::Float,
            Value::Text(_) => Self::String,
            _ => Self::Null,
        }
    }
}

/// `ui:widget` hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Widget {
    Slider,
    Drag,
    Collapsible,
    Inline,
    Table,
    Chips,
    Other(String),
}

impl Widget {
    pub fn from_name(name: &str) -> Self {
        match name {
            "slider" => Self::Slider,
            "drag" => Self::Drag,
            "collapsible" => Self::Collapsible,
            "inline" => Self::Inline,
            "table" => Self::Table,
            "chips" => Self::Chips,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A numeric field that is either one number for every index or a list
/// aligned with indexes.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberSpec {
    Scalar(f64),
    PerIndex(Vec<Option<f64>>),
}

impl NumberSpec {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(_) | Value::Float(_) => value.as_f64().map(Self::Scalar),
            Value::List(items) => Some(Self::PerIndex(items.iter().map(Value::as_f64).collect())),
            _ => None,
        }
    }

    /// The single value, if this spec has one.
    pub fn scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::PerIndex(_) => None,
        }
    }

    /// Expands to `len` entries. Scalars broadcast; missing or non-numeric
    /// indexes take `fallback`.
    pub fn resolve(&self, len: usize, fallback: f64) -> Vec<f64> {
        match self {
            Self::Scalar(v) => vec![*v; len],
            Self::PerIndex(items) => (0..len)
                .map(|idx| items.get(idx).copied().flatten().unwrap_or(fallback))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    pub ty: Option<SchemaType>,
    pub properties: IndexMap<String, Schema>,
    pub items: Option<Box<Schema>>,
    pub default: Option<Value>,
    pub minimum: Option<NumberSpec>,
    pub maximum: Option<NumberSpec>,
    pub speed: Option<NumberSpec>,
    pub size: Option<usize>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub widget: Option<Widget>,
    pub label: Option<String>,
}

static EMPTY: LazyLock<Schema> = LazyLock::new(Schema::default);

impl Schema {
    /// Schema with no fields; every lookup answers with its fallback.
    pub fn empty() -> &'static Schema {
        &EMPTY
    }

    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let properties = map
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .filter(|(_, child)| child.is_object())
                    .map(|(key, child)| (key.clone(), Schema::from_value(child)))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            ty: map
                .get("type")
                .and_then(Value::as_text)
                .map(SchemaType::from_name),
            properties,
            items: map
                .get("items")
                .filter(|items| items.is_object())
                .map(|items| Box::new(Schema::from_value(items))),
            default: map.get("default").cloned(),
            minimum: map.get("minimum").and_then(NumberSpec::from_value),
            maximum: map.get("maximum").and_then(NumberSpec::from_value),
            speed: map.get("speed").and_then(NumberSpec::from_value),
            size: map.get("size").and_then(count),
            min_items: map.get("minItems").and_then(count),
            max_items: map.get("maxItems").and_then(count),
            widget: map
                .get("ui:widget")
                .and_then(Value::as_text)
                .map(Widget::from_name),
            label: map.get("label").and_then(Value::as_text).map(str::to_string),
        }
    }

    pub fn is_type(&self, ty: &SchemaType) -> bool {
        self.ty.as_ref() == Some(ty)
    }

    /// Element type and length when this describes a fixed numeric vector.
    pub fn numeric_vector(&self) -> Option<(SchemaType, usize)> {
        let ty = self.ty.as_ref().filter(|ty| ty.is_numeric())?;
        let size = self.size.filter(|size| *size > 0)?;
        Some((ty.clone(), size))
    }

    pub fn property(&self, key: &str) -> Option<&Schema> {
        self.properties.get(key)
    }

    pub fn items(&self) -> Option<&Schema> {
        self.items.as_deref()
    }

    pub fn widget(&self) -> Option<&Widget> {
        self.widget.as_ref()
    }

    pub fn label_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.label.as_deref().unwrap_or(fallback)
    }

    pub fn int_bounds(&self) -> (i64, i64) {
        let min = scalar_of(&self.minimum).map_or(INT_MIN_DEFAULT, |v| v as i64);
        let max = scalar_of(&self.maximum).map_or(INT_MAX_DEFAULT, |v| v as i64);
        (min, max)
    }

    pub fn float_bounds(&self) -> (f64, f64) {
        (
            scalar_of(&self.minimum).unwrap_or(FLOAT_MIN_DEFAULT),
            scalar_of(&self.maximum).unwrap_or(FLOAT_MAX_DEFAULT),
        )
    }

    pub fn speed(&self) -> f64 {
        scalar_of(&self.speed).unwrap_or(SPEED_DEFAULT)
    }

    pub fn min_items(&self) -> usize {
        self.min_items.unwrap_or(0)
    }

    pub fn max_items(&self) -> usize {
        self.max_items.unwrap_or(usize::MAX)
    }

    /// Per-index defaults of a numeric vector: a list aligns with indexes,
    /// a number broadcasts, anything missing is zero.
    pub fn vector_defaults(&self, len: usize) -> Vec<f64> {
        self.default
            .as_ref()
            .and_then(NumberSpec::from_value)
            .map_or_else(|| vec![0.0; len], |spec| spec.resolve(len, 0.0))
    }

    /// Per-index `(minimum, maximum)` of a numeric vector, falling back to
    /// the half range of `elem`.
    pub fn vector_bounds(&self, len: usize, elem: &SchemaType) -> (Vec<f64>, Vec<f64>) {
        let (min_fallback, max_fallback) = match elem {
            SchemaType::Int => (INT_MIN_DEFAULT as f64, INT_MAX_DEFAULT as f64),
            _ => (FLOAT_MIN_DEFAULT, FLOAT_MAX_DEFAULT),
        };
        (
            resolve_or(&self.minimum, len, min_fallback),
            resolve_or(&self.maximum, len, max_fallback),
        )
    }

    pub fn vector_speeds(&self, len: usize) -> Vec<f64> {
        resolve_or(&self.speed, len, SPEED_DEFAULT)
    }

    /// Zero value of the declared type, `Null` when untyped.
    pub fn zero_value(&self) -> Value {
        self.ty
            .as_ref()
            .map_or(Value::Null, |ty| Value::zero(ty.kind()))
    }
}

fn scalar_of(spec: &Option<NumberSpec>) -> Option<f64> {
    spec.as_ref().and_then(NumberSpec::scalar)
}

fn resolve_or(spec: &Option<NumberSpec>, len: usize, fallback: f64) -> Vec<f64> {
    spec.as_ref()
        .map_or_else(|| vec![fallback; len], |spec| spec.resolve(len, fallback))
}

fn count(value: &Value) -> Option<usize> {
    match value {
        Value::Int(v) => usize::try_from(*v).ok(),
        Value::Float(v) if *v >= 0.0 && v.fract() == 0.0 => Some(*v as usize),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{NumberSpec, Schema, SchemaType, Widget, INT_MAX_DEFAULT, INT_MIN_DEFAULT};
    use crate::core::value::Value;

    fn schema(json: &str) -> Schema {
        Schema::from_json_str(json).expect("schema json")
    }

    #[test]
    fn reads_recognised_fields() {
        let s = schema(
            r#"{
                "type": "object",
                "label": "Profile",
                "ui:widget": "collapsible",
                "properties": {
                    "age": {"type": "int", "minimum": 0, "maximum": 120, "default": 5},
                    "tags": {"type": "array", "items": {"type": "string"}, "minItems": 1, "maxItems": 3}
                }
            }"#,
        );
        assert_eq!(s.ty, Some(SchemaType::Object));
        assert_eq!(s.widget(), Some(&Widget::Collapsible));
        assert_eq!(s.label_or("Object"), "Profile");

        let age = s.property("age").expect("age");
        assert_eq!(age.int_bounds(), (0, 120));
        assert_eq!(age.default, Some(Value::Int(5)));

        let tags = s.property("tags").expect("tags");
        assert_eq!(tags.min_items(), 1);
        assert_eq!(tags.max_items(), 3);
        assert_eq!(tags.items().and_then(|i| i.ty.clone()), Some(SchemaType::String));
    }

    #[test]
    fn wrong_shapes_are_ignored() {
        let s = schema(r#"{"type": 3, "size": -2, "minItems": "x", "properties": {"a": 1}}"#);
        assert_eq!(s.ty, None);
        assert_eq!(s.size, None);
        assert_eq!(s.min_items(), 0);
        assert!(s.properties.is_empty());
        assert_eq!(s.int_bounds(), (INT_MIN_DEFAULT, INT_MAX_DEFAULT));
        assert_eq!(s.speed(), 1.0);
    }

    #[test]
    fn type_aliases_and_unknown_names() {
        assert_eq!(SchemaType::from_name("integer"), SchemaType::Int);
        assert_eq!(SchemaType::from_name("number"), SchemaType::Float);
        assert_eq!(
            SchemaType::from_name("color"),
            SchemaType::Other("color".to_string())
        );
    }

    #[test]
    fn numeric_vector_needs_type_and_positive_size() {
        assert_eq!(
            schema(r#"{"type": "float", "size": 3}"#).numeric_vector(),
            Some((SchemaType::Float, 3))
        );
        assert_eq!(schema(r#"{"type": "float", "size": 0}"#).numeric_vector(), None);
        assert_eq!(schema(r#"{"type": "string", "size": 3}"#).numeric_vector(), None);
        assert_eq!(schema(r#"{"size": 3}"#).numeric_vector(), None);
    }

    #[test]
    fn number_spec_broadcasts_and_falls_back() {
        assert_eq!(NumberSpec::Scalar(2.0).resolve(3, 0.0), vec![2.0, 2.0, 2.0]);
        let per_index = NumberSpec::PerIndex(vec![Some(1.0), None]);
        assert_eq!(per_index.resolve(4, 9.0), vec![1.0, 9.0, 9.0, 9.0]);
    }

    #[test]
    fn vector_fields_resolve_per_index() {
        let s = schema(
            r#"{"type": "int", "size": 3, "default": [1, "x"], "minimum": 0, "maximum": [5, 6], "speed": [0.5]}"#,
        );
        assert_eq!(s.vector_defaults(3), vec![1.0, 0.0, 0.0]);
        let (min, max) = s.vector_bounds(3, &SchemaType::Int);
        assert_eq!(min, vec![0.0; 3]);
        assert_eq!(max, vec![5.0, 6.0, INT_MAX_DEFAULT as f64]);
        assert_eq!(s.vector_speeds(3), vec![0.5, 1.0, 1.0]);
    }

    #[test]
    fn empty_schema_answers_fallbacks() {
        let s = Schema::empty();
        assert_eq!(s.ty, None);
        assert_eq!(s.max_items(), usize::MAX);
        assert_eq!(s.zero_value(), Value::Null);
    }
}
