use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::value_path::{PathSegment, ValuePath};

/// A node of the edited document.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Object(IndexMap<String, Value>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    List,
    Object,
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Null => Kind::Null,
            Self::Bool(_) => Kind::Bool,
            Self::Int(_) => Kind::Int,
            Self::Float(_) => Kind::Float,
            Self::Text(_) => Kind::Text,
            Self::List(_) => Kind::List,
            Self::Object(_) => Kind::Object,
        }
    }

    /// The empty value of `kind`: false, 0, 0.0, "", [], {} or null.
    pub fn zero(kind: Kind) -> Self {
        match kind {
            Kind::Null => Self::Null,
            Kind::Bool => Self::Bool(false),
            Kind::Int => Self::Int(0),
            Kind::Float => Self::Float(0.0),
            Kind::Text => Self::Text(String::new()),
            Kind::List => Self::List(Vec::new()),
            Kind::Object => Self::Object(IndexMap::new()),
        }
    }

    /// Converts into `kind`. Any mismatch, int against float included,
    /// yields `Value::zero(kind)`.
    pub fn coerce_to(self, kind: Kind) -> Self {
        if self.kind() == kind {
            return self;
        }
        Self::zero(kind)
    }

    /// In-place [`Value::coerce_to`]; returns whether the value was replaced.
    pub fn coerce(&mut self, kind: Kind) -> bool {
        if self.kind() == kind {
            return false;
        }
        let from = self.kind();
        *self = std::mem::take(self).coerce_to(kind);
        tracing::trace!(?from, to = ?kind, "coerced value");
        true
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Self::Int(_) | Self::Float(_))
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_object_mut(&mut self) -> Option<&mut IndexMap<String, Value>> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Short text for showing a value as a tag.
    pub fn display_label(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Text(v) => v.clone(),
            Self::List(_) | Self::Object(_) => "<item>".to_string(),
        }
    }

    pub fn get_path(&self, path: &ValuePath) -> Option<&Value> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), Self::Object(map)) => map.get(key.as_str())?,
                (PathSegment::Index(index), Self::List(list)) => list.get(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn get_path_mut(&mut self, path: &ValuePath) -> Option<&mut Value> {
        let mut current = self;
        for segment in path.segments() {
            current = match (segment, current) {
                (PathSegment::Key(key), Self::Object(map)) => map.get_mut(key.as_str())?,
                (PathSegment::Index(index), Self::List(list)) => list.get_mut(*index)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Writes `value` at `path`, creating missing containers on the way.
    pub fn set_path(&mut self, path: &ValuePath, value: Value) {
        *crate::core::value_path::ensure_value_path_mut(self, path) = value;
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(v) => Self::Bool(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => Self::Int(v),
                None => Self::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(v) => Self::Text(v),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(v) => serde_json::Value::Bool(*v),
            Value::Int(v) => serde_json::Value::from(*v),
            Value::Float(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(v) => serde_json::Value::String(v.clone()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, value)| (key.clone(), serde_json::Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde_json::Value::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::{Kind, Value};

    #[test]
    fn coerce_keeps_matching_kind() {
        let value = Value::Text("hi".to_string());
        assert_eq!(value.coerce_to(Kind::Text), Value::Text("hi".to_string()));
    }

    #[test]
    fn coerce_resets_numbers_of_the_other_kind() {
        assert_eq!(Value::Int(5).coerce_to(Kind::Float), Value::Float(0.0));
        assert_eq!(Value::Float(2.75).coerce_to(Kind::Int), Value::Int(0));
    }

    #[test]
    fn coerce_replaces_mismatch_with_zero() {
        assert_eq!(Value::Text("x".into()).coerce_to(Kind::List), Value::List(Vec::new()));
        assert_eq!(Value::List(Vec::new()).coerce_to(Kind::Bool), Value::Bool(false));
        assert_eq!(Value::Float(f64::NAN).coerce_to(Kind::Int), Value::Int(0));

        let mut value = Value::Bool(true);
        assert!(value.coerce(Kind::Text));
        assert_eq!(value, Value::Text(String::new()));
        assert!(!value.coerce(Kind::Text));
    }

    #[test]
    fn json_conversion_preserves_key_order() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"zeta": 1, "alpha": [true, 1.5, "s"], "mid": null}"#)
                .expect("json");
        let value = Value::from(json.clone());
        let keys = value
            .as_object()
            .expect("object")
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(serde_json::Value::from(&value), json);
    }

    #[test]
    fn serde_goes_through_json_model() {
        let value: Value = serde_json::from_str(r#"{"a": [1, 2.5]}"#).expect("value");
        let text = serde_json::to_string(&value).expect("serialize");
        assert_eq!(text, r#"{"a":[1,2.5]}"#);
    }
}
