use indexmap::IndexMap;

use crate::core::value::Value;
use crate::schema::{Schema, SchemaType};

/// Builds the initial document a schema describes.
///
/// Objects get exactly their `properties` keys, each from the property's
/// `default` or the zero of its type; arrays start from their `default`
/// list; fixed numeric vectors get exactly `size` elements. A schema without
/// a `type` contributes nothing.
pub fn generate_default(schema: &Schema) -> Value {
    fill(Value::Null, schema)
}

fn fill(existing: Value, schema: &Schema) -> Value {
    let Some(ty) = schema.ty.as_ref() else {
        return existing;
    };

    if let Some((elem, size)) = schema.numeric_vector() {
        return fill_vector(existing, schema, &elem, size);
    }

    match ty {
        SchemaType::Object if !schema.properties.is_empty() => fill_object(existing, schema),
        SchemaType::Array if schema.items.is_some() => fill_array(existing, schema),
        _ => {
            if !existing.is_null() {
                existing
            } else if let Some(default) = &schema.default {
                default.clone()
            } else {
                schema.zero_value()
            }
        }
    }
}

fn fill_object(existing: Value, schema: &Schema) -> Value {
    let mut current = match existing {
        Value::Object(map) => map,
        _ => IndexMap::new(),
    };

    let mut out = IndexMap::with_capacity(schema.properties.len());
    for (key, prop) in &schema.properties {
        let start = current
            .shift_remove(key.as_str())
            .or_else(|| prop.seed_default())
            .unwrap_or_else(|| prop.zero_value());
        out.insert(key.clone(), fill(start, prop));
    }
    out.extend(current);
    Value::Object(out)
}

impl Schema {
    /// The `default` a property starts from; objects built from their
    /// `properties` take none, at any depth.
    fn seed_default(&self) -> Option<Value> {
        match self.ty {
            Some(SchemaType::Object) if !self.properties.is_empty() => None,
            _ => self.default.clone(),
        }
    }
}

fn fill_array(existing: Value, schema: &Schema) -> Value {
    let items = match existing {
        Value::List(items) => items,
        _ => match &schema.default {
            Some(Value::List(items)) => items.clone(),
            _ => Vec::new(),
        },
    };
    let Some(item_schema) = schema.items() else {
        return Value::List(items);
    };
    Value::List(
        items
            .into_iter()
            .map(|item| fill(item, item_schema))
            .collect(),
    )
}

fn fill_vector(existing: Value, schema: &Schema, elem: &SchemaType, size: usize) -> Value {
    let defaults = schema.vector_defaults(size);
    let current = existing.as_list().unwrap_or_default();

    Value::List(
        defaults
            .into_iter()
            .enumerate()
            .map(|(idx, fallback)| {
                let raw = current
                    .get(idx)
                    .and_then(Value::as_f64)
                    .unwrap_or(fallback);
                numeric(elem, raw)
            })
            .collect(),
    )
}

pub(crate) fn numeric(elem: &SchemaType, raw: f64) -> Value {
    match elem {
        SchemaType::Int => Value::Int(raw as i64),
        _ => Value::Float(raw),
    }
}
