use crate::core::callback::PathCallback;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::schema::{Schema, SchemaType};
use crate::ui::{Ui, with_id};

use super::{edit_array, edit_numeric_array, edit_object, edit_primitive};

/// Which editor handles a (value, schema) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    NumericArray,
    Object,
    Array,
    Primitive,
}

/// Picks the editor for `value`. A declared fixed numeric vector wins, then
/// the value's own shape or the declared container type.
pub fn route(value: &Value, schema: Option<&Schema>) -> Route {
    let schema = schema.unwrap_or(Schema::empty());
    if schema.numeric_vector().is_some() {
        Route::NumericArray
    } else if value.is_object() || schema.is_type(&SchemaType::Object) {
        Route::Object
    } else if value.is_list() || schema.is_type(&SchemaType::Array) {
        Route::Array
    } else {
        Route::Primitive
    }
}

/// Edits one node inside an id scope named `label`.
pub fn dispatch(
    ui: &mut dyn Ui,
    label: &str,
    value: &mut Value,
    schema: Option<&Schema>,
    callbacks: &[PathCallback],
    path: &ValuePath,
) -> bool {
    with_id(ui, label, |ui| match route(value, schema) {
        Route::NumericArray => edit_numeric_array(ui, value, schema, callbacks, path),
        Route::Object => edit_object(ui, value, schema, callbacks, path),
        Route::Array => edit_array(ui, value, schema, callbacks, path),
        Route::Primitive => edit_primitive(ui, value, schema, callbacks, path),
    })
}

#[cfg(test)]
mod tests {
    use super::{Route, dispatch, route};
    use crate::core::value::Value;
    use crate::core::value_path::ValuePath;
    use crate::schema::Schema;
    use crate::ui::script::{Drawn, ScriptUi};

    fn schema(json: &str) -> Schema {
        Schema::from_json_str(json).expect("schema json")
    }

    fn value(json: &str) -> Value {
        serde_json::from_str(json).expect("value json")
    }

    #[test]
    fn numeric_vector_wins_over_runtime_shape() {
        let s = schema(r#"{"type": "float", "size": 3}"#);
        assert_eq!(route(&value("{}"), Some(&s)), Route::NumericArray);
        assert_eq!(route(&value("7"), Some(&s)), Route::NumericArray);
    }

    #[test]
    fn zero_size_is_not_a_vector() {
        let s = schema(r#"{"type": "int", "size": 0}"#);
        assert_eq!(route(&value("7"), Some(&s)), Route::Primitive);
    }

    #[test]
    fn runtime_shape_routes_without_schema() {
        assert_eq!(route(&value(r#"{"a": 1}"#), None), Route::Object);
        assert_eq!(route(&value("[1, 2]"), None), Route::Array);
        assert_eq!(route(&value("\"x\""), None), Route::Primitive);
        assert_eq!(route(&Value::Null, None), Route::Primitive);
    }

    #[test]
    fn declared_container_type_routes_mismatched_values() {
        assert_eq!(route(&value("3"), Some(&schema(r#"{"type": "object"}"#))), Route::Object);
        assert_eq!(route(&value("3"), Some(&schema(r#"{"type": "array"}"#))), Route::Array);
        assert_eq!(
            route(&value("[]"), Some(&schema(r#"{"type": "object"}"#))),
            Route::Object
        );
    }

    #[test]
    fn scope_is_keyed_by_label() {
        let mut ui = ScriptUi::new();
        let mut data = value("true");
        dispatch(&mut ui, "flag", &mut data, None, &[], &ValuePath::empty());
        assert_eq!(
            ui.drawn(),
            &[Drawn::Checkbox {
                id: "flag/##bool".to_string(),
                value: true
            }]
        );
    }
}
