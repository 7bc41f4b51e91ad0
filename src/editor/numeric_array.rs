use crate::core::callback::PathCallback;
use crate::core::value::{Kind, Value};
use crate::core::value_path::ValuePath;
use crate::schema::defaults::numeric;
use crate::schema::{Schema, SchemaType, Widget};
use crate::ui::{NumberStyle, Ui};

use super::{notify, snapshot};

/// Edits a fixed-length vector of ints or floats on a single row.
///
/// Needs a schema with a numeric `type` and a positive `size`; without one
/// nothing is drawn and `false` is returned. The list is padded to `size`
/// from the per-index defaults but never shortened, and entries past `size`
/// are left untouched.
pub fn edit_numeric_array(
    ui: &mut dyn Ui,
    value: &mut Value,
    schema: Option<&Schema>,
    callbacks: &[PathCallback],
    path: &ValuePath,
) -> bool {
    let Some(schema) = schema else {
        return false;
    };
    let Some((elem, size)) = schema.numeric_vector() else {
        return false;
    };

    let defaults = schema.vector_defaults(size);
    let (minimum, maximum) = schema.vector_bounds(size, &elem);
    let speeds = schema.vector_speeds(size);

    value.coerce(Kind::List);
    if let Some(items) = value.as_list_mut() {
        repair(items, &elem, &defaults);
    }
    let before = snapshot(callbacks, value);

    let Some(items) = value.as_list_mut() else {
        return false;
    };
    let total = ui.available_width();
    let spacing = ui.item_spacing();
    let field_width = (total - spacing * (size - 1) as f32) / size as f32;

    let mut changed = false;
    for (idx, item) in items.iter_mut().take(size).enumerate() {
        let old = snapshot(callbacks, item);
        let id = format!("##{idx}");

        ui.push_item_width(field_width);
        let item_changed = match item {
            Value::Int(number) => {
                let style = number_style(
                    schema.widget(),
                    speeds[idx],
                    minimum[idx] as i64,
                    maximum[idx] as i64,
                );
                ui.edit_int(&id, number, style)
            }
            Value::Float(number) => {
                let style = number_style(schema.widget(), speeds[idx], minimum[idx], maximum[idx]);
                ui.edit_float(&id, number, style)
            }
            _ => false,
        };
        ui.pop_item_width();
        if idx + 1 < size {
            ui.same_line();
        }

        if item_changed {
            notify(callbacks, &path.child_index(idx), old.as_ref(), item);
            changed = true;
        }
    }

    if changed {
        notify(callbacks, path, before.as_ref(), value);
    }
    changed
}

/// Pads `items` to the vector length and converts the first `defaults.len()`
/// entries to the element type. Numbers convert, anything else takes the
/// index default.
fn repair(items: &mut Vec<Value>, elem: &SchemaType, defaults: &[f64]) {
    for (idx, fallback) in defaults.iter().enumerate() {
        match items.get_mut(idx) {
            Some(item) => {
                let raw = item.as_f64().unwrap_or(*fallback);
                if item.kind() != elem.kind() {
                    *item = numeric(elem, raw);
                }
            }
            None => items.push(numeric(elem, *fallback)),
        }
    }
}

fn number_style<T>(widget: Option<&Widget>, speed: f64, min: T, max: T) -> NumberStyle<T> {
    match widget {
        Some(Widget::Slider) => NumberStyle::Slider { min, max },
        Some(Widget::Drag) => NumberStyle::Drag { speed, min, max },
        _ => NumberStyle::Input,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::edit_numeric_array;
    use crate::core::callback::{Handler, PathCallback};
    use crate::core::value::Value;
    use crate::core::value_path::ValuePath;
    use crate::schema::Schema;
    use crate::ui::NumberStyle;
    use crate::ui::script::{Action, Drawn, ScriptUi};

    fn schema(json: &str) -> Schema {
        Schema::from_json_str(json).expect("schema json")
    }

    fn value(json: &str) -> Value {
        serde_json::from_str(json).expect("value json")
    }

    #[test]
    fn without_shape_nothing_happens() {
        let mut ui = ScriptUi::new();
        let mut data = value("[1, 2]");
        assert!(!edit_numeric_array(&mut ui, &mut data, None, &[], &ValuePath::empty()));
        let untyped = schema(r#"{"size": 2}"#);
        assert!(!edit_numeric_array(&mut ui, &mut data, Some(&untyped), &[], &ValuePath::empty()));
        assert_eq!(data, value("[1, 2]"));
        assert!(ui.drawn().is_empty());
    }

    #[test]
    fn pads_from_per_index_defaults() {
        let mut ui = ScriptUi::new();
        let s = schema(r#"{"type": "float", "size": 3, "default": [0.5, 0.25]}"#);
        let mut data = value("[1]");
        edit_numeric_array(&mut ui, &mut data, Some(&s), &[], &ValuePath::empty());
        assert_eq!(data, value("[1.0, 0.25, 0.0]"));
    }

    #[test]
    fn non_list_becomes_vector() {
        let mut ui = ScriptUi::new();
        let s = schema(r#"{"type": "int", "size": 2, "default": 7}"#);
        let mut data = value(r#""text""#);
        edit_numeric_array(&mut ui, &mut data, Some(&s), &[], &ValuePath::empty());
        assert_eq!(data, value("[7, 7]"));
    }

    #[test]
    fn longer_lists_keep_their_tail() {
        let mut ui = ScriptUi::new();
        let s = schema(r#"{"type": "int", "size": 2}"#);
        let mut data = value("[1, 2, 3, 4]");
        edit_numeric_array(&mut ui, &mut data, Some(&s), &[], &ValuePath::empty());
        assert_eq!(data, value("[1, 2, 3, 4]"));
        assert!(ui.find("##1").is_some());
        assert!(ui.find("##2").is_none());
    }

    #[test]
    fn fields_share_the_row_evenly() {
        let mut ui = ScriptUi::new().with_width(80.0);
        let s = schema(
            r#"{"type": "int", "size": 3, "ui:widget": "slider", "minimum": [0, 10], "maximum": 50}"#,
        );
        let mut data = value("[1, 20, 3]");
        edit_numeric_array(&mut ui, &mut data, Some(&s), &[], &ValuePath::empty());

        let same_lines = ui
            .drawn()
            .iter()
            .filter(|drawn| **drawn == Drawn::SameLine)
            .count();
        assert_eq!(same_lines, 2);
        assert_eq!(
            ui.find("##1"),
            Some(&Drawn::Int {
                id: "##1".to_string(),
                value: 20,
                style: NumberStyle::Slider { min: 10, max: 50 },
                width: Some(26.0),
            })
        );
        assert!(matches!(
            ui.find("##2"),
            Some(Drawn::Int {
                style: NumberStyle::Slider { max: 50, .. },
                ..
            })
        ));
    }

    #[test]
    fn element_then_whole_vector_is_reported() {
        let mut ui = ScriptUi::new();
        ui.queue("##1", Action::SetFloat(2.5));
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let callbacks = vec![PathCallback::any(Handler::change(move |path, old, new| {
            sink.borrow_mut()
                .push((path.to_string(), old.clone(), new.clone()));
        }))];

        let s = schema(r#"{"type": "float", "size": 2}"#);
        let mut data = value("[0.0, 1.0]");
        let path = ValuePath::parse("pos").expect("path");
        assert!(edit_numeric_array(&mut ui, &mut data, Some(&s), &callbacks, &path));
        assert_eq!(
            log.borrow().as_slice(),
            &[
                ("pos[1]".to_string(), Value::Float(1.0), Value::Float(2.5)),
                ("pos".to_string(), value("[0.0, 1.0]"), value("[0.0, 2.5]")),
            ]
        );
    }
}
