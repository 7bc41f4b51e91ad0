use crate::core::callback::PathCallback;
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::schema::{Schema, SchemaType, TEXT_CAPACITY, Widget};
use crate::ui::{NumberStyle, Ui, truncate_to_capacity};

use super::{notify, snapshot};

/// Edits a scalar. The declared type wins over the value's own; a value of
/// the wrong shape is replaced by the zero of that type before drawing.
/// Null and unrecognised types are shown disabled and never change.
pub fn edit_primitive(
    ui: &mut dyn Ui,
    value: &mut Value,
    schema: Option<&Schema>,
    callbacks: &[PathCallback],
    path: &ValuePath,
) -> bool {
    let schema = schema.unwrap_or(Schema::empty());
    let ty = schema
        .ty
        .clone()
        .unwrap_or_else(|| SchemaType::infer(value));

    if matches!(
        ty,
        SchemaType::Boolean | SchemaType::Int | SchemaType::Float | SchemaType::String
    ) {
        value.coerce(ty.kind());
    }
    let before = snapshot(callbacks, value);

    let changed = match (&ty, &mut *value) {
        (SchemaType::Boolean, Value::Bool(flag)) => ui.checkbox("##bool", flag),
        (SchemaType::Int, Value::Int(number)) => edit_int(ui, number, schema),
        (SchemaType::Float, Value::Float(number)) => edit_float(ui, number, schema),
        (SchemaType::String, Value::Text(text)) => edit_text(ui, text),
        _ => {
            ui.text_disabled("null");
            false
        }
    };

    if changed {
        notify(callbacks, path, before.as_ref(), value);
    }
    changed
}

fn edit_int(ui: &mut dyn Ui, number: &mut i64, schema: &Schema) -> bool {
    let (min, max) = schema.int_bounds();
    let style = match schema.widget() {
        Some(Widget::Slider) => NumberStyle::Slider { min, max },
        Some(Widget::Drag) => NumberStyle::Drag {
            speed: schema.speed(),
            min,
            max,
        },
        _ => NumberStyle::Input,
    };
    ui.edit_int("##int", number, style)
}

fn edit_float(ui: &mut dyn Ui, number: &mut f64, schema: &Schema) -> bool {
    let (min, max) = schema.float_bounds();
    let style = match schema.widget() {
        Some(Widget::Slider) => NumberStyle::Slider { min, max },
        Some(Widget::Drag) => NumberStyle::Drag {
            speed: schema.speed(),
            min,
            max,
        },
        _ => NumberStyle::Input,
    };
    ui.edit_float("##float", number, style)
}

fn edit_text(ui: &mut dyn Ui, text: &mut String) -> bool {
    let mut buffer = text.clone();
    truncate_to_capacity(&mut buffer, TEXT_CAPACITY - 1);
    if !ui.input_text("##str", &mut buffer, TEXT_CAPACITY - 1) {
        return false;
    }
    *text = buffer;
    true
}
