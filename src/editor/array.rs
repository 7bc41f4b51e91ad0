use crate::core::callback::PathCallback;
use crate::core::value::{Kind, Value};
use crate::core::value_path::ValuePath;
use crate::schema::{Schema, Widget, generate_default};
use crate::ui::{Ui, with_id};

use super::{dispatch, notify, snapshot};

const ADD_LABEL: &str = "+ add";
const REMOVE_LABEL: &str = "x";

/// Edits a variable-length list with add and remove controls.
///
/// The remove control of every item stops working once the list is at
/// `minItems`, and the add control is only drawn below `maxItems`. A removal
/// is applied after all items are drawn, so indexes stay stable within the
/// frame. Additions and removals are reported at the affected item's path,
/// and any change is reported at the list's own path, root included.
pub fn edit_array(
    ui: &mut dyn Ui,
    value: &mut Value,
    schema: Option<&Schema>,
    callbacks: &[PathCallback],
    path: &ValuePath,
) -> bool {
    let schema = schema.unwrap_or(Schema::empty());
    value.coerce(Kind::List);
    let before = snapshot(callbacks, value);
    let Some(items) = value.as_list_mut() else {
        return false;
    };

    let edit = ArrayEdit {
        items_schema: schema.items(),
        min_items: schema.min_items(),
        max_items: schema.max_items(),
        callbacks,
        path,
    };
    let frame = match schema.widget() {
        Some(Widget::Table) => edit.table(ui, items),
        Some(Widget::Chips) => edit.chips(ui, items),
        _ => edit.list(ui, items),
    };
    let changed = edit.apply(items, frame);

    if changed {
        notify(callbacks, path, before.as_ref(), value);
    }
    changed
}

/// What the user did to the list during one frame.
#[derive(Debug, Default)]
struct Frame {
    edited: bool,
    remove: Option<usize>,
    add: bool,
}

impl Frame {
    fn record(&mut self, idx: usize, (edited, removed): (bool, bool)) {
        self.edited |= edited;
        if removed && self.remove.is_none() {
            self.remove = Some(idx);
        }
    }
}

struct ArrayEdit<'a> {
    items_schema: Option<&'a Schema>,
    min_items: usize,
    max_items: usize,
    callbacks: &'a [PathCallback],
    path: &'a ValuePath,
}

impl ArrayEdit<'_> {
    fn can_remove(&self, len: usize) -> bool {
        len > self.min_items
    }

    fn can_add(&self, len: usize) -> bool {
        len < self.max_items
    }

    /// Draws one item followed by its remove control on the same line.
    fn item(&self, ui: &mut dyn Ui, idx: usize, item: &mut Value, can_remove: bool) -> (bool, bool) {
        let child_path = self.path.child_index(idx);
        with_id(ui, &idx.to_string(), |ui| {
            let edited = dispatch(ui, "[]", item, self.items_schema, self.callbacks, &child_path);
            ui.same_line();
            let removed = ui.small_button(REMOVE_LABEL, can_remove);
            (edited, removed)
        })
    }

    fn list(&self, ui: &mut dyn Ui, items: &mut [Value]) -> Frame {
        let can_remove = self.can_remove(items.len());
        let mut frame = Frame::default();
        for (idx, item) in items.iter_mut().enumerate() {
            frame.record(idx, self.item(ui, idx, item, can_remove));
        }
        if self.can_add(items.len()) {
            frame.add = ui.button(ADD_LABEL);
        }
        frame
    }

    fn table(&self, ui: &mut dyn Ui, items: &mut [Value]) -> Frame {
        let mut frame = Frame::default();
        if !ui.begin_table("table", 2) {
            return frame;
        }
        let can_remove = self.can_remove(items.len());
        for (idx, item) in items.iter_mut().enumerate() {
            ui.table_next_row();
            ui.table_set_column(0);
            ui.text(&format!("[{idx}]"));
            ui.table_set_column(1);
            frame.record(idx, self.item(ui, idx, item, can_remove));
        }
        if self.can_add(items.len()) {
            ui.table_next_row();
            ui.table_set_column(0);
            frame.add = ui.button(ADD_LABEL);
        }
        ui.end_table();
        frame
    }

    /// Tags flowing left to right, wrapping before a tag that would not fit.
    fn chips(&self, ui: &mut dyn Ui, items: &mut [Value]) -> Frame {
        let mut frame = Frame::default();
        let can_remove = self.can_remove(items.len());

        ui.begin_group();
        let max_width = ui.available_width() + ui.cursor_x();
        for (idx, item) in items.iter().enumerate() {
            let label = item.display_label();
            if ui.cursor_x() >= max_width - chip_width(ui, &label) {
                ui.new_line();
            }
            let removed = with_id(ui, &idx.to_string(), |ui| {
                ui.button(&label);
                ui.same_line();
                let removed = ui.small_button(REMOVE_LABEL, can_remove);
                ui.same_line();
                removed
            });
            frame.record(idx, (false, removed));
        }
        ui.new_line();
        if self.can_add(items.len()) {
            frame.add = ui.button(ADD_LABEL);
        }
        ui.end_group();
        frame
    }

    fn apply(&self, items: &mut Vec<Value>, frame: Frame) -> bool {
        let mut changed = frame.edited;

        if let Some(idx) = frame.remove
            && idx < items.len()
            && self.can_remove(items.len())
        {
            let old = items.remove(idx);
            tracing::debug!(path = %self.path, index = idx, "removed array item");
            notify(self.callbacks, &self.path.child_index(idx), Some(&old), &Value::Null);
            changed = true;
        }

        if frame.add && self.can_add(items.len()) {
            let item = self.seed(items);
            let idx = items.len();
            tracing::debug!(path = %self.path, index = idx, "added array item");
            notify(self.callbacks, &self.path.child_index(idx), Some(&Value::Null), &item);
            items.push(item);
            changed = true;
        }

        changed
    }

    /// Value a new item starts from: the item schema's default document when
    /// it declares a type, its bare `default` otherwise, and failing both the
    /// zero of the last item's kind.
    fn seed(&self, items: &[Value]) -> Value {
        if let Some(schema) = self.items_schema {
            if schema.ty.is_some() {
                return generate_default(schema);
            }
            if let Some(default) = &schema.default {
                return default.clone();
            }
        }
        items
            .last()
            .map_or_else(|| Value::from(""), |last| Value::zero(last.kind()))
    }
}

fn chip_width(ui: &dyn Ui, label: &str) -> f32 {
    ui.text_width(label) + ui.text_width(REMOVE_LABEL) + ui.frame_padding() * 4.0 + ui.item_spacing()
}
