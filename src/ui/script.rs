//! Headless [`Ui`] that records what was drawn and replays queued input.
//!
//! Widgets are addressed by their full id: every scope pushed with
//! [`Ui::push_id`] followed by the widget's own id, joined with `/`. A frame
//! that edits `age` inside `Edit("Profile", ..)` draws the integer field
//! `Profile/age/age/##int`.

use std::collections::{HashMap, HashSet};

use crate::ui::{NumberStyle, Ui, truncate_to_capacity};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Toggle,
    SetInt(i64),
    SetFloat(f64),
    SetText(String),
    Click,
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum Drawn {
    Text(String),
    Disabled(String),
    SameLine,
    NewLine,
    Checkbox {
        id: String,
        value: bool,
    },
    Int {
        id: String,
        value: i64,
        style: NumberStyle<i64>,
        width: Option<f32>,
    },
    Float {
        id: String,
        value: f64,
        style: NumberStyle<f64>,
        width: Option<f32>,
    },
    TextInput {
        id: String,
        value: String,
    },
    Button {
        id: String,
        enabled: bool,
    },
    TableBegin {
        id: String,
        columns: usize,
    },
    TableRow,
    TableColumn(usize),
    TableEnd,
    GroupBegin,
    GroupEnd,
    TreeNode {
        id: String,
        open: bool,
    },
    TreePop,
}

impl Drawn {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Checkbox { id, .. }
            | Self::Int { id, .. }
            | Self::Float { id, .. }
            | Self::TextInput { id, .. }
            | Self::Button { id, .. }
            | Self::TableBegin { id, .. }
            | Self::TreeNode { id, .. } => Some(id.as_str()),
            _ => None,
        }
    }
}

pub struct ScriptUi {
    ids: Vec<String>,
    pending: HashMap<String, Action>,
    open_nodes: HashSet<String>,
    drawn: Vec<Drawn>,
    item_widths: Vec<f32>,
    width: f32,
    line_end: f32,
    same_line: bool,
}

impl Default for ScriptUi {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptUi {
    pub fn new() -> Self {
        Self {
            ids: Vec::new(),
            pending: HashMap::new(),
            open_nodes: HashSet::new(),
            drawn: Vec::new(),
            item_widths: Vec::new(),
            width: 80.0,
            line_end: 0.0,
            same_line: false,
        }
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = width;
        self
    }

    /// Applies `action` to the widget with full id `id` the next time it is
    /// drawn.
    pub fn queue(&mut self, id: impl Into<String>, action: Action) {
        self.pending.insert(id.into(), action);
    }

    /// Marks the tree node with full id `id` as expanded.
    pub fn open(&mut self, id: impl Into<String>) {
        self.open_nodes.insert(id.into());
    }

    /// Starts a new frame: forgets what was drawn, keeps queued actions.
    pub fn next_frame(&mut self) {
        self.drawn.clear();
        self.ids.clear();
        self.item_widths.clear();
        self.line_end = 0.0;
        self.same_line = false;
    }

    pub fn drawn(&self) -> &[Drawn] {
        &self.drawn
    }

    pub fn find(&self, id: &str) -> Option<&Drawn> {
        self.drawn.iter().find(|drawn| drawn.id() == Some(id))
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn full_id(&self, id: &str) -> String {
        let mut out = self.ids.join("/");
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(id);
        out
    }

    fn take(&mut self, full_id: &str) -> Option<Action> {
        self.pending.remove(full_id)
    }

    fn place(&mut self, width: f32) {
        let start = self.cursor_x();
        self.line_end = start + width;
        self.same_line = false;
    }

    fn field_width(&self) -> f32 {
        self.item_widths.last().copied().unwrap_or(self.width / 2.0)
    }
}

fn clamp_style<T: PartialOrd + Copy>(value: T, style: &NumberStyle<T>) -> T {
    match style {
        NumberStyle::Input => value,
        NumberStyle::Slider { min, max } | NumberStyle::Drag { min, max, .. } => {
            if value < *min {
                *min
            } else if value > *max {
                *max
            } else {
                value
            }
        }
    }
}

impl Ui for ScriptUi {
    fn push_id(&mut self, id: &str) {
        self.ids.push(id.to_string());
    }

    fn pop_id(&mut self) {
        self.ids.pop();
    }

    fn text(&mut self, text: &str) {
        self.place(self.text_width(text));
        self.drawn.push(Drawn::Text(text.to_string()));
    }

    fn text_disabled(&mut self, text: &str) {
        self.place(self.text_width(text));
        self.drawn.push(Drawn::Disabled(text.to_string()));
    }

    fn same_line(&mut self) {
        self.same_line = true;
        self.drawn.push(Drawn::SameLine);
    }

    fn new_line(&mut self) {
        self.same_line = false;
        self.line_end = 0.0;
        self.drawn.push(Drawn::NewLine);
    }

    fn checkbox(&mut self, id: &str, value: &mut bool) -> bool {
        let full_id = self.full_id(id);
        let changed = matches!(self.take(&full_id), Some(Action::Toggle));
        if changed {
            *value = !*value;
        }
        self.place(3.0);
        self.drawn.push(Drawn::Checkbox {
            id: full_id,
            value: *value,
        });
        changed
    }

    fn edit_int(&mut self, id: &str, value: &mut i64, style: NumberStyle<i64>) -> bool {
        let full_id = self.full_id(id);
        let mut changed = false;
        if let Some(Action::SetInt(next)) = self.take(&full_id) {
            let next = clamp_style(next, &style);
            changed = next != *value;
            *value = next;
        }
        let width = self.item_widths.last().copied();
        self.place(self.field_width());
        self.drawn.push(Drawn::Int {
            id: full_id,
            value: *value,
            style,
            width,
        });
        changed
    }

    fn edit_float(&mut self, id: &str, value: &mut f64, style: NumberStyle<f64>) -> bool {
        let full_id = self.full_id(id);
        let mut changed = false;
        if let Some(Action::SetFloat(next)) = self.take(&full_id) {
            let next = clamp_style(next, &style);
            changed = next != *value;
            *value = next;
        }
        let width = self.item_widths.last().copied();
        self.place(self.field_width());
        self.drawn.push(Drawn::Float {
            id: full_id,
            value: *value,
            style,
            width,
        });
        changed
    }

    fn input_text(&mut self, id: &str, value: &mut String, capacity: usize) -> bool {
        let full_id = self.full_id(id);
        let mut changed = false;
        if let Some(Action::SetText(mut next)) = self.take(&full_id) {
            truncate_to_capacity(&mut next, capacity);
            changed = next != *value;
            *value = next;
        }
        self.place(self.field_width());
        self.drawn.push(Drawn::TextInput {
            id: full_id,
            value: value.clone(),
        });
        changed
    }

    fn button(&mut self, label: &str) -> bool {
        self.small_button(label, true)
    }

    fn small_button(&mut self, label: &str, enabled: bool) -> bool {
        let full_id = self.full_id(label);
        let clicked = matches!(self.take(&full_id), Some(Action::Click)) && enabled;
        self.place(self.text_width(label) + 2.0 * self.frame_padding());
        self.drawn.push(Drawn::Button {
            id: full_id,
            enabled,
        });
        clicked
    }

    fn begin_table(&mut self, id: &str, columns: usize) -> bool {
        let full_id = self.full_id(id);
        self.drawn.push(Drawn::TableBegin {
            id: full_id,
            columns,
        });
        true
    }

    fn table_next_row(&mut self) {
        self.line_end = 0.0;
        self.same_line = false;
        self.drawn.push(Drawn::TableRow);
    }

    fn table_set_column(&mut self, column: usize) {
        self.drawn.push(Drawn::TableColumn(column));
    }

    fn end_table(&mut self) {
        self.drawn.push(Drawn::TableEnd);
    }

    fn begin_group(&mut self) {
        self.drawn.push(Drawn::GroupBegin);
    }

    fn end_group(&mut self) {
        self.drawn.push(Drawn::GroupEnd);
    }

    fn tree_node(&mut self, label: &str) -> bool {
        let full_id = self.full_id(label);
        let open = self.open_nodes.contains(&full_id);
        self.place(self.text_width(label) + 2.0);
        self.drawn.push(Drawn::TreeNode { id: full_id, open });
        if open {
            self.ids.push(label.to_string());
        }
        open
    }

    fn tree_pop(&mut self) {
        self.ids.pop();
        self.drawn.push(Drawn::TreePop);
    }

    fn push_item_width(&mut self, width: f32) {
        self.item_widths.push(width);
    }

    fn pop_item_width(&mut self) {
        self.item_widths.pop();
    }

    fn available_width(&self) -> f32 {
        (self.width - self.cursor_x()).max(0.0)
    }

    fn cursor_x(&self) -> f32 {
        if self.same_line {
            self.line_end + self.item_spacing()
        } else {
            0.0
        }
    }

    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32
    }

    fn item_spacing(&self) -> f32 {
        1.0
    }

    fn frame_padding(&self) -> f32 {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, Drawn, ScriptUi};
    use crate::ui::{NumberStyle, Ui, with_id};

    #[test]
    fn actions_apply_to_full_id_once() {
        let mut ui = ScriptUi::new();
        ui.queue("form/count", Action::SetInt(4));

        let mut value = 1;
        let changed = with_id(&mut ui, "form", |ui| {
            ui.edit_int("count", &mut value, NumberStyle::Input)
        });
        assert!(changed);
        assert_eq!(value, 4);
        assert_eq!(ui.pending(), 0);

        ui.next_frame();
        let changed = with_id(&mut ui, "form", |ui| {
            ui.edit_int("count", &mut value, NumberStyle::Input)
        });
        assert!(!changed);
    }

    #[test]
    fn sliders_clamp_scripted_values() {
        let mut ui = ScriptUi::new();
        ui.queue("v", Action::SetFloat(9.0));
        let mut value = 0.5;
        assert!(ui.edit_float("v", &mut value, NumberStyle::Slider { min: 0.0, max: 1.0 }));
        assert_eq!(value, 1.0);
    }

    #[test]
    fn disabled_buttons_swallow_clicks() {
        let mut ui = ScriptUi::new();
        ui.queue("x", Action::Click);
        assert!(!ui.small_button("x", false));
        assert_eq!(
            ui.drawn(),
            &[Drawn::Button {
                id: "x".to_string(),
                enabled: false
            }]
        );
    }

    #[test]
    fn cursor_tracks_same_line_items() {
        let mut ui = ScriptUi::new().with_width(20.0);
        ui.text("abcd");
        assert_eq!(ui.cursor_x(), 0.0);
        ui.same_line();
        assert_eq!(ui.cursor_x(), 5.0);
        assert_eq!(ui.available_width(), 15.0);
        ui.new_line();
        assert_eq!(ui.cursor_x(), 0.0);
    }
}
