//! The immediate-mode widget capability the editors draw through.
//!
//! Every call happens during one frame: widgets are declared in order, and
//! an interactive call returns `true` only when the user changed the bound
//! value (or clicked) during that frame.

pub mod script;
pub mod span;
pub mod style;
pub mod term;
pub mod text_edit;

/// Interaction variant for a numeric field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberStyle<T> {
    /// Free numeric entry.
    Input,
    Slider { min: T, max: T },
    Drag { speed: f64, min: T, max: T },
}

pub trait Ui {
    /// Scopes the ids of the widgets that follow until the matching
    /// [`Ui::pop_id`].
    fn push_id(&mut self, id: &str);
    fn pop_id(&mut self);

    fn text(&mut self, text: &str);
    fn text_disabled(&mut self, text: &str);

    /// Places the next item on the current line.
    fn same_line(&mut self);
    fn new_line(&mut self);

    fn checkbox(&mut self, id: &str, value: &mut bool) -> bool;
    fn edit_int(&mut self, id: &str, value: &mut i64, style: NumberStyle<i64>) -> bool;
    fn edit_float(&mut self, id: &str, value: &mut f64, style: NumberStyle<f64>) -> bool;
    /// Text entry limited to `capacity` bytes.
    fn input_text(&mut self, id: &str, value: &mut String, capacity: usize) -> bool;

    fn button(&mut self, label: &str) -> bool;
    /// Compact button; a disabled one is drawn but never reports a click.
    fn small_button(&mut self, label: &str, enabled: bool) -> bool;

    fn begin_table(&mut self, id: &str, columns: usize) -> bool;
    fn table_next_row(&mut self);
    fn table_set_column(&mut self, column: usize);
    fn end_table(&mut self);

    fn begin_group(&mut self);
    fn end_group(&mut self);

    /// Collapsible section header; children are drawn only while it returns
    /// `true`, followed by [`Ui::tree_pop`].
    fn tree_node(&mut self, label: &str) -> bool;
    fn tree_pop(&mut self);

    fn push_item_width(&mut self, width: f32);
    fn pop_item_width(&mut self);

    /// Width left on the current line.
    fn available_width(&self) -> f32;
    fn cursor_x(&self) -> f32;
    fn text_width(&self, text: &str) -> f32;
    fn item_spacing(&self) -> f32;
    fn frame_padding(&self) -> f32;
}

/// Runs `f` inside an id scope.
pub fn with_id<R>(ui: &mut dyn Ui, id: &str, f: impl FnOnce(&mut dyn Ui) -> R) -> R {
    ui.push_id(id);
    let out = f(&mut *ui);
    ui.pop_id();
    out
}

/// Cuts `text` to at most `capacity` bytes without splitting a character.
pub fn truncate_to_capacity(text: &mut String, capacity: usize) {
    if text.len() <= capacity {
        return;
    }
    let mut end = capacity;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

#[cfg(test)]
mod tests {
    use super::truncate_to_capacity;

    #[test]
    fn truncation_respects_char_boundaries() {
        let mut text = "aé".to_string();
        truncate_to_capacity(&mut text, 2);
        assert_eq!(text, "a");

        let mut short = "abc".to_string();
        truncate_to_capacity(&mut short, 8);
        assert_eq!(short, "abc");
    }
}
