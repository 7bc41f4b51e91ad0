//! Immediate-mode [`Ui`] rendered as terminal lines.
//!
//! Each frame starts with [`TermUi::begin_frame`], which takes at most one
//! key press. Focusable widgets are numbered in draw order; Tab/Down and
//! BackTab/Up move focus between frames, every other key goes to the focused
//! widget during the frame. Tree-node state survives frames, keyed by id.

use std::collections::HashSet;

use unicode_width::UnicodeWidthStr;

use crate::terminal::{KeyCode, KeyEvent, KeyModifiers};
use crate::ui::span::{Span, SpanLine, line_width};
use crate::ui::style::{Color, Style};
use crate::ui::text_edit;
use crate::ui::{NumberStyle, Ui};

const INDENT: usize = 2;
const TRACK_LEN: usize = 12;
const FLOAT_INPUT_STEP: f64 = 0.1;

#[derive(Debug, Clone, Copy)]
struct TableLayout {
    origin: usize,
    column_width: usize,
}

pub struct TermUi {
    width: usize,
    focus: usize,
    focusable: usize,
    open_nodes: HashSet<String>,
    text_cursor: Option<(usize, usize)>,

    key: Option<KeyEvent>,
    ids: Vec<String>,
    lines: Vec<SpanLine>,
    current: SpanLine,
    same_line: bool,
    indent: usize,
    group_indents: Vec<usize>,
    next_focus: usize,
    focused_line: Option<usize>,
    item_widths: Vec<usize>,
    table: Option<TableLayout>,
}

impl TermUi {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            focus: 0,
            focusable: 0,
            open_nodes: HashSet::new(),
            text_cursor: None,
            key: None,
            ids: Vec::new(),
            lines: Vec::new(),
            current: Vec::new(),
            same_line: false,
            indent: 0,
            group_indents: Vec::new(),
            next_focus: 0,
            focused_line: None,
            item_widths: Vec::new(),
            table: None,
        }
    }

    pub fn begin_frame(&mut self, width: usize, key: Option<KeyEvent>) {
        self.width = width.max(20);
        self.key = None;
        self.ids.clear();
        self.lines.clear();
        self.current.clear();
        self.same_line = false;
        self.indent = 0;
        self.group_indents.clear();
        self.next_focus = 0;
        self.focused_line = None;
        self.item_widths.clear();
        self.table = None;

        let Some(key) = key else {
            return;
        };
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            _ => self.key = Some(key),
        }
    }

    pub fn end_frame(&mut self) {
        if !self.current.is_empty() {
            self.flush();
        }
        self.focusable = self.next_focus;
        if self.focus >= self.focusable {
            self.focus = self.focusable.saturating_sub(1);
        }
    }

    pub fn lines(&self) -> &[SpanLine] {
        &self.lines
    }

    /// Line holding the focused widget in the last frame.
    pub fn focused_line(&self) -> Option<usize> {
        self.focused_line
    }

    fn move_focus(&mut self, delta: isize) {
        if self.focusable == 0 {
            self.focus = 0;
            return;
        }
        let count = self.focusable as isize;
        self.focus = (self.focus as isize + delta).rem_euclid(count) as usize;
    }

    fn claim(&mut self) -> (bool, Option<KeyEvent>) {
        let index = self.next_focus;
        self.next_focus += 1;
        if index == self.focus {
            (true, self.key.take())
        } else {
            (false, None)
        }
    }

    fn full_id(&self, id: &str) -> String {
        let mut out = self.ids.join("/");
        out.push('/');
        out.push_str(id);
        out
    }

    fn flush(&mut self) {
        self.lines.push(std::mem::take(&mut self.current));
    }

    fn emit(&mut self, spans: Vec<Span>, focused: bool) {
        if self.same_line && !self.current.is_empty() {
            self.current.push(Span::new(" "));
        } else {
            if !self.current.is_empty() {
                self.flush();
            }
            if self.indent > 0 {
                self.current.push(Span::new(" ".repeat(self.indent)));
            }
        }
        self.same_line = false;
        if focused {
            self.focused_line = Some(self.lines.len());
        }
        self.current.extend(spans);
    }

    fn padded(&self, text: String) -> String {
        match self.item_widths.last().copied() {
            Some(width) => format!("{text:>width$}"),
            None => text,
        }
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::new().color(Color::Cyan).bold()
    } else {
        Style::default()
    }
}

fn is_activate(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Enter | KeyCode::Char(' '))
}

fn track_spans(ratio: f64, len: usize) -> Vec<Span> {
    let knob = (ratio * (len as f64 - 1.0))
        .round()
        .clamp(0.0, (len - 1) as f64) as usize;
    let active = Style::new().color(Color::Green);
    let mut spans = vec![Span::new("‹")];
    for idx in 0..len {
        let symbol = if idx == knob { '◈' } else { '—' };
        if idx <= knob {
            spans.push(Span::styled(symbol.to_string(), active));
        } else {
            spans.push(Span::new(symbol.to_string()));
        }
    }
    spans.push(Span::new("›"));
    spans
}

fn step_int(value: i64, delta: i64, min: i64, max: i64) -> i64 {
    value.saturating_add(delta).max(min).min(max)
}

fn apply_int_key(value: &mut i64, style: &NumberStyle<i64>, key: KeyEvent) {
    match *style {
        NumberStyle::Input => match key.code {
            KeyCode::Left => *value = value.saturating_sub(1),
            KeyCode::Right => *value = value.saturating_add(1),
            KeyCode::Char('-') => *value = value.saturating_neg(),
            KeyCode::Backspace => *value /= 10,
            KeyCode::Char(ch) if ch.is_ascii_digit() => {
                let digit = i64::from(ch as u8 - b'0');
                let digit = if *value < 0 { -digit } else { digit };
                if let Some(next) = value.checked_mul(10).and_then(|v| v.checked_add(digit)) {
                    *value = next;
                }
            }
            _ => {}
        },
        NumberStyle::Slider { min, max } => {
            let range = (max as i128 - min as i128).max(0);
            let step = (range / 100).clamp(1, i64::MAX as i128) as i64;
            match key.code {
                KeyCode::Left => *value = step_int(*value, -step, min, max),
                KeyCode::Right => *value = step_int(*value, step, min, max),
                KeyCode::Home => *value = min,
                KeyCode::End => *value = max,
                _ => {}
            }
        }
        NumberStyle::Drag { speed, min, max } => {
            let step = speed.abs().round().max(1.0) as i64;
            match key.code {
                KeyCode::Left => *value = step_int(*value, -step, min, max),
                KeyCode::Right => *value = step_int(*value, step, min, max),
                KeyCode::Home => *value = min,
                KeyCode::End => *value = max,
                _ => {}
            }
        }
    }
}

fn apply_float_key(value: &mut f64, style: &NumberStyle<f64>, key: KeyEvent) {
    let (step, min, max) = match *style {
        NumberStyle::Input => (FLOAT_INPUT_STEP, f64::MIN, f64::MAX),
        NumberStyle::Slider { min, max } => (((max - min) / 100.0).abs(), min, max),
        NumberStyle::Drag { speed, min, max } => (speed.abs(), min, max),
    };
    match key.code {
        KeyCode::Left => *value = (*value - step).max(min).min(max),
        KeyCode::Right => *value = (*value + step).max(min).min(max),
        KeyCode::Char('-') => *value = (-*value).max(min).min(max),
        KeyCode::Home if !matches!(style, NumberStyle::Input) => *value = min,
        KeyCode::End if !matches!(style, NumberStyle::Input) => *value = max,
        _ => {}
    }
}

impl Ui for TermUi {
    fn push_id(&mut self, id: &str) {
        self.ids.push(id.to_string());
    }

    fn pop_id(&mut self) {
        self.ids.pop();
    }

    fn text(&mut self, text: &str) {
        self.emit(vec![Span::new(text)], false);
    }

    fn text_disabled(&mut self, text: &str) {
        self.emit(
            vec![Span::styled(text, Style::new().color(Color::DarkGrey))],
            false,
        );
    }

    fn same_line(&mut self) {
        self.same_line = true;
    }

    fn new_line(&mut self) {
        if self.current.is_empty() {
            self.lines.push(Vec::new());
        } else {
            self.flush();
        }
        self.same_line = false;
    }

    fn checkbox(&mut self, _id: &str, value: &mut bool) -> bool {
        let (focused, key) = self.claim();
        let changed = key.as_ref().is_some_and(is_activate);
        if changed {
            *value = !*value;
        }
        let mark = if *value { "[x]" } else { "[ ]" };
        self.emit(vec![Span::styled(mark, focus_style(focused))], focused);
        changed
    }

    fn edit_int(&mut self, _id: &str, value: &mut i64, style: NumberStyle<i64>) -> bool {
        let (focused, key) = self.claim();
        let before = *value;
        if let Some(key) = key {
            apply_int_key(value, &style, key);
        }

        let text = self.padded(value.to_string());
        let mut spans = Vec::new();
        if let NumberStyle::Slider { min, max } = style {
            let range = max as f64 - min as f64;
            let ratio = if range > 0.0 {
                (*value as f64 - min as f64) / range
            } else {
                0.0
            };
            spans.extend(track_spans(ratio, TRACK_LEN));
            spans.push(Span::new(" "));
        }
        spans.push(Span::styled(text, focus_style(focused)));
        self.emit(spans, focused);
        *value != before
    }

    fn edit_float(&mut self, _id: &str, value: &mut f64, style: NumberStyle<f64>) -> bool {
        let (focused, key) = self.claim();
        let before = *value;
        if let Some(key) = key {
            apply_float_key(value, &style, key);
        }

        let text = self.padded(format!("{value:.3}"));
        let mut spans = Vec::new();
        if let NumberStyle::Slider { min, max } = style {
            let range = max - min;
            let ratio = if range > 0.0 {
                (*value - min) / range
            } else {
                0.0
            };
            spans.extend(track_spans(ratio, TRACK_LEN));
            spans.push(Span::new(" "));
        }
        spans.push(Span::styled(text, focus_style(focused)));
        self.emit(spans, focused);
        *value != before
    }

    fn input_text(&mut self, _id: &str, value: &mut String, capacity: usize) -> bool {
        let (focused, key) = self.claim();
        let index = self.next_focus - 1;
        let mut cursor = match self.text_cursor {
            Some((owner, cursor)) if owner == index => cursor,
            _ => text_edit::char_count(value),
        };

        let before = value.clone();
        if let Some(key) = key {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Char('w') if ctrl => {
                    text_edit::delete_word_left(value, &mut cursor);
                }
                KeyCode::Char(ch) if !ctrl && !ch.is_control() => {
                    text_edit::insert_char(value, &mut cursor, ch, capacity);
                }
                KeyCode::Backspace => {
                    text_edit::backspace_char(value, &mut cursor);
                }
                KeyCode::Delete => {
                    text_edit::delete_char(value, &mut cursor);
                }
                KeyCode::Left => {
                    text_edit::move_left(&mut cursor, value);
                }
                KeyCode::Right => {
                    text_edit::move_right(&mut cursor, value);
                }
                KeyCode::Home => cursor = 0,
                KeyCode::End => cursor = text_edit::char_count(value),
                _ => {}
            }
        }

        let spans = if focused {
            self.text_cursor = Some((index, cursor));
            let (left, right) = text_edit::split_at_cursor(value, cursor);
            let style = focus_style(true);
            vec![
                Span::styled(format!("\"{left}"), style),
                Span::styled("▏", Style::new().color(Color::Yellow)),
                Span::styled(format!("{right}\""), style),
            ]
        } else {
            vec![Span::new(self.padded(format!("\"{value}\"")))]
        };
        self.emit(spans, focused);
        *value != before
    }

    fn button(&mut self, label: &str) -> bool {
        self.small_button(label, true)
    }

    fn small_button(&mut self, label: &str, enabled: bool) -> bool {
        let (focused, key) = self.claim();
        let clicked = enabled && key.as_ref().is_some_and(is_activate);
        let style = if enabled {
            focus_style(focused)
        } else {
            focus_style(focused).color(Color::DarkGrey).dim()
        };
        self.emit(vec![Span::styled(format!("[{label}]"), style)], focused);
        clicked
    }

    fn begin_table(&mut self, _id: &str, columns: usize) -> bool {
        if !self.current.is_empty() {
            self.flush();
        }
        self.same_line = false;
        let usable = self.width.saturating_sub(self.indent);
        self.table = Some(TableLayout {
            origin: self.indent,
            column_width: usable / columns.max(1),
        });
        true
    }

    fn table_next_row(&mut self) {
        if !self.current.is_empty() {
            self.flush();
        }
        self.same_line = false;
    }

    fn table_set_column(&mut self, column: usize) {
        let Some(table) = self.table else {
            return;
        };
        if column == 0 {
            self.table_next_row();
            return;
        }
        let target = table.origin + column * table.column_width;
        let width = line_width(&self.current);
        if width + 1 < target {
            self.current
                .push(Span::new(" ".repeat(target - width - 1)));
        }
        self.same_line = true;
    }

    fn end_table(&mut self) {
        if !self.current.is_empty() {
            self.flush();
        }
        self.same_line = false;
        self.table = None;
    }

    fn begin_group(&mut self) {
        self.group_indents.push(self.indent);
        self.indent = self.cursor_x() as usize;
    }

    fn end_group(&mut self) {
        if let Some(indent) = self.group_indents.pop() {
            self.indent = indent;
        }
    }

    fn tree_node(&mut self, label: &str) -> bool {
        let full_id = self.full_id(label);
        let (focused, key) = self.claim();
        let mut open = self.open_nodes.contains(&full_id);
        if let Some(key) = key {
            match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => open = !open,
                KeyCode::Right => open = true,
                KeyCode::Left => open = false,
                _ => {}
            }
            if open {
                self.open_nodes.insert(full_id);
            } else {
                self.open_nodes.remove(&full_id);
            }
        }

        let arrow = if open { "▾" } else { "▸" };
        self.emit(
            vec![Span::styled(format!("{arrow} {label}"), focus_style(focused))],
            focused,
        );
        if open {
            self.ids.push(label.to_string());
            self.indent += INDENT;
        }
        open
    }

    fn tree_pop(&mut self) {
        self.ids.pop();
        self.indent = self.indent.saturating_sub(INDENT);
    }

    fn push_item_width(&mut self, width: f32) {
        self.item_widths.push(width.max(1.0) as usize);
    }

    fn pop_item_width(&mut self) {
        self.item_widths.pop();
    }

    fn available_width(&self) -> f32 {
        self.width.saturating_sub(self.cursor_x() as usize) as f32
    }

    fn cursor_x(&self) -> f32 {
        if self.same_line && !self.current.is_empty() {
            (line_width(&self.current) + 1) as f32
        } else {
            self.indent as f32
        }
    }

    fn text_width(&self, text: &str) -> f32 {
        UnicodeWidthStr::width(text) as f32
    }

    fn item_spacing(&self) -> f32 {
        1.0
    }

    fn frame_padding(&self) -> f32 {
        1.0
    }
}
