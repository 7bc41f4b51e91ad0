//! Cursor-based editing of a single-line string. Cursors count characters,
//! not bytes.

pub fn char_count(value: &str) -> usize {
    value.chars().count()
}

pub fn clamp_cursor(cursor: usize, value: &str) -> usize {
    cursor.min(char_count(value))
}

/// Inserts `ch` at the cursor unless the result would exceed `capacity`
/// bytes.
pub fn insert_char(value: &mut String, cursor: &mut usize, ch: char, capacity: usize) -> bool {
    if value.len() + ch.len_utf8() > capacity {
        return false;
    }
    let pos = clamp_cursor(*cursor, value);
    let byte_pos = byte_index_at_char(value, pos);
    value.insert(byte_pos, ch);
    *cursor = pos + 1;
    true
}

pub fn backspace_char(value: &mut String, cursor: &mut usize) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos == 0 {
        return false;
    }
    let byte_pos = byte_index_at_char(value, pos - 1);
    value.remove(byte_pos);
    *cursor = pos - 1;
    true
}

pub fn delete_char(value: &mut String, cursor: &mut usize) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos >= char_count(value) {
        *cursor = pos;
        return false;
    }
    let byte_pos = byte_index_at_char(value, pos);
    value.remove(byte_pos);
    *cursor = pos;
    true
}

pub fn move_left(cursor: &mut usize, value: &str) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos == 0 {
        return false;
    }
    *cursor = pos - 1;
    true
}

pub fn move_right(cursor: &mut usize, value: &str) -> bool {
    let pos = clamp_cursor(*cursor, value);
    if pos >= char_count(value) {
        return false;
    }
    *cursor = pos + 1;
    true
}

pub fn delete_word_left(value: &mut String, cursor: &mut usize) -> bool {
    let mut chars: Vec<char> = value.chars().collect();
    let pos = (*cursor).min(chars.len());
    if pos == 0 {
        *cursor = 0;
        return false;
    }

    let mut start = pos;
    while start > 0 && is_separator(chars[start - 1]) {
        start -= 1;
    }
    while start > 0 && !is_separator(chars[start - 1]) {
        start -= 1;
    }

    chars.drain(start..pos);
    *value = chars.into_iter().collect();
    *cursor = start;
    true
}

/// Splits `value` at the cursor, for drawing a caret between the halves.
pub fn split_at_cursor(value: &str, cursor: usize) -> (&str, &str) {
    value.split_at(byte_index_at_char(value, clamp_cursor(cursor, value)))
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '.' | '/' | ',' | '-' | '@' | '_' | ':')
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    if char_idx == 0 {
        return 0;
    }
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_respects_capacity() {
        let mut value = "ab".to_string();
        let mut cursor = 1;
        assert!(insert_char(&mut value, &mut cursor, 'x', 3));
        assert_eq!(value, "axb");
        assert_eq!(cursor, 2);
        assert!(!insert_char(&mut value, &mut cursor, 'y', 3));
        assert_eq!(value, "axb");
    }

    #[test]
    fn backspace_and_delete_work_on_chars() {
        let mut value = "héllo".to_string();
        let mut cursor = 2;
        assert!(backspace_char(&mut value, &mut cursor));
        assert_eq!(value, "hllo");
        assert!(delete_char(&mut value, &mut cursor));
        assert_eq!(value, "hlo");
        assert_eq!(cursor, 1);
    }

    #[test]
    fn delete_word_left_stops_at_separator() {
        let mut value = "user/name".to_string();
        let mut cursor = char_count(&value);
        assert!(delete_word_left(&mut value, &mut cursor));
        assert_eq!(value, "user/");
        assert_eq!(cursor, 5);
    }

    #[test]
    fn split_at_cursor_is_char_aware() {
        assert_eq!(split_at_cursor("aéb", 2), ("aé", "b"));
        assert_eq!(split_at_cursor("ab", 9), ("ab", ""));
    }
}
