use crate::core::value::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Address of a node relative to the edit root.
///
/// Renders as `items[2]/x`: the first key bare, later keys after `/`,
/// indexes in brackets. Only meaningful within one evaluation, since list
/// indexes shift when items are added or removed.
///
/// The separator depends on position, not on the text before it, so an
/// empty first key still puts `/` before the next one (`/b`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ValuePath {
    segments: Vec<PathSegment>,
}

impl ValuePath {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        self.segments.as_slice()
    }

    pub fn child_key(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(key.to_string()));
        Self { segments }
    }

    pub fn child_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    pub fn parse(input: &str) -> Result<Self, ValuePathParseError> {
        parse_path(input)
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) => {
                    if idx > 0 {
                        f.write_str("/")?;
                    }
                    f.write_str(key)?;
                }
                PathSegment::Index(index) => {
                    write!(f, "[{index}]")?;
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePathParseError {
    message: String,
}

impl ValuePathParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ValuePathParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl std::error::Error for ValuePathParseError {}

fn parse_path(input: &str) -> Result<ValuePath, ValuePathParseError> {
    if input.is_empty() {
        return Ok(ValuePath::empty());
    }

    let chars: Vec<char> = input.chars().collect();
    let mut idx = 0usize;
    let mut out = Vec::<PathSegment>::new();

    while idx < chars.len() {
        match chars[idx] {
            '[' => {
                idx += 1;
                let start = idx;
                while idx < chars.len() && chars[idx] != ']' {
                    idx += 1;
                }
                if idx >= chars.len() {
                    return Err(ValuePathParseError::new("unterminated '[' segment"));
                }
                let raw = chars[start..idx].iter().collect::<String>();
                idx += 1;
                let index = raw.parse::<usize>().map_err(|_| {
                    ValuePathParseError::new(format!("invalid index '{raw}' at position {start}"))
                })?;
                out.push(PathSegment::Index(index));
            }
            '/' if !out.is_empty() => {
                idx += 1;
                out.push(PathSegment::Key(parse_key(&chars, &mut idx)?));
            }
            _ if out.is_empty() => {
                out.push(PathSegment::Key(parse_key(&chars, &mut idx)?));
            }
            ch => {
                return Err(ValuePathParseError::new(format!(
                    "unexpected character '{}' at position {}",
                    ch, idx
                )));
            }
        }
    }

    Ok(ValuePath::new(out))
}

fn parse_key(chars: &[char], idx: &mut usize) -> Result<String, ValuePathParseError> {
    let start = *idx;
    while *idx < chars.len() {
        let ch = chars[*idx];
        if ch == '/' || ch == '[' {
            break;
        }
        *idx += 1;
    }
    if *idx == start {
        return Err(ValuePathParseError::new(format!(
            "expected key at position {}",
            start
        )));
    }
    Ok(chars[start..*idx].iter().collect::<String>())
}

fn container_for_next(next: Option<&PathSegment>) -> Value {
    match next {
        Some(PathSegment::Index(_)) => Value::List(Vec::new()),
        _ => Value::Object(Default::default()),
    }
}

pub(crate) fn ensure_value_path_mut<'a>(root: &'a mut Value, path: &ValuePath) -> &'a mut Value {
    let segments = path.segments();
    let mut current = root;
    for (idx, segment) in segments.iter().enumerate() {
        let next = segments.get(idx + 1);
        current = match segment {
            PathSegment::Key(key) => {
                if !current.is_object() {
                    *current = Value::Object(Default::default());
                }
                let Value::Object(map) = current else {
                    unreachable!("coerced to object above");
                };
                map.entry(key.clone())
                    .or_insert_with(|| container_for_next(next))
            }
            PathSegment::Index(index) => {
                if !current.is_list() {
                    *current = Value::List(Vec::new());
                }
                let Value::List(list) = current else {
                    unreachable!("coerced to list above");
                };
                if list.len() <= *index {
                    list.resize_with(index + 1, || Value::Null);
                }
                let slot = &mut list[*index];
                if slot.is_null() && next.is_some() {
                    *slot = container_for_next(next);
                }
                slot
            }
        };
    }
    current
}
