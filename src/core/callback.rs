//! Path-pattern subscriptions over edits.
//!
//! Editors report every accepted mutation as `(path, old, new)`. A
//! [`PathCallback`] holds the patterns it cares about and a [`Handler`];
//! [`invoke_matching`] runs each registration whose patterns accept the path,
//! in registration order, on the calling thread.
//!
//! Handlers observe the tree while it is being edited. Mutating the edited
//! document from inside a handler is not supported.

use std::fmt;

use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

use crate::core::value::Value;

/// One compiled path pattern.
#[derive(Debug, Clone)]
pub enum PathPattern {
    /// Matches exactly this path.
    Literal(String),
    /// `*` matches any run of characters, `/` included.
    Wildcard(GlobMatcher),
    /// Must match the whole path.
    Regex(Regex),
}

impl PathPattern {
    /// Literal unless the text contains `*`.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.contains('*') {
            return Ok(Self::Literal(pattern.to_string()));
        }
        let glob = wildcard_to_glob(pattern);
        let matcher = GlobBuilder::new(&glob)
            .literal_separator(false)
            .backslash_escape(false)
            .build()
            .map_err(|err| PatternError::glob(pattern, err))?
            .compile_matcher();
        Ok(Self::Wildcard(matcher))
    }

    /// Compiles `pattern` anchored at both ends.
    pub fn regex(pattern: &str) -> Result<Self, PatternError> {
        let anchored = format!("^(?:{pattern})$");
        Regex::new(&anchored)
            .map(Self::Regex)
            .map_err(|err| PatternError::regex(pattern, err))
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == path,
            Self::Wildcard(matcher) => matcher.is_match(path),
            Self::Regex(regex) => regex.is_match(path),
        }
    }
}

/// Escapes everything except `*`, and folds `**` runs into one `*` so the
/// glob never sees a recursive wildcard.
fn wildcard_to_glob(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut parts = pattern.split('*').peekable();
    while let Some(part) = parts.next() {
        out.push_str(&globset::escape(part));
        if parts.peek().is_some() && !out.ends_with('*') {
            out.push('*');
        }
    }
    out
}

#[derive(Debug, Clone)]
pub struct PatternError {
    message: String,
}

impl PatternError {
    fn glob(pattern: &str, err: globset::Error) -> Self {
        Self {
            message: format!("invalid wildcard pattern '{pattern}': {err}"),
        }
    }

    fn regex(pattern: &str, err: regex::Error) -> Self {
        Self {
            message: format!("invalid path regex '{pattern}': {err}"),
        }
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl std::error::Error for PatternError {}

/// A change listener, in whichever of the supported shapes the caller wrote.
pub enum Handler {
    Change(Box<dyn Fn(&str, &Value, &Value)>),
    PathValue(Box<dyn Fn(&str, &Value)>),
    Path(Box<dyn Fn(&str)>),
    Values(Box<dyn Fn(&Value, &Value)>),
    Value(Box<dyn Fn(&Value)>),
    Notify(Box<dyn Fn()>),
}

impl Handler {
    pub fn change(f: impl Fn(&str, &Value, &Value) + 'static) -> Self {
        Self::Change(Box::new(f))
    }

    pub fn path_value(f: impl Fn(&str, &Value) + 'static) -> Self {
        Self::PathValue(Box::new(f))
    }

    pub fn path(f: impl Fn(&str) + 'static) -> Self {
        Self::Path(Box::new(f))
    }

    pub fn values(f: impl Fn(&Value, &Value) + 'static) -> Self {
        Self::Values(Box::new(f))
    }

    pub fn value(f: impl Fn(&Value) + 'static) -> Self {
        Self::Value(Box::new(f))
    }

    pub fn notify(f: impl Fn() + 'static) -> Self {
        Self::Notify(Box::new(f))
    }

    pub fn call(&self, path: &str, old: &Value, new: &Value) {
        match self {
            Self::Change(f) => f(path, old, new),
            Self::PathValue(f) => f(path, new),
            Self::Path(f) => f(path),
            Self::Values(f) => f(old, new),
            Self::Value(f) => f(new),
            Self::Notify(f) => f(),
        }
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self {
            Self::Change(_) => "Change",
            Self::PathValue(_) => "PathValue",
            Self::Path(_) => "Path",
            Self::Values(_) => "Values",
            Self::Value(_) => "Value",
            Self::Notify(_) => "Notify",
        };
        write!(f, "Handler::{shape}")
    }
}

#[derive(Debug)]
pub struct PathCallback {
    patterns: Vec<PathPattern>,
    handler: Handler,
}

impl PathCallback {
    pub fn new<I, S>(patterns: I, handler: Handler) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| PathPattern::parse(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns, handler })
    }

    /// Registration with no patterns: fires for every path.
    pub fn any(handler: Handler) -> Self {
        Self {
            patterns: Vec::new(),
            handler,
        }
    }

    pub fn with_pattern(mut self, pattern: PathPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn patterns(&self) -> &[PathPattern] {
        &self.patterns
    }

    pub fn matches(&self, path: &str) -> bool {
        self.patterns.is_empty() || self.patterns.iter().any(|pattern| pattern.matches(path))
    }
}

pub type CallbackList = Vec<PathCallback>;

pub fn invoke_matching(callbacks: &[PathCallback], path: &str, old: &Value, new: &Value) {
    for entry in callbacks {
        if entry.matches(path) {
            tracing::trace!(path, handler = ?entry.handler, "invoking change callback");
            entry.handler.call(path, old, new);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Handler, PathCallback, PathPattern, invoke_matching};
    use crate::core::value::Value;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn wildcard_crosses_separators() {
        let cb = PathCallback::new(["user/*"], Handler::notify(|| {})).expect("pattern");
        assert!(cb.matches("user/name"));
        assert!(cb.matches("user/address/city"));
        assert!(!cb.matches("admin/name"));
    }

    #[test]
    fn empty_pattern_set_matches_everything() {
        let cb = PathCallback::any(Handler::notify(|| {}));
        assert!(cb.matches(""));
        assert!(cb.matches("anything[3]/at/all"));
    }

    #[test]
    fn literal_is_exact_and_brackets_are_not_classes() {
        let cb = PathCallback::new(["items[2]/x"], Handler::notify(|| {})).expect("pattern");
        assert!(cb.matches("items[2]/x"));
        assert!(!cb.matches("items2/x"));

        let wild = PathPattern::parse("items[*]/x").expect("pattern");
        assert!(wild.matches("items[10]/x"));
        assert!(!wild.matches("items1/x"));
    }

    #[test]
    fn repeated_stars_behave_like_one() {
        let pattern = PathPattern::parse("a**b").expect("pattern");
        assert!(pattern.matches("ab"));
        assert!(pattern.matches("a/x/b"));
    }

    #[test]
    fn regex_patterns_are_anchored() {
        let pattern = PathPattern::regex(r"pos\[\d+\]").expect("regex");
        assert!(pattern.matches("pos[1]"));
        assert!(!pattern.matches("xpos[1]"));
        assert!(!pattern.matches("pos[1]/y"));
        assert!(PathPattern::regex("(").is_err());
    }

    #[test]
    fn any_pattern_in_set_triggers() {
        let cb = PathCallback::new(["a", "b/*"], Handler::notify(|| {})).expect("pattern");
        assert!(cb.matches("a"));
        assert!(cb.matches("b/c"));
        assert!(!cb.matches("c"));
    }

    #[test]
    fn invoke_runs_matching_handlers_in_order_with_their_shape() {
        let log = Rc::new(RefCell::new(Vec::<String>::new()));
        let (l1, l2, l3, l4) = (log.clone(), log.clone(), log.clone(), log.clone());
        let (l5, l6, l7) = (log.clone(), log.clone(), log.clone());
        let callbacks = vec![
            PathCallback::new(
                ["age"],
                Handler::change(move |path, old, new| {
                    l1.borrow_mut().push(format!("change {path} {old:?} {new:?}"))
                }),
            )
            .expect("pattern"),
            PathCallback::new(
                ["other"],
                Handler::path(move |path| l2.borrow_mut().push(format!("other {path}"))),
            )
            .expect("pattern"),
            PathCallback::any(Handler::value(move |new| {
                l3.borrow_mut().push(format!("value {new:?}"))
            })),
            PathCallback::any(Handler::notify(move || l4.borrow_mut().push("notify".into()))),
            PathCallback::new(
                ["a*"],
                Handler::path_value(move |path, new| {
                    l5.borrow_mut().push(format!("path_value {path} {new:?}"))
                }),
            )
            .expect("pattern"),
            PathCallback::any(Handler::values(move |old, new| {
                l6.borrow_mut().push(format!("values {old:?} {new:?}"))
            })),
            PathCallback::any(Handler::path(move |path| {
                l7.borrow_mut().push(format!("path {path}"))
            })),
        ];

        invoke_matching(&callbacks, "age", &Value::Int(5), &Value::Int(30));

        assert_eq!(
            *log.borrow(),
            vec![
                "change age Int(5) Int(30)".to_string(),
                "value Int(30)".to_string(),
                "notify".to_string(),
                "path_value age Int(30)".to_string(),
                "values Int(5) Int(30)".to_string(),
                "path age".to_string(),
            ]
        );
    }
}
