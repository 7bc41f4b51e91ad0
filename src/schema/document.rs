use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::core::value::Value;
use crate::schema::Schema;

#[derive(Debug)]
pub enum LoadError {
    Io(io::Error),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "read failed: {err}"),
            Self::Json(err) => write!(f, "invalid JSON: {err}"),
            Self::Yaml(err) => write!(f, "invalid YAML: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Yaml(err) => Some(err),
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<serde_yaml::Error> for LoadError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err)
    }
}

/// Reads a JSON document, or YAML when the extension is `.yaml`/`.yml`.
pub fn load_value(path: &Path) -> Result<Value, LoadError> {
    let text = fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if is_yaml {
        Ok(serde_yaml::from_str(&text)?)
    } else {
        Ok(serde_json::from_str(&text)?)
    }
}

impl Schema {
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, LoadError> {
        let value: Value = serde_yaml::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    pub fn load(path: &Path) -> Result<Self, LoadError> {
        load_value(path).map(|value| Self::from_value(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::load_value;
    use crate::core::value::Value;
    use crate::schema::{Schema, SchemaType, Widget};

    #[test]
    fn yaml_and_json_read_the_same_schema() {
        let from_yaml = Schema::from_yaml_str(
            "type: object\nproperties:\n  speed:\n    type: float\n    ui:widget: drag\n    speed: 0.5\n",
        )
        .expect("yaml");
        let from_json = Schema::from_json_str(
            r#"{"type": "object", "properties": {"speed": {"type": "float", "ui:widget": "drag", "speed": 0.5}}}"#,
        )
        .expect("json");
        assert_eq!(from_yaml, from_json);
        let speed = from_yaml.property("speed").expect("speed");
        assert_eq!(speed.ty, Some(SchemaType::Float));
        assert_eq!(speed.widget(), Some(&Widget::Drag));
        assert_eq!(speed.speed(), 0.5);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = Schema::from_json_str("{").expect_err("should fail");
        assert!(err.to_string().starts_with("invalid JSON"));
    }

    #[test]
    fn load_value_picks_format_by_extension() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("schema-edit-load-{}.yml", std::process::id()));
        std::fs::write(&path, "a: [1, 2]\n").expect("write");
        let loaded = load_value(&path).expect("load");
        std::fs::remove_file(&path).ok();
        let expected: Value = serde_json::from_str(r#"{"a": [1, 2]}"#).expect("json");
        assert_eq!(loaded, expected);

        assert!(load_value(&dir.join("schema-edit-missing.json")).is_err());
    }
}
