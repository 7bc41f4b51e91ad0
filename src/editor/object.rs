use indexmap::IndexMap;

use crate::core::callback::PathCallback;
use crate::core::value::{Kind, Value};
use crate::core::value_path::ValuePath;
use crate::schema::{Schema, Widget};
use crate::ui::{Ui, with_id};

use super::{dispatch, notify, snapshot};

/// Edits every key of an object in its stored order.
///
/// `properties` only supplies per-key metadata: keys are never added,
/// removed or reordered. After any child changes, the object is reported at
/// its own path, except at the root.
pub fn edit_object(
    ui: &mut dyn Ui,
    value: &mut Value,
    schema: Option<&Schema>,
    callbacks: &[PathCallback],
    path: &ValuePath,
) -> bool {
    let schema = schema.unwrap_or(Schema::empty());
    value.coerce(Kind::Object);
    let before = if path.is_empty() {
        None
    } else {
        snapshot(callbacks, value)
    };
    let Some(map) = value.as_object_mut() else {
        return false;
    };

    let changed = match schema.widget() {
        Some(Widget::Collapsible) => {
            if ui.tree_node(schema.label_or("Object")) {
                let changed = edit_properties(ui, map, schema, callbacks, path);
                ui.tree_pop();
                changed
            } else {
                false
            }
        }
        Some(Widget::Inline) => {
            ui.begin_group();
            let changed = edit_properties(ui, map, schema, callbacks, path);
            ui.end_group();
            changed
        }
        _ => edit_properties(ui, map, schema, callbacks, path),
    };

    if changed {
        notify(callbacks, path, before.as_ref(), value);
    }
    changed
}

fn edit_properties(
    ui: &mut dyn Ui,
    map: &mut IndexMap<String, Value>,
    schema: &Schema,
    callbacks: &[PathCallback],
    path: &ValuePath,
) -> bool {
    let mut changed = false;
    for (key, child) in map.iter_mut() {
        let child_schema = schema.property(key);
        let label = child_schema.map_or(key.as_str(), |s| s.label_or(key));
        let child_path = path.child_key(key);

        changed |= with_id(ui, key, |ui| {
            ui.text(label);
            ui.same_line();
            dispatch(ui, key, child, child_schema, callbacks, &child_path)
        });
    }
    changed
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::edit_object;
    use crate::core::callback::{Handler, PathCallback};
    use crate::core::value::Value;
    use crate::core::value_path::ValuePath;
    use crate::schema::Schema;
    use crate::ui::script::{Action, Drawn, ScriptUi};

    fn schema(json: &str) -> Schema {
        Schema::from_json_str(json).expect("schema json")
    }

    fn value(json: &str) -> Value {
        serde_json::from_str(json).expect("value json")
    }

    fn paths() -> (Rc<RefCell<Vec<String>>>, Vec<PathCallback>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let callbacks = vec![PathCallback::any(Handler::path(move |path| {
            sink.borrow_mut().push(path.to_string());
        }))];
        (log, callbacks)
    }

    fn texts(ui: &ScriptUi) -> Vec<String> {
        ui.drawn()
            .iter()
            .filter_map(|drawn| match drawn {
                Drawn::Text(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn keys_follow_data_order_and_schema_labels() {
        let mut ui = ScriptUi::new();
        let s = schema(
            r#"{"type": "object", "properties": {
                "b": {"type": "int", "label": "Bee"},
                "missing": {"type": "string"}
            }}"#,
        );
        let mut data = value(r#"{"z": true, "b": 2}"#);
        edit_object(&mut ui, &mut data, Some(&s), &[], &ValuePath::empty());

        assert_eq!(texts(&ui), vec!["z".to_string(), "Bee".to_string()]);
        assert_eq!(data, value(r#"{"z": true, "b": 2}"#));
        assert!(ui.find("z/z/##bool").is_some());
        assert!(ui.find("b/b/##int").is_some());
    }

    #[test]
    fn declared_object_replaces_other_shapes() {
        let mut ui = ScriptUi::new();
        let s = schema(r#"{"type": "object"}"#);
        let mut data = value("[1]");
        assert!(!edit_object(&mut ui, &mut data, Some(&s), &[], &ValuePath::empty()));
        assert_eq!(data, value("{}"));
    }

    #[test]
    fn root_object_does_not_report_itself() {
        let mut ui = ScriptUi::new();
        ui.queue("age/age/##int", Action::SetInt(9));
        let (log, callbacks) = paths();
        let mut data = value(r#"{"age": 1}"#);
        assert!(edit_object(&mut ui, &mut data, None, &callbacks, &ValuePath::empty()));
        assert_eq!(log.borrow().as_slice(), &["age".to_string()]);
    }

    #[test]
    fn nested_object_reports_leaf_then_itself() {
        let mut ui = ScriptUi::new();
        ui.queue("user/user/name/name/##str", Action::SetText("bo".to_string()));
        let (log, callbacks) = paths();
        let mut data = value(r#"{"user": {"name": "al"}, "other": 1}"#);
        assert!(edit_object(&mut ui, &mut data, None, &callbacks, &ValuePath::empty()));
        assert_eq!(
            log.borrow().as_slice(),
            &["user/name".to_string(), "user".to_string()]
        );
        assert_eq!(data, value(r#"{"user": {"name": "bo"}, "other": 1}"#));
    }

    #[test]
    fn collapsible_hides_children_until_open() {
        let s = schema(r#"{"type": "object", "label": "Profile", "ui:widget": "collapsible"}"#);
        let mut data = value(r#"{"age": 1}"#);

        let mut ui = ScriptUi::new();
        edit_object(&mut ui, &mut data, Some(&s), &[], &ValuePath::empty());
        assert_eq!(
            ui.drawn(),
            &[Drawn::TreeNode {
                id: "Profile".to_string(),
                open: false
            }]
        );

        let mut ui = ScriptUi::new();
        ui.open("Profile");
        edit_object(&mut ui, &mut data, Some(&s), &[], &ValuePath::empty());
        assert!(ui.find("Profile/age/age/##int").is_some());
        assert_eq!(ui.drawn().last(), Some(&Drawn::TreePop));
    }

    #[test]
    fn collapsible_without_label_is_titled_object() {
        let s = schema(r#"{"type": "object", "ui:widget": "collapsible"}"#);
        let mut data = value("{}");
        let mut ui = ScriptUi::new();
        edit_object(&mut ui, &mut data, Some(&s), &[], &ValuePath::empty());
        assert!(ui.find("Object").is_some());
    }

    #[test]
    fn inline_groups_children() {
        let s = schema(r#"{"type": "object", "ui:widget": "inline"}"#);
        let mut data = value(r#"{"a": "x"}"#);
        let mut ui = ScriptUi::new();
        edit_object(&mut ui, &mut data, Some(&s), &[], &ValuePath::empty());
        assert_eq!(ui.drawn().first(), Some(&Drawn::GroupBegin));
        assert_eq!(ui.drawn().last(), Some(&Drawn::GroupEnd));
    }
}
