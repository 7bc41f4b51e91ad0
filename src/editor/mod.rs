//! Schema-guided editors over a [`Value`] tree.
//!
//! Every editor draws its part of the tree through a [`Ui`] for one frame,
//! mutates the value in place and returns whether anything below it changed.
//! Accepted edits are reported to the callback list at the path of the
//! edited node, and again at each enclosing container's path.

mod array;
mod dispatcher;
mod numeric_array;
mod object;
mod primitive;

pub use array::edit_array;
pub use dispatcher::{Route, dispatch, route};
pub use numeric_array::edit_numeric_array;
pub use object::edit_object;
pub use primitive::edit_primitive;

use crate::core::callback::{PathCallback, invoke_matching};
use crate::core::value::Value;
use crate::core::value_path::ValuePath;
use crate::schema::Schema;
use crate::ui::Ui;

/// Edits `data` under `label`, starting from the empty root path.
pub fn edit(
    ui: &mut dyn Ui,
    label: &str,
    data: &mut Value,
    schema: Option<&Schema>,
    callbacks: &[PathCallback],
) -> bool {
    dispatch(ui, label, data, schema, callbacks, &ValuePath::empty())
}

/// Copy of `value` to report as the old value, taken only when someone
/// could be listening.
fn snapshot(callbacks: &[PathCallback], value: &Value) -> Option<Value> {
    (!callbacks.is_empty()).then(|| value.clone())
}

fn notify(callbacks: &[PathCallback], path: &ValuePath, old: Option<&Value>, new: &Value) {
    if let Some(old) = old {
        invoke_matching(callbacks, &path.to_string(), old, new);
    }
}
