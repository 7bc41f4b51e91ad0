pub mod core;
pub mod editor;
pub mod schema;
pub mod terminal;
pub mod ui;

pub use crate::core::callback::{CallbackList, Handler, PathCallback, PathPattern, PatternError};
pub use crate::core::value::{Kind, Value};
pub use crate::core::value_path::{PathSegment, ValuePath};

pub use crate::editor::{dispatch, edit};
pub use crate::schema::{LoadError, Schema, generate_default};

pub use crate::ui::script::ScriptUi;
pub use crate::ui::term::TermUi;
pub use crate::ui::{NumberStyle, Ui};
