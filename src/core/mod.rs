pub mod callback;
pub mod value;
pub mod value_path;
