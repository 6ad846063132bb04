// Template I/O: engine grid <-> persisted schema

pub mod template;

pub use template::{from_template, load_template, save_template, to_template};
