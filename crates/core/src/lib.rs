pub mod selection;

pub use selection::{Range, Selection};
