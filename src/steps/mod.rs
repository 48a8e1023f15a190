pub mod switch;

pub use switch::{execute, resolve_mode, switch_tree};
