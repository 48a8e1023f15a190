//! File system writes with transaction support.
//!
//! Manifest updates are staged and written as a unit, restoring already
//! written files if a later write fails.

pub mod transaction;

pub use transaction::{FileUpdate, Transaction, display_path};
