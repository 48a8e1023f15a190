//! Cargo manifest discovery and rewriting.
//!
//! This module switches the source of tracked dependencies in `Cargo.toml`
//! files. It is split into:
//!
//! - **`locate`**: Finding manifests below a root directory
//! - **`scan`**: Locating tracked declarations in manifest text
//! - **`table`**: Parsing and serializing inline tables
//! - **`rewrite`**: Producing the declaration for a target source mode
//! - **`update`**: Applying rewritten declarations to a manifest
//!
//! All rewriting is text-based so that formatting and comments outside the
//! rewritten declarations are preserved.

pub mod locate;
pub mod rewrite;
pub mod scan;
pub mod table;
pub mod update;

pub use locate::find_manifests;
pub use scan::{BlockKind, BlockScanner, DependencyBlock};
pub use table::AttributePair;
pub use update::{Edit, ManifestFile, apply_edits};
