//! Dependency families and the switch configuration.
//!
//! A family is a fixed set of crates that live in one upstream repository.
//! Every crate maps to its local checkout path (used by `local` mode) and the
//! whole family shares one git URL (used by `rev` and `branch` modes).
//!
//! The built-in families can be extended or replaced with a TOML file:
//!
//! ```toml
//! skip-dirs = ["target", ".git"]
//!
//! [families.mylib]
//! git = "https://example.com/mylib"
//! supports-version = true
//!
//! [families.mylib.crates]
//! mylib = "../../../mylib/mylib"
//! ```

use crate::error::{Result, SwitchError};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use toml_edit::{DocumentMut, Item};

/// Directory names never descended into while looking for manifests.
pub const DEFAULT_SKIP_DIRS: [&str; 4] = ["target", ".git", "node_modules", "build"];

/// File name of the manifests to rewrite.
pub const MANIFEST_NAME: &str = "Cargo.toml";

const DASHCORE_GIT: &str = "https://github.com/dashpay/rust-dashcore";
const DASHCORE_CRATES: [(&str, &str); 10] = [
    ("dashcore", "../../../rust-dashcore/dash"),
    ("dash-network", "../../../rust-dashcore/dash-network"),
    ("dash-spv", "../../../rust-dashcore/dash-spv"),
    ("dash-spv-ffi", "../../../rust-dashcore/dash-spv-ffi"),
    ("dashcore-rpc", "../../../rust-dashcore/rpc-client"),
    ("dashcore-rpc-json", "../../../rust-dashcore/rpc-json"),
    ("dashcore_hashes", "../../../rust-dashcore/hashes"),
    ("key-wallet", "../../../rust-dashcore/key-wallet"),
    ("key-wallet-manager", "../../../rust-dashcore/key-wallet-manager"),
    ("key-wallet-ffi", "../../../rust-dashcore/key-wallet-ffi"),
];

const GROVEDB_GIT: &str = "https://github.com/dashpay/grovedb";
const GROVEDB_CRATES: [(&str, &str); 9] = [
    ("grovedb", "../../../grovedb/grovedb"),
    ("grovedb-costs", "../../../grovedb/costs"),
    ("grovedb-merk", "../../../grovedb/merk"),
    ("grovedb-path", "../../../grovedb/path"),
    ("grovedb-storage", "../../../grovedb/storage"),
    ("grovedb-version", "../../../grovedb/grovedb-version"),
    ("grovedb-visualize", "../../../grovedb/visualize"),
    ("grovedbg-types", "../../../grovedb/grovedbg-types"),
    (
        "grovedb-epoch-based-storage-flags",
        "../../../grovedb/grovedb-epoch-based-storage-flags",
    ),
];

/// A set of crates switched together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyFamily {
    pub name: String,
    pub git_url: String,
    pub supports_version: bool,
    crates: BTreeMap<String, String>,
}

impl DependencyFamily {
    pub fn new(
        name: impl Into<String>,
        git_url: impl Into<String>,
        supports_version: bool,
        crates: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            name: name.into(),
            git_url: git_url.into(),
            supports_version,
            crates: crates.into_iter().collect(),
        }
    }

    /// The rust-dashcore family.
    pub fn dashcore() -> Self {
        Self::new(
            "dashcore",
            DASHCORE_GIT,
            false,
            DASHCORE_CRATES
                .iter()
                .map(|(name, path)| (name.to_string(), path.to_string())),
        )
    }

    /// The GroveDB family.
    pub fn grovedb() -> Self {
        Self::new(
            "grovedb",
            GROVEDB_GIT,
            true,
            GROVEDB_CRATES
                .iter()
                .map(|(name, path)| (name.to_string(), path.to_string())),
        )
    }

    /// Tracked crate names, sorted.
    pub fn crate_names(&self) -> impl Iterator<Item = &str> {
        self.crates.keys().map(String::as_str)
    }

    /// Local checkout path for a tracked crate.
    pub fn local_path(&self, name: &str) -> Option<&str> {
        self.crates.get(name).map(String::as_str)
    }

    pub fn crates(&self) -> impl Iterator<Item = (&str, &str)> {
        self.crates.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.crates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crates.is_empty()
    }
}

/// Immutable switch configuration: known families and traversal settings.
#[derive(Debug, Clone)]
pub struct Registry {
    families: BTreeMap<String, DependencyFamily>,
    pub skip_dirs: Vec<String>,
    pub manifest_name: String,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Registry {
    /// Registry with the built-in families and default skip set.
    pub fn builtin() -> Self {
        let mut registry = Self {
            families: BTreeMap::new(),
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            manifest_name: MANIFEST_NAME.to_string(),
        };
        registry.insert(DependencyFamily::dashcore());
        registry.insert(DependencyFamily::grovedb());
        registry
    }

    /// Loads the built-in registry, applying overrides from `config` if given.
    pub fn load(config: Option<&Path>) -> Result<Self> {
        let mut registry = Self::builtin();
        if let Some(path) = config {
            log::debug!("Loading configuration from {}", path.display());
            let content = fs::read_to_string(path)?;
            registry.apply_config(&content)?;
        }
        Ok(registry)
    }

    pub fn insert(&mut self, family: DependencyFamily) {
        self.families.insert(family.name.clone(), family);
    }

    /// Looks up a family by name.
    pub fn family(&self, name: &str) -> Result<&DependencyFamily> {
        self.families
            .get(name)
            .ok_or_else(|| SwitchError::UnknownFamily(name.to_string()))
    }

    pub fn families(&self) -> impl Iterator<Item = &DependencyFamily> {
        self.families.values()
    }

    /// Merges a TOML configuration document into this registry.
    ///
    /// A family defined in the document replaces a built-in family of the
    /// same name. `skip-dirs` replaces the default skip set.
    pub fn apply_config(&mut self, content: &str) -> Result<()> {
        let doc: DocumentMut = content.parse()?;

        if let Some(item) = doc.get("skip-dirs") {
            self.skip_dirs = string_array(item, "skip-dirs")?;
        }

        if let Some(item) = doc.get("manifest-name") {
            self.manifest_name = item
                .as_str()
                .ok_or_else(|| SwitchError::Config("manifest-name must be a string".into()))?
                .to_string();
        }

        let Some(families) = doc.get("families") else {
            return Ok(());
        };
        let families = families
            .as_table_like()
            .ok_or_else(|| SwitchError::Config("families must be a table".into()))?;

        for (name, item) in families.iter() {
            let family = parse_family(name, item)?;
            log::debug!(
                "Configured family '{}' with {} crates",
                family.name,
                family.len()
            );
            self.insert(family);
        }

        Ok(())
    }
}

fn parse_family(name: &str, item: &Item) -> Result<DependencyFamily> {
    let table = item
        .as_table_like()
        .ok_or_else(|| SwitchError::Config(format!("families.{name} must be a table")))?;

    let git_url = table
        .get("git")
        .and_then(Item::as_str)
        .ok_or_else(|| SwitchError::Config(format!("families.{name}.git must be a string")))?;

    let supports_version = match table.get("supports-version") {
        Some(v) => v.as_bool().ok_or_else(|| {
            SwitchError::Config(format!("families.{name}.supports-version must be a boolean"))
        })?,
        None => false,
    };

    let crates = table
        .get("crates")
        .and_then(Item::as_table_like)
        .ok_or_else(|| SwitchError::Config(format!("families.{name}.crates must be a table")))?;

    let mut entries = Vec::new();
    for (crate_name, path) in crates.iter() {
        let path = path.as_str().ok_or_else(|| {
            SwitchError::Config(format!(
                "families.{name}.crates.{crate_name} must be a path string"
            ))
        })?;
        entries.push((crate_name.to_string(), path.to_string()));
    }

    if entries.is_empty() {
        return Err(SwitchError::Config(format!(
            "families.{name}.crates must list at least one crate"
        )));
    }

    Ok(DependencyFamily::new(name, git_url, supports_version, entries))
}

fn string_array(item: &Item, key: &str) -> Result<Vec<String>> {
    let array = item
        .as_array()
        .ok_or_else(|| SwitchError::Config(format!("{key} must be an array of strings")))?;
    array
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| SwitchError::Config(format!("{key} must be an array of strings")))
        })
        .collect()
}
