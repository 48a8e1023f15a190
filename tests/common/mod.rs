use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a platform-like tree with manifests under `packages/`.
#[allow(unused)]
pub fn create_test_tree() -> TempDir {
    let temp = TempDir::new().unwrap();

    write_manifest(
        temp.path(),
        "Cargo.toml",
        r#"[workspace]
members = ["packages/rs-dpp", "packages/rs-drive"]
resolver = "2"
"#,
    );

    write_manifest(
        temp.path(),
        "packages/rs-dpp/Cargo.toml",
        r#"[package]
name = "dpp"
version = "2.0.0"
edition = "2021"

[dependencies]
dashcore = { path = "../../../rust-dashcore/dash", features = ["std"], default-features = false }
# dashcore = { git = "https://github.com/dashpay/rust-dashcore", tag = "v0.39.0" }
key-wallet = { path = "../../../rust-dashcore/key-wallet", optional = true }
serde = { version = "1", features = ["derive"] }
"#,
    );

    write_manifest(
        temp.path(),
        "packages/rs-drive/Cargo.toml",
        r#"[package]
name = "drive"
version = "2.0.0"
edition = "2021"

[dependencies]
grovedb = "3.0.0"
grovedb-costs = { git = "https://github.com/dashpay/grovedb", branch = "develop", default-features = false }
dpp = { path = "../rs-dpp" }
"#,
    );

    temp
}

/// Writes `content` to `rel` below `root`, creating parent directories.
pub fn write_manifest(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

pub fn read_manifest(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap()
}

/// Helper to run a switch for `family` with mode arguments `mode`.
pub fn run_switch(root: &Path, family: &str, mode: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = cargo_bin_cmd!("dep-switch");
    cmd.arg("--family")
        .arg(family)
        .arg("--root")
        .arg(root)
        .args(mode)
        .env("NO_COLOR", "1")
        .current_dir(root);

    cmd.assert()
}
