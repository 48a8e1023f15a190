//! Orchestration logic for switching a dependency family.
//!
//! Resolves the target source, rewrites every manifest below the root, and
//! writes all changed manifests through one `Transaction`.

use crate::cli::{ModeCommand, SwitchArgs};
use crate::error::{Result, SwitchError};
use crate::family::{DependencyFamily, Registry};
use crate::fs::transaction::Transaction;
use crate::git::{GitCli, LatestRef, RemoteRefs, resolve_latest};
use crate::manifest::{BlockScanner, ManifestFile, find_manifests};
use crate::source::SourceMode;

use colored::Colorize;
use std::path::Path;
use std::time::Duration;

pub fn execute(args: SwitchArgs, command: ModeCommand) -> Result<()> {
    let registry = Registry::load(args.config.as_deref())?;

    if let ModeCommand::Families = command {
        print_families(&registry);
        return Ok(());
    }

    let name = args.family.as_deref().ok_or_else(|| {
        SwitchError::Other(anyhow::anyhow!(
            "No dependency family given; pass --family (see `dep-switch families`)"
        ))
    })?;
    let family = registry.family(name)?;

    let git = GitCli::new(Duration::from_secs(args.timeout));
    let (mode, latest) = resolve_mode(&command, family, &git)?;

    log::info!(
        "Switching family '{}' to {} under {}",
        family.name,
        mode,
        args.root.display()
    );

    let mut txn = Transaction::new(args.dry_run);
    switch_tree(&args.root, &registry, family, &mode, &mut txn)?;

    txn.commit()?;

    if let Some(latest) = latest {
        println!(
            "{:>12} {} at {}",
            "Resolved".cyan().bold(),
            latest.branch.bold(),
            latest.commit
        );
    }

    txn.print_summary(&args.root);
    Ok(())
}

/// Turns a command into the source mode to apply.
///
/// `main_branch_latest` queries `refs` for the family's default branch and
/// its head commit and becomes a `rev` switch to that commit.
pub fn resolve_mode(
    command: &ModeCommand,
    family: &DependencyFamily,
    refs: &dyn RemoteRefs,
) -> Result<(SourceMode, Option<LatestRef>)> {
    let (mode, latest) = match command {
        ModeCommand::MainBranchLatest => {
            let latest = resolve_latest(refs, &family.git_url)?;
            (SourceMode::Revision(latest.commit.clone()), Some(latest))
        }
        other => {
            let mode = other.source_mode().ok_or_else(|| {
                SwitchError::Other(anyhow::anyhow!("{:?} is not a switch mode", other))
            })?;
            (mode, None)
        }
    };

    if matches!(mode, SourceMode::Version(_)) && !family.supports_version {
        return Err(SwitchError::UnsupportedMode {
            family: family.name.clone(),
            mode: mode.name().to_string(),
        });
    }

    Ok((mode, latest))
}

/// Stages a rewrite for every manifest below `root` that references `family`.
///
/// Returns the number of manifests staged.
pub fn switch_tree(
    root: &Path,
    registry: &Registry,
    family: &DependencyFamily,
    mode: &SourceMode,
    txn: &mut Transaction,
) -> Result<usize> {
    let scanner = BlockScanner::new(family.crate_names())?;
    let before = txn.len();
    let mut scanned = 0;

    for path in find_manifests(root, &registry.manifest_name, &registry.skip_dirs) {
        scanned += 1;
        let manifest = ManifestFile::read(&path)?;

        match manifest.switch(&scanner, family, mode) {
            Some(new_content) => txn.update_file(manifest.path, new_content)?,
            None => log::debug!("No changes needed for: {}", path.display()),
        }
    }

    let staged = txn.len() - before;
    log::info!("Scanned {} manifest(s), {} changed", scanned, staged);
    Ok(staged)
}

fn print_families(registry: &Registry) {
    for family in registry.families() {
        let version = if family.supports_version {
            "rev, branch, version".green()
        } else {
            "rev, branch".green()
        };
        println!(
            "{} {} ({})",
            family.name.bold(),
            family.git_url.dimmed(),
            version
        );
        for (name, path) in family.crates() {
            println!("   {} {}", name, path.dimmed());
        }
    }
}
