//! Staged manifest writes with rollback support.
//!
//! Every manifest changed by a switch is staged here first and written in a
//! single commit. A manifest is always written whole; if any write fails,
//! the manifests already written in the same commit are restored.
//!
//! ## Phases
//!
//! 1. **Build**: Stage rewritten content via `update_file()`
//! 2. **Validate**: Check files still exist and are writable
//! 3. **Execute**: Write files in staging order
//! 4. **Rollback** (on failure): Restore written files in LIFO order
//!
//! ## Example
//!
//! ```no_run
//! # use dep_switch::fs::Transaction;
//! # use std::path::PathBuf;
//! # fn example() -> dep_switch::error::Result<()> {
//! let mut txn = Transaction::new(false);
//! txn.update_file(
//!     PathBuf::from("Cargo.toml"),
//!     "[dependencies]\ngrovedb = \"4.0.0\"\n".into(),
//! )?;
//! txn.commit()?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, SwitchError};

use colored::Colorize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A staged manifest write.
#[derive(Debug, Clone)]
pub struct FileUpdate {
    pub path: PathBuf,
    original: String,
    new: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransactionState {
    /// Staging updates.
    Building,
    /// All writes succeeded.
    Committed,
    /// Writes were reverted after a failure.
    RolledBack,
    /// Validation failed; nothing written.
    Failed,
}

/// Transaction coordinating the manifest writes of one switch.
///
/// ## Dry-Run Mode
///
/// When `dry_run = true`, updates are staged and reported but never written.
#[must_use = "Transaction must be committed"]
pub struct Transaction {
    updates: Vec<FileUpdate>,
    dry_run: bool,
    state: TransactionState,
    written: usize,
}

impl Transaction {
    pub fn new(dry_run: bool) -> Self {
        Self {
            updates: Vec::new(),
            dry_run,
            state: TransactionState::Building,
            written: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    /// Returns true if successfully committed.
    pub fn is_committed(&self) -> bool {
        self.state == TransactionState::Committed
    }

    /// Paths of all staged updates, in staging order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.updates.iter().map(|u| u.path.as_path())
    }

    /// Stages a file update.
    ///
    /// Reads current content and compares to `new_content`. If identical,
    /// skips. Otherwise stages for commit.
    pub fn update_file(&mut self, path: PathBuf, new_content: String) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(SwitchError::Other(anyhow::anyhow!(
                "Cannot modify transaction after commit"
            )));
        }

        let original = fs::read_to_string(&path).map_err(|e| {
            SwitchError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read {}: {}", path.display(), e),
            ))
        })?;

        if original == new_content {
            log::debug!("Content unchanged, skipping: {}", path.display());
            return Ok(());
        }

        if self.dry_run {
            log::info!("Would update: {}", path.display());
        } else {
            log::debug!("Staging update for: {}", path.display());
        }

        self.updates.push(FileUpdate {
            path,
            original,
            new: new_content,
        });
        Ok(())
    }

    /// Checks every staged path once, still exists, and is writable.
    fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for update in &self.updates {
            let path = &update.path;
            if !seen.insert(path) {
                return Err(SwitchError::Other(anyhow::anyhow!(
                    "Duplicate file operation: {}",
                    path.display()
                )));
            }

            let metadata = fs::metadata(path).map_err(|e| {
                SwitchError::Io(std::io::Error::new(
                    e.kind(),
                    format!("File no longer exists: {}", path.display()),
                ))
            })?;

            if metadata.permissions().readonly() {
                return Err(SwitchError::Io(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!("File is read-only: {}", path.display()),
                )));
            }
        }

        Ok(())
    }

    /// Writes all staged updates.
    ///
    /// If a write fails, files already written are restored and the write
    /// error is returned.
    pub fn commit(&mut self) -> Result<()> {
        if self.state != TransactionState::Building {
            return Err(SwitchError::Other(anyhow::anyhow!(
                "Transaction already committed"
            )));
        }

        if self.dry_run {
            self.state = TransactionState::Committed;
            return Ok(());
        }

        if let Err(e) = self.validate() {
            self.state = TransactionState::Failed;
            return Err(e);
        }

        for idx in 0..self.updates.len() {
            let path = self.updates[idx].path.clone();
            if let Err(e) = fs::write(&path, &self.updates[idx].new) {
                let err = SwitchError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to write {}: {}", path.display(), e),
                ));
                log::error!("{}", err);
                self.rollback()?;
                return Err(err);
            }
            self.written += 1;
            log::debug!("Updated: {}", path.display());
        }

        self.state = TransactionState::Committed;
        Ok(())
    }

    /// Restores the files written so far, newest first.
    fn rollback(&mut self) -> Result<()> {
        let mut errors = Vec::new();

        for update in self.updates[..self.written].iter().rev() {
            if let Err(e) = fs::write(&update.path, &update.original) {
                errors.push(format!("Failed to restore {}: {}", update.path.display(), e));
            }
        }

        self.state = TransactionState::RolledBack;
        if errors.is_empty() {
            log::info!("Rollback completed");
            Ok(())
        } else {
            Err(SwitchError::RollbackFailed(errors.join("; ")))
        }
    }

    /// Prints the changed manifests to stdout.
    ///
    /// Paths are relative to `root` with forward slashes.
    pub fn print_summary(&self, root: &Path) {
        let mut paths: Vec<String> = self.paths().map(|p| display_path(p, root)).collect();
        paths.sort();

        let count = paths.len();
        let noun = if count == 1 { "file" } else { "files" };

        if self.dry_run {
            println!(
                "{:>12} {} {} would be modified",
                "Dry run".yellow().bold(),
                count.to_string().cyan().bold(),
                noun
            );
        } else {
            println!(
                "{:>12} {} {}",
                "Modified".green().bold(),
                count.to_string().cyan().bold(),
                noun
            );
        }

        for path in &paths {
            if self.dry_run {
                println!("   • {}", path.dimmed());
            } else {
                println!("   {} {}", "✓".green(), path);
            }
        }
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.state == TransactionState::Building && !self.updates.is_empty() && !self.dry_run {
            log::warn!("Transaction dropped without commit");
        }
    }
}

/// Formats `path` relative to `root` with forward slashes.
pub fn display_path(path: &Path, root: &Path) -> String {
    let relative = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());
    relative.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_commit_writes_changed_files() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.toml");
        let b = temp.path().join("b.toml");
        fs::write(&a, "old").unwrap();
        fs::write(&b, "same").unwrap();

        let mut txn = Transaction::new(false);
        txn.update_file(a.clone(), "new".into()).unwrap();
        txn.update_file(b.clone(), "same".into()).unwrap();
        assert_eq!(txn.len(), 1);

        txn.commit().unwrap();
        assert!(txn.is_committed());
        assert_eq!(fs::read_to_string(&a).unwrap(), "new");
        assert_eq!(fs::read_to_string(&b).unwrap(), "same");
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.toml");
        fs::write(&a, "old").unwrap();

        let mut txn = Transaction::new(true);
        txn.update_file(a.clone(), "new".into()).unwrap();
        txn.commit().unwrap();

        assert_eq!(txn.len(), 1);
        assert_eq!(fs::read_to_string(&a).unwrap(), "old");
    }

    #[test]
    fn test_duplicate_updates_rejected() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.toml");
        fs::write(&a, "old").unwrap();

        let mut txn = Transaction::new(false);
        txn.update_file(a.clone(), "one".into()).unwrap();
        txn.update_file(a.clone(), "two".into()).unwrap();

        assert!(txn.commit().is_err());
        assert_eq!(fs::read_to_string(&a).unwrap(), "old");
    }

    #[test]
    fn test_missing_file_fails_to_stage() {
        let temp = TempDir::new().unwrap();
        let mut txn = Transaction::new(false);
        let err = txn
            .update_file(temp.path().join("missing.toml"), "x".into())
            .unwrap_err();
        assert!(matches!(err, SwitchError::Io(_)));
    }

    #[test]
    fn test_failed_write_restores_written_files() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.toml");
        let d = temp.path().join("d.toml");
        fs::write(&a, "old").unwrap();
        fs::write(&d, "old").unwrap();

        let mut txn = Transaction::new(false);
        txn.update_file(a.clone(), "new".into()).unwrap();
        txn.update_file(d.clone(), "new".into()).unwrap();

        // Writing to a directory fails after a.toml was already written.
        fs::remove_file(&d).unwrap();
        fs::create_dir(&d).unwrap();

        let err = txn.commit().unwrap_err();
        assert!(err.to_string().contains("d.toml"), "{err}");
        assert!(!txn.is_committed());
        assert_eq!(fs::read_to_string(&a).unwrap(), "old");
    }

    #[test]
    fn test_no_update_after_commit() {
        let temp = TempDir::new().unwrap();
        let a = temp.path().join("a.toml");
        fs::write(&a, "old").unwrap();

        let mut txn = Transaction::new(false);
        txn.commit().unwrap();
        assert!(txn.update_file(a, "new".into()).is_err());
    }

    #[test]
    fn test_display_path() {
        let root = Path::new("/work");
        assert_eq!(
            display_path(Path::new("/work/packages/a/Cargo.toml"), root),
            "packages/a/Cargo.toml"
        );
    }
}
