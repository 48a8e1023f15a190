use crate::source::SourceMode;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dep-switch", version, about)]
pub struct SwitchCli {
    #[command(flatten)]
    pub args: SwitchArgs,

    #[command(subcommand)]
    pub command: ModeCommand,
}

#[derive(Parser, Debug, Clone)]
pub struct SwitchArgs {
    /// Dependency family to switch (e.g. dashcore, grovedb)
    #[arg(long, short = 'f', value_name = "FAMILY")]
    pub family: Option<String>,

    /// Directory to search for Cargo.toml files
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// TOML file adding or overriding dependency families
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show which manifests would change without writing them
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Seconds to wait for the remote when resolving the latest commit
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout: u64,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(long, short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ModeCommand {
    /// Point every crate of the family at its local checkout
    Local,

    /// Pin every crate of the family to a git revision
    Rev {
        /// Commit hash or other git revision
        revision: String,
    },

    /// Track a git branch
    Branch {
        /// Branch name
        branch: String,
    },

    /// Use a published version
    Version {
        /// Version requirement, e.g. 4.0.0
        version: String,
    },

    /// Pin to the current head of the remote's default branch
    #[command(name = "main_branch_latest", alias = "latest")]
    MainBranchLatest,

    /// List configured families and their crates
    Families,
}

impl ModeCommand {
    /// Source mode for the commands that map directly onto one.
    pub fn source_mode(&self) -> Option<SourceMode> {
        match self {
            ModeCommand::Local => Some(SourceMode::Local),
            ModeCommand::Rev { revision } => Some(SourceMode::Revision(revision.clone())),
            ModeCommand::Branch { branch } => Some(SourceMode::Branch(branch.clone())),
            ModeCommand::Version { version } => Some(SourceMode::Version(version.clone())),
            ModeCommand::MainBranchLatest | ModeCommand::Families => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rev() {
        let cli = SwitchCli::parse_from(["dep-switch", "-f", "dashcore", "rev", "abc123"]);
        assert_eq!(cli.args.family.as_deref(), Some("dashcore"));
        assert_eq!(
            cli.command.source_mode(),
            Some(SourceMode::Revision("abc123".into()))
        );
    }

    #[test]
    fn test_parse_latest_alias() {
        let cli = SwitchCli::parse_from(["dep-switch", "--family", "grovedb", "latest"]);
        assert!(matches!(cli.command, ModeCommand::MainBranchLatest));
        let cli = SwitchCli::parse_from(["dep-switch", "-f", "grovedb", "main_branch_latest"]);
        assert!(matches!(cli.command, ModeCommand::MainBranchLatest));
    }

    #[test]
    fn test_defaults() {
        let cli = SwitchCli::parse_from(["dep-switch", "families"]);
        assert_eq!(cli.args.root, PathBuf::from("."));
        assert_eq!(cli.args.timeout, 30);
        assert!(!cli.args.dry_run);
        assert_eq!(cli.args.verbose, 0);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        SwitchCli::command().debug_assert();
    }
}
