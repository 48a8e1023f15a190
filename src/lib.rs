//! Switch a family of Cargo dependencies between local checkouts, git
//! revisions, git branches and published versions across every manifest in a
//! directory tree.
//!
//! ```text
//! dep-switch --family grovedb local
//! dep-switch --family dashcore rev 4b825dc642cb6eb9a060e54bf8d69288fbee4904
//! dep-switch --family dashcore branch v0.40-dev
//! dep-switch --family grovedb version 4.0.0
//! dep-switch --family dashcore main_branch_latest
//! ```

pub mod cli;
pub mod error;
pub mod family;
pub mod fs;
pub mod git;
pub mod manifest;
pub mod source;
pub mod steps;

pub use error::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> Result<()> {
    use clap::Parser;

    let cli = cli::SwitchCli::parse();
    init_logging(cli.args.verbose);
    steps::execute(cli.args, cli.command)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
