//! Remote reference lookups through the `git` command line client.
//!
//! Only two questions are ever asked of a remote: which branch `HEAD` points
//! at, and which commit a branch points at. Both are answered by
//! `git ls-remote`, so no clone or network library is needed.

use crate::error::{Result, SwitchError};
use regex::Regex;
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Default bound on a single `git ls-remote` invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Read-only view of a remote repository's references.
pub trait RemoteRefs {
    /// Name of the branch the remote `HEAD` points at.
    fn default_branch(&self, url: &str) -> Result<String>;

    /// Commit hash at the tip of `branch`.
    fn branch_head(&self, url: &str, branch: &str) -> Result<String>;
}

/// Branch and commit resolved for `main_branch_latest`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestRef {
    pub branch: String,
    pub commit: String,
}

/// Resolves the default branch of `url` and the commit at its tip.
pub fn resolve_latest(refs: &dyn RemoteRefs, url: &str) -> Result<LatestRef> {
    let branch = refs.default_branch(url)?;
    log::debug!("Default branch of {} is '{}'", url, branch);
    let commit = refs.branch_head(url, &branch)?;
    log::info!("Resolved {} {} -> {}", url, branch, commit);
    Ok(LatestRef { branch, commit })
}

/// [`RemoteRefs`] backed by a `git` subprocess.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    timeout: Duration,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl GitCli {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: "git".to_string(),
            timeout,
        }
    }

    /// Uses `program` instead of `git` from `PATH`.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn ls_remote(&self, args: &[&str]) -> Result<String> {
        let describe = || format!("{} ls-remote {}", self.program, args.join(" "));
        log::debug!("Running {}", describe());

        let mut child = Command::new(&self.program)
            .arg("ls-remote")
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SwitchError::RemoteResolution(format!("{}: {}", describe(), e)))?;

        // Drain both pipes on their own threads so a chatty child cannot block.
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if Instant::now() >= deadline => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(SwitchError::RemoteResolution(format!(
                        "{} timed out after {}s",
                        describe(),
                        self.timeout.as_secs()
                    )));
                }
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        let stdout = join_reader(stdout);
        let stderr = join_reader(stderr);

        if !status.success() {
            return Err(SwitchError::RemoteResolution(format!(
                "{} failed ({}): {}",
                describe(),
                status,
                stderr.trim()
            )));
        }

        Ok(stdout)
    }
}

impl RemoteRefs for GitCli {
    fn default_branch(&self, url: &str) -> Result<String> {
        let output = self.ls_remote(&["--symref", url, "HEAD"])?;
        parse_default_branch(&output)?.ok_or_else(|| {
            SwitchError::RemoteResolution(format!("no symbolic HEAD reported for {url}"))
        })
    }

    fn branch_head(&self, url: &str, branch: &str) -> Result<String> {
        let reference = format!("refs/heads/{branch}");
        let output = self.ls_remote(&[url, &reference])?;
        parse_ref_commit(&output, &reference).ok_or_else(|| {
            SwitchError::RemoteResolution(format!("branch '{branch}' not found on {url}"))
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<thread::JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Extracts the branch from `git ls-remote --symref <url> HEAD` output.
///
/// ```text
/// ref: refs/heads/master	HEAD
/// 4b825dc642cb6eb9a060e54bf8d69288fbee4904	HEAD
/// ```
fn parse_default_branch(output: &str) -> Result<Option<String>> {
    let pattern = Regex::new(r"(?m)^ref:\s+refs/heads/(\S+)\s+HEAD\s*$")?;
    Ok(pattern
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()))
}

/// Finds the commit listed for `reference` in `git ls-remote` output.
fn parse_ref_commit(output: &str, reference: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut parts = line.split_whitespace();
        let hash = parts.next()?;
        let name = parts.next()?;
        (name == reference && is_commit_hash(hash)).then(|| hash.to_string())
    })
}

fn is_commit_hash(value: &str) -> bool {
    matches!(value.len(), 40 | 64) && value.chars().all(|c| c.is_ascii_hexdigit())
}
