pub mod cli;
#[cfg(test)]
pub(crate) mod fixture;
pub mod mock;
pub mod provider;
pub mod runner;

pub use cli::CliGitProvider;
pub use provider::GitProvider;
pub use runner::CommandError;

use crate::constants::{COMMIT_DATE_FORMAT, COMMIT_FIELD_SEPARATOR, HEADS_PREFIX};
use anyhow::{Result, bail};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// A configured remote
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

/// A commit as reported by `git log`. Identity is `full_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub full_id: String,
    pub short_id: String,
    pub summary: String,
    pub author: String,
    /// `None` when the date text could not be parsed
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub date_text: String,
}

/// A branch name and which of the two remotes carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteBranch {
    pub name: String,
    pub on_a: bool,
    pub on_b: bool,
}

impl RemoteBranch {
    pub fn on_both(&self) -> bool {
        self.on_a && self.on_b
    }

    pub fn on_exactly_one(&self) -> bool {
        self.on_a != self.on_b
    }
}

/// Parse `git ls-remote --heads` output into branch names
pub fn parse_ls_remote_heads(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let _sha = parts.next()?;
            let reference = parts.next()?;
            reference.strip_prefix(HEADS_PREFIX).map(String::from)
        })
        .collect()
}

/// Parse `git log --format=%H|%h|%s|%an|%ai` output, newest first as git emits it.
///
/// The summary may itself contain the separator, so the fixed fields are taken from
/// both ends of the record and whatever remains in the middle is the summary.
pub fn parse_commit_log(output: &str) -> Result<Vec<Commit>> {
    let mut commits = Vec::new();
    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(COMMIT_FIELD_SEPARATOR).collect();
        if fields.len() < 5 {
            bail!("malformed commit record: {line:?}");
        }
        let full_id = fields[0].trim();
        let short_id = fields[1].trim();
        if full_id.is_empty() || short_id.is_empty() {
            bail!("commit record without an id: {line:?}");
        }
        let n = fields.len();
        let date_text = fields[n - 1].trim();
        commits.push(Commit {
            full_id: full_id.to_string(),
            short_id: short_id.to_string(),
            summary: fields[2..n - 2].join(&COMMIT_FIELD_SEPARATOR.to_string()),
            author: fields[n - 2].to_string(),
            timestamp: parse_commit_date(date_text),
            date_text: date_text.to_string(),
        });
    }
    Ok(commits)
}

pub fn parse_commit_date(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_str(text.trim(), COMMIT_DATE_FORMAT).ok()
}

/// Parse the single integer printed by `git rev-list --count`
pub fn parse_count(output: &str) -> Result<usize> {
    let trimmed = output.trim();
    trimmed
        .parse::<usize>()
        .map_err(|_| anyhow::anyhow!("unexpected commit count output: {trimmed:?}"))
}

/// Reject branch names git would refuse (or misinterpret) as `refs/heads/<name>`
pub fn validate_branch_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("branch name cannot be empty");
    }
    if name.starts_with('.') || name.starts_with('-') {
        bail!("branch name cannot start with '{}'", &name[..1]);
    }
    if name.ends_with(".lock") {
        bail!("branch name cannot end with '.lock'");
    }
    if name.ends_with('/') || name.ends_with('.') {
        bail!("branch name cannot end with '{}'", &name[name.len() - 1..]);
    }
    for seq in ["..", "//", "@{"] {
        if name.contains(seq) {
            bail!("branch name cannot contain '{seq}'");
        }
    }
    if let Some(c) = name
        .chars()
        .find(|c| c.is_whitespace() || c.is_ascii_control())
    {
        bail!("branch name cannot contain whitespace or control characters ({c:?})");
    }
    if let Some(c) = name
        .chars()
        .find(|c| matches!(c, '~' | '^' | ':' | '?' | '*' | '[' | '\\'))
    {
        bail!("branch name cannot contain '{c}'");
    }
    Ok(())
}

pub fn validate_remote_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("remote name cannot be empty");
    }
    if name.starts_with('-') {
        bail!("remote name cannot start with '-'");
    }
    if name.chars().any(|c| c.is_whitespace() || c == '/') {
        bail!("remote name cannot contain whitespace or '/'");
    }
    Ok(())
}
