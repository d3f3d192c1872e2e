use remsync_core::{
    Commit, ComparisonResult, Remote, RemoteBranch,
    catalog::{BranchCatalog, RemoteCatalog},
    compare::ComparisonEngine,
    config::Config,
    git::{GitProvider, validate_branch_name},
};
use serde::Serialize;
use std::fmt::Write;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Clone)]
pub struct CliError {
    message: String,
    code: i32,
}

impl CliError {
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 1,
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 2,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i32 {
        self.code
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(value: anyhow::Error) -> Self {
        Self::system(format!("{value:#}"))
    }
}

#[derive(Debug, Clone)]
pub struct StatusArgs {
    pub branch: Option<String>,
    pub json: bool,
    pub no_fetch: bool,
}

#[derive(Debug, Serialize)]
struct BranchOutput<'a> {
    name: &'a str,
    remotes: Vec<&'a str>,
}

/// The one or two remotes a session works with. Zero or three-plus is an operator error.
pub fn session_remotes(git: &dyn GitProvider) -> CliResult<(Remote, Option<Remote>)> {
    let mut remotes = RemoteCatalog::new(git).list()?;
    if remotes.len() > 2 {
        let mut message = format!(
            "Found {} remotes, but remsync works with at most 2:",
            remotes.len()
        );
        for remote in &remotes {
            let _ = write!(message, "\n  - {}: {}", remote.name, remote.url);
        }
        return Err(CliError::user(message));
    }

    let second = if remotes.len() == 2 { remotes.pop() } else { None };
    let Some(first) = remotes.pop() else {
        return Err(CliError::user(
            "No git remotes found. You need at least one remote. Add one with:\n  \
             git remote add origin <url>",
        ));
    };
    Ok((first, second))
}

fn require_two_remotes(git: &dyn GitProvider) -> CliResult<(Remote, Remote)> {
    match session_remotes(git)? {
        (a, Some(b)) => Ok((a, b)),
        (a, None) => Err(CliError::user(format!(
            "Only one remote found ({}). Add a second one with:\n  git remote add <name> <url>",
            a.name
        ))),
    }
}

fn fetch_both(git: &dyn GitProvider, config: &Config, a: &str, b: &str) -> CliResult<()> {
    let timeout = config.git.network_timeout();
    for remote in [a, b] {
        git.fetch(remote, timeout)
            .map_err(|e| CliError::system(format!("Fetch failed: {e:#}")))?;
    }
    Ok(())
}

fn push_commit_lines(out: &mut String, remote: &str, commits: &[Commit], hidden: usize) {
    if commits.is_empty() {
        return;
    }
    let _ = writeln!(out, "\n{remote}:");
    for commit in commits {
        let _ = writeln!(out, "  {} {}", commit.short_id, commit.summary);
    }
    if hidden > 0 {
        let _ = writeln!(out, "  ... and {hidden} more");
    }
}

/// Header line followed by each side's unique commits
pub fn format_status(result: &ComparisonResult, remote_a: &str, remote_b: &str) -> String {
    let mut out = format!(
        "Branch: {} | {}\n",
        result.branch,
        result.describe(remote_a, remote_b)
    );
    push_commit_lines(
        &mut out,
        remote_a,
        &result.unique_a,
        result.ahead_a.saturating_sub(result.unique_a.len()),
    );
    push_commit_lines(
        &mut out,
        remote_b,
        &result.unique_b,
        result.ahead_b.saturating_sub(result.unique_b.len()),
    );
    out
}

pub fn cmd_status(config: &Config, git: &dyn GitProvider, args: &StatusArgs) -> CliResult<()> {
    let (a, b) = require_two_remotes(git)?;
    let branch = match &args.branch {
        Some(branch) => {
            validate_branch_name(branch).map_err(|e| CliError::user(e.to_string()))?;
            branch.clone()
        }
        None => git.current_branch()?,
    };

    if !args.no_fetch {
        fetch_both(git, config, &a.name, &b.name)?;
    }

    let result = ComparisonEngine::new(git)
        .with_commit_limit(config.git.commit_limit)
        .compare(&a.name, &b.name, &branch)?;

    if args.json {
        print_json(&result)?;
    } else {
        print!("{}", format_status(&result, &a.name, &b.name));
    }
    Ok(())
}

fn branch_output<'a>(branch: &'a RemoteBranch, a: &'a str, b: &'a str) -> BranchOutput<'a> {
    let remotes = [(branch.on_a, a), (branch.on_b, b)]
        .into_iter()
        .filter_map(|(present, name)| present.then_some(name))
        .collect();
    BranchOutput {
        name: &branch.name,
        remotes,
    }
}

pub fn format_branch_lines(branches: &[RemoteBranch], a: &str, b: &str) -> String {
    let mut out = String::new();
    for branch in branches {
        let marker = if branch.on_both() {
            "both"
        } else if branch.on_a {
            a
        } else {
            b
        };
        let _ = writeln!(out, "{} [{marker}]", branch.name);
    }
    out
}

pub fn cmd_branches(git: &dyn GitProvider, json: bool) -> CliResult<()> {
    let (a, b) = require_two_remotes(git)?;
    let branches = BranchCatalog::new(git).list_merged(&a.name, &b.name)?;

    if json {
        let output: Vec<BranchOutput> = branches
            .iter()
            .map(|branch| branch_output(branch, &a.name, &b.name))
            .collect();
        print_json(&output)?;
    } else {
        print!("{}", format_branch_lines(&branches, &a.name, &b.name));
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!(
        "{}",
        serde_json::to_string(value).map_err(|e| CliError::system(e.to_string()))?
    );
    Ok(())
}

pub fn print_error(error: &CliError, json: bool) {
    if json {
        let payload = serde_json::json!({ "error": error.message() });
        eprintln!("{payload}");
    } else {
        eprintln!("Error: {}", error.message());
    }
}
