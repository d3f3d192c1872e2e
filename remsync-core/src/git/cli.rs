use super::{
    Commit, parse_commit_log, parse_count, parse_ls_remote_heads,
    provider::GitProvider,
    runner::{CommandError, run_git, run_git_checked},
};
use crate::constants::{
    COMMIT_LOG_FORMAT, DEFAULT_NETWORK_TIMEOUT_SECS, HEADS_PREFIX, REMOTES_PREFIX,
};
use anyhow::{Context, Result, bail};
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

/// [`GitProvider`] backed by the `git` executable
pub struct CliGitProvider {
    root: PathBuf,
    network_timeout: Duration,
}

impl CliGitProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            network_timeout: Duration::from_secs(DEFAULT_NETWORK_TIMEOUT_SECS),
        }
    }

    /// Locate the working tree containing `dir`
    pub fn discover(dir: &Path) -> Result<Self> {
        let output = run_git(dir, &["rev-parse", "--show-toplevel"], None)?;
        let top = output.stdout.trim();
        if !output.success() || top.is_empty() {
            bail!("not a git repository: {}", dir.display());
        }
        Ok(Self::new(top))
    }

    /// Deadline for `ls-remote`, which talks to the network
    #[must_use]
    pub fn with_network_timeout(mut self, timeout: Duration) -> Self {
        self.network_timeout = timeout;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        Ok(run_git_checked(&self.root, args, None)?)
    }
}

impl GitProvider for CliGitProvider {
    fn list_remotes(&self) -> Result<Vec<String>> {
        let stdout = self.git(&["remote"])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn remote_url(&self, name: &str) -> Result<String> {
        let stdout = self
            .git(&["remote", "get-url", name])
            .with_context(|| format!("failed to read URL of remote '{name}'"))?;
        Ok(stdout.trim().to_string())
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.git(&["remote", "add", name, url])?;
        Ok(())
    }

    fn fetch(&self, remote: &str, timeout: Duration) -> Result<()> {
        run_git_checked(&self.root, &["fetch", remote], Some(timeout))
            .map_err(|e| e.relabel_timeout(format!("fetch from {remote}")))?;
        Ok(())
    }

    fn list_heads(&self, remote: &str, branch: Option<&str>) -> Result<Vec<String>> {
        let pattern = branch.map(|b| format!("{HEADS_PREFIX}{b}"));
        let mut args = vec!["ls-remote", "--heads", remote];
        if let Some(pattern) = pattern.as_deref() {
            args.push(pattern);
        }
        let stdout = run_git_checked(&self.root, &args, Some(self.network_timeout))
            .map_err(|e| e.relabel_timeout(format!("listing branches on {remote}")))?;
        Ok(parse_ls_remote_heads(&stdout))
    }

    fn resolve_ref(&self, remote: &str, branch: &str) -> Result<Option<String>> {
        let reference = format!("{REMOTES_PREFIX}{remote}/{branch}^{{commit}}");
        let args = ["rev-parse", "--verify", "--quiet", reference.as_str()];
        let output = run_git(&self.root, &args, None)?;
        let id = output.stdout.trim();
        if output.success() && !id.is_empty() {
            return Ok(Some(id.to_string()));
        }
        // --quiet exits 1 with no output when the ref does not exist
        if output.code == Some(1) && id.is_empty() {
            return Ok(None);
        }
        Err(CommandError::Failed {
            command: format!("git {}", args.join(" ")),
            code: output.code,
            output: output.combined(),
        }
        .into())
    }

    fn count_commits(&self, base: &str, tip: &str) -> Result<usize> {
        let range = format!("{base}..{tip}");
        let stdout = self.git(&["rev-list", "--count", &range])?;
        parse_count(&stdout)
    }

    fn log_between(&self, base: &str, tip: &str, limit: usize) -> Result<Vec<Commit>> {
        let format = format!("--format={COMMIT_LOG_FORMAT}");
        let max = format!("-n{limit}");
        let range = format!("{base}..{tip}");
        let stdout = self.git(&["log", &format, &max, &range])?;
        parse_commit_log(&stdout)
    }

    fn push(&self, remote: &str, source: &str, branch: &str, timeout: Duration) -> Result<()> {
        let refspec = format!("{source}:{HEADS_PREFIX}{branch}");
        run_git_checked(&self.root, &["push", remote, &refspec], Some(timeout))
            .map_err(|e| e.relabel_timeout(format!("push to {remote}")))?;
        Ok(())
    }

    fn current_branch(&self) -> Result<String> {
        let output = run_git(&self.root, &["symbolic-ref", "--quiet", "--short", "HEAD"], None)?;
        let name = output.stdout.trim();
        if output.success() && !name.is_empty() {
            return Ok(name.to_string());
        }
        if output.code == Some(1) {
            bail!("HEAD is detached; check out a branch first");
        }
        bail!("failed to determine current branch: {}", output.combined());
    }
}
