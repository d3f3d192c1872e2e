use super::Commit;
use anyhow::Result;
use std::time::Duration;

/// The git operations remsync needs, scoped to one repository.
///
/// Refs passed to `count_commits` and `log_between` may be commit ids or any
/// revision git understands.
pub trait GitProvider: Send + Sync {
    fn list_remotes(&self) -> Result<Vec<String>>;
    fn remote_url(&self, name: &str) -> Result<String>;
    fn add_remote(&self, name: &str, url: &str) -> Result<()>;
    fn fetch(&self, remote: &str, timeout: Duration) -> Result<()>;
    /// Branch names advertised by `remote`, optionally restricted to one branch
    fn list_heads(&self, remote: &str, branch: Option<&str>) -> Result<Vec<String>>;
    /// Commit id of the remote-tracking ref, `None` if the branch is absent there
    fn resolve_ref(&self, remote: &str, branch: &str) -> Result<Option<String>>;
    /// Number of commits reachable from `tip` but not from `base`
    fn count_commits(&self, base: &str, tip: &str) -> Result<usize>;
    /// Up to `limit` commits in `base..tip`, newest first
    fn log_between(&self, base: &str, tip: &str, limit: usize) -> Result<Vec<Commit>>;
    /// Push `source` to `refs/heads/<branch>` on `remote`
    fn push(&self, remote: &str, source: &str, branch: &str, timeout: Duration) -> Result<()>;
    fn current_branch(&self) -> Result<String>;
}
