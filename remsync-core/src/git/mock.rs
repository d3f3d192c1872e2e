use super::{Commit, provider::GitProvider};
use anyhow::{Result, anyhow};
use std::{
    collections::{HashMap, HashSet},
    sync::Mutex,
    time::Duration,
};

/// Scriptable in-memory [`GitProvider`].
///
/// Tips are keyed by `(remote, branch)`, counts and logs by `(base, tip)`. One-shot
/// results (`*_result`) are consumed by the next call and default to `Ok(())`.
#[derive(Default)]
pub struct MockGitProvider {
    pub remotes: Mutex<Vec<(String, String)>>,
    pub heads: HashMap<String, Vec<String>>,
    pub tips: HashMap<(String, String), String>,
    pub counts: HashMap<(String, String), usize>,
    pub logs: HashMap<(String, String), Vec<Commit>>,
    pub current_branch: Option<String>,
    /// Remotes whose ref resolution fails outright (as opposed to "branch absent")
    pub resolve_errors: HashSet<String>,
    pub count_error: Option<String>,
    pub log_error: Option<String>,
    pub list_heads_error: Option<String>,
    pub fetch_results: Mutex<HashMap<String, Result<()>>>,
    pub push_result: Mutex<Option<Result<()>>>,
    pub add_remote_result: Mutex<Option<Result<()>>>,
    pub fetch_calls: Mutex<Vec<String>>,
    /// `(remote, source, branch)` per push
    pub push_calls: Mutex<Vec<(String, String, String)>>,
    pub count_calls: Mutex<Vec<(String, String)>>,
    pub log_calls: Mutex<Vec<(String, String)>>,
}

impl MockGitProvider {
    /// Convenience for building a mock with `remote -> url` pairs
    pub fn with_remotes(remotes: &[(&str, &str)]) -> Self {
        Self {
            remotes: Mutex::new(
                remotes
                    .iter()
                    .map(|(n, u)| ((*n).to_string(), (*u).to_string()))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    pub fn set_tip(&mut self, remote: &str, branch: &str, id: &str) {
        self.tips
            .insert((remote.to_string(), branch.to_string()), id.to_string());
    }

    pub fn set_count(&mut self, base: &str, tip: &str, count: usize) {
        self.counts
            .insert((base.to_string(), tip.to_string()), count);
    }

    pub fn set_log(&mut self, base: &str, tip: &str, commits: Vec<Commit>) {
        self.logs.insert((base.to_string(), tip.to_string()), commits);
    }
}

impl GitProvider for MockGitProvider {
    fn list_remotes(&self) -> Result<Vec<String>> {
        Ok(self
            .remotes
            .lock()
            .unwrap()
            .iter()
            .map(|(n, _)| n.clone())
            .collect())
    }

    fn remote_url(&self, name: &str) -> Result<String> {
        self.remotes
            .lock()
            .unwrap()
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, u)| u.clone())
            .ok_or_else(|| anyhow!("No such remote '{name}'"))
    }

    fn add_remote(&self, name: &str, url: &str) -> Result<()> {
        self.add_remote_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or(Ok(()))?;
        self.remotes
            .lock()
            .unwrap()
            .push((name.to_string(), url.to_string()));
        Ok(())
    }

    fn fetch(&self, remote: &str, _timeout: Duration) -> Result<()> {
        self.fetch_calls.lock().unwrap().push(remote.to_string());
        self.fetch_results
            .lock()
            .unwrap()
            .remove(remote)
            .unwrap_or(Ok(()))
    }

    fn list_heads(&self, remote: &str, branch: Option<&str>) -> Result<Vec<String>> {
        if let Some(msg) = &self.list_heads_error {
            return Err(anyhow!(msg.clone()));
        }
        let heads = self.heads.get(remote).cloned().unwrap_or_default();
        Ok(match branch {
            Some(b) => heads.into_iter().filter(|h| h == b).collect(),
            None => heads,
        })
    }

    fn resolve_ref(&self, remote: &str, branch: &str) -> Result<Option<String>> {
        if self.resolve_errors.contains(remote) {
            return Err(anyhow!("fatal: unable to read refs for {remote}"));
        }
        Ok(self
            .tips
            .get(&(remote.to_string(), branch.to_string()))
            .cloned())
    }

    fn count_commits(&self, base: &str, tip: &str) -> Result<usize> {
        self.count_calls
            .lock()
            .unwrap()
            .push((base.to_string(), tip.to_string()));
        if let Some(msg) = &self.count_error {
            return Err(anyhow!(msg.clone()));
        }
        Ok(self
            .counts
            .get(&(base.to_string(), tip.to_string()))
            .copied()
            .unwrap_or(0))
    }

    fn log_between(&self, base: &str, tip: &str, limit: usize) -> Result<Vec<Commit>> {
        self.log_calls
            .lock()
            .unwrap()
            .push((base.to_string(), tip.to_string()));
        if let Some(message) = &self.log_error {
            return Err(anyhow!("{message}"));
        }
        let mut commits = self
            .logs
            .get(&(base.to_string(), tip.to_string()))
            .cloned()
            .unwrap_or_default();
        commits.truncate(limit);
        Ok(commits)
    }

    fn push(&self, remote: &str, source: &str, branch: &str, _timeout: Duration) -> Result<()> {
        self.push_calls.lock().unwrap().push((
            remote.to_string(),
            source.to_string(),
            branch.to_string(),
        ));
        self.push_result.lock().unwrap().take().unwrap_or(Ok(()))
    }

    fn current_branch(&self) -> Result<String> {
        self.current_branch
            .clone()
            .ok_or_else(|| anyhow!("HEAD is detached; check out a branch first"))
    }
}

/// Build a commit with just enough detail for tests
pub fn commit(id: &str, summary: &str) -> Commit {
    Commit {
        full_id: format!("{id:0<40}"),
        short_id: id.chars().take(7).collect(),
        summary: summary.to_string(),
        author: "Test".to_string(),
        timestamp: None,
        date_text: String::new(),
    }
}
