use crate::{
    constants::DEFAULT_COMMIT_LIMIT,
    git::{Commit, GitProvider},
};
use anyhow::{Context, Result};
use serde::Serialize;

/// How one branch relates across the two remotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    InSync,
    AheadA,
    AheadB,
    Diverged,
    BranchMissing,
}

/// Outcome of one comparison. Replaced wholesale by the next compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub branch: String,
    pub status: SyncStatus,
    pub ahead_a: usize,
    pub ahead_b: usize,
    pub tip_a: Option<String>,
    pub tip_b: Option<String>,
    pub has_branch_a: bool,
    pub has_branch_b: bool,
    /// Newest first, at most the commit limit
    pub unique_a: Vec<Commit>,
    pub unique_b: Vec<Commit>,
}

impl ComparisonResult {
    /// One-line summary for the header, naming the remotes
    pub fn describe(&self, remote_a: &str, remote_b: &str) -> String {
        match self.status {
            SyncStatus::InSync => format!("✓ {remote_a} and {remote_b} are in sync"),
            SyncStatus::AheadA => format!(
                "→ {remote_a} has {} commit(s) ahead of {remote_b}",
                self.ahead_a
            ),
            SyncStatus::AheadB => format!(
                "← {remote_b} has {} commit(s) ahead of {remote_a}",
                self.ahead_b
            ),
            SyncStatus::Diverged => format!(
                "⚠ Diverged: {remote_a} has {}, {remote_b} has {} unique commits",
                self.ahead_a, self.ahead_b
            ),
            SyncStatus::BranchMissing => match (self.has_branch_a, self.has_branch_b) {
                (false, false) => {
                    format!("✗ Branch doesn't exist on {remote_a} or {remote_b}")
                }
                (false, true) => format!(
                    "✗ Branch missing on {remote_a}. Press 'b' then 'c' to create it."
                ),
                _ => format!("✗ Branch missing on {remote_b}. Press 'b' then 'c' to create it."),
            },
        }
    }

    /// Whether the listed commits for the ahead side stop short of its count
    pub fn is_truncated(&self) -> bool {
        match self.status {
            SyncStatus::AheadA => self.unique_a.len() < self.ahead_a,
            SyncStatus::AheadB => self.unique_b.len() < self.ahead_b,
            _ => false,
        }
    }
}

/// Compares one branch between two remotes using their remote-tracking refs
pub struct ComparisonEngine<'a> {
    git: &'a dyn GitProvider,
    commit_limit: usize,
}

impl<'a> ComparisonEngine<'a> {
    pub fn new(git: &'a dyn GitProvider) -> Self {
        Self {
            git,
            commit_limit: DEFAULT_COMMIT_LIMIT,
        }
    }

    #[must_use]
    pub fn with_commit_limit(mut self, limit: usize) -> Self {
        self.commit_limit = limit;
        self
    }

    pub fn compare(&self, remote_a: &str, remote_b: &str, branch: &str) -> Result<ComparisonResult> {
        let (tip_a, tip_b) = match (
            self.git.resolve_ref(remote_a, branch),
            self.git.resolve_ref(remote_b, branch),
        ) {
            (Ok(a), Ok(b)) => (a, b),
            (Err(e), Ok(b)) => {
                log::warn!("failed to resolve {remote_a}/{branch}, treating as absent: {e:#}");
                (None, b)
            }
            (Ok(a), Err(e)) => {
                log::warn!("failed to resolve {remote_b}/{branch}, treating as absent: {e:#}");
                (a, None)
            }
            (Err(e), Err(_)) => {
                return Err(e).with_context(|| {
                    format!("failed to resolve {branch} on {remote_a} and {remote_b}")
                });
            }
        };

        let mut result = ComparisonResult {
            branch: branch.to_string(),
            status: SyncStatus::BranchMissing,
            ahead_a: 0,
            ahead_b: 0,
            has_branch_a: tip_a.is_some(),
            has_branch_b: tip_b.is_some(),
            tip_a,
            tip_b,
            unique_a: Vec::new(),
            unique_b: Vec::new(),
        };

        let (Some(a), Some(b)) = (result.tip_a.clone(), result.tip_b.clone()) else {
            log::debug!(
                "{branch} missing: on {remote_a}={} on {remote_b}={}",
                result.has_branch_a,
                result.has_branch_b
            );
            return Ok(result);
        };

        if a == b {
            result.status = SyncStatus::InSync;
            return Ok(result);
        }

        // Neither count can be derived from the other: diverged histories have
        // commits on both sides that the other lacks
        let ahead_a = self
            .git
            .count_commits(&b, &a)
            .with_context(|| format!("failed to count commits ahead for {remote_a}"))?;
        let ahead_b = self
            .git
            .count_commits(&a, &b)
            .with_context(|| format!("failed to count commits ahead for {remote_b}"))?;
        result.ahead_a = ahead_a;
        result.ahead_b = ahead_b;

        result.status = match (ahead_a, ahead_b) {
            (0, 0) => {
                log::warn!(
                    "{branch}: tips differ ({a} vs {b}) but neither side has unique commits; reporting diverged"
                );
                SyncStatus::Diverged
            }
            (_, 0) => {
                result.unique_a = self
                    .git
                    .log_between(&b, &a, self.commit_limit)
                    .with_context(|| format!("failed to list commits ahead for {remote_a}"))?;
                SyncStatus::AheadA
            }
            (0, _) => {
                result.unique_b = self
                    .git
                    .log_between(&a, &b, self.commit_limit)
                    .with_context(|| format!("failed to list commits ahead for {remote_b}"))?;
                SyncStatus::AheadB
            }
            _ => SyncStatus::Diverged,
        };
        Ok(result)
    }
}
