use crate::{
    compare::{ComparisonResult, SyncStatus},
    constants::{DEFAULT_NETWORK_TIMEOUT_SECS, REMOTES_PREFIX},
    git::GitProvider,
};
use anyhow::{Result, bail};
use serde::Serialize;
use std::time::Duration;

/// Which way commits flow when reconciling an ahead/behind pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncDirection {
    AToB,
    BToA,
}

impl SyncDirection {
    /// The only statuses that can be reconciled by a push are the two "ahead" ones
    pub fn from_status(status: SyncStatus) -> Option<Self> {
        match status {
            SyncStatus::AheadA => Some(Self::AToB),
            SyncStatus::AheadB => Some(Self::BToA),
            SyncStatus::InSync | SyncStatus::Diverged | SyncStatus::BranchMissing => None,
        }
    }

    /// `(source, destination)` remote names
    pub fn endpoints<'r>(self, remote_a: &'r str, remote_b: &'r str) -> (&'r str, &'r str) {
        match self {
            Self::AToB => (remote_a, remote_b),
            Self::BToA => (remote_b, remote_a),
        }
    }

    /// Number of commits the push will carry
    pub fn commit_count(self, result: &ComparisonResult) -> usize {
        match self {
            Self::AToB => result.ahead_a,
            Self::BToA => result.ahead_b,
        }
    }
}

/// Performs the single push that brings the behind remote up to the ahead one
pub struct SyncExecutor<'a> {
    git: &'a dyn GitProvider,
    timeout: Duration,
}

impl<'a> SyncExecutor<'a> {
    pub fn new(git: &'a dyn GitProvider) -> Self {
        Self {
            git,
            timeout: Duration::from_secs(DEFAULT_NETWORK_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn sync(
        &self,
        direction: SyncDirection,
        remote_a: &str,
        remote_b: &str,
        branch: &str,
    ) -> Result<()> {
        let (source, dest) = direction.endpoints(remote_a, remote_b);
        let source_ref = format!("{REMOTES_PREFIX}{source}/{branch}");
        log::info!("syncing {branch}: {source} -> {dest}");
        self.git.push(dest, &source_ref, branch, self.timeout)
    }

    /// Sync according to a comparison, refusing anything but an ahead status
    pub fn sync_from(
        &self,
        result: &ComparisonResult,
        remote_a: &str,
        remote_b: &str,
    ) -> Result<SyncDirection> {
        let Some(direction) = SyncDirection::from_status(result.status) else {
            bail!(
                "cannot sync {}: status is {:?}, expected one remote to be ahead",
                result.branch,
                result.status
            );
        };
        self.sync(direction, remote_a, remote_b, &result.branch)?;
        Ok(direction)
    }
}
