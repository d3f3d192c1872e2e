use remsync_core::{
    catalog::{BranchCatalog, RemoteCatalog},
    compare::{ComparisonEngine, ComparisonResult},
    constants::REMOTES_PREFIX,
    event::AppEvent,
    git::GitProvider,
    sync::SyncExecutor,
};
use std::{
    sync::{Arc, atomic::Ordering},
    thread,
    time::Duration,
};

use super::EventSender;

/// Render an error with its context chain for the status line
fn describe(e: &anyhow::Error) -> String {
    format!("{e:#}")
}

/// Fetch `remote_a`, then `remote_b` only if the first succeeded
pub(super) fn spawn_fetch(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    remote_a: String,
    remote_b: String,
    timeout: Duration,
) {
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.cancel.load(Ordering::Relaxed) {
            return;
        }
        let result = git
            .fetch(&remote_a, timeout)
            .and_then(|()| git.fetch(&remote_b, timeout))
            .map_err(|e| describe(&e));
        sender.send(AppEvent::FetchCompleted(result));
    });
}

pub(super) fn spawn_compare(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    remote_a: String,
    remote_b: String,
    branch: String,
    commit_limit: usize,
) {
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.cancel.load(Ordering::Relaxed) {
            return;
        }
        let result = ComparisonEngine::new(git.as_ref())
            .with_commit_limit(commit_limit)
            .compare(&remote_a, &remote_b, &branch)
            .map_err(|e| describe(&e));
        sender.send(AppEvent::CompareCompleted(result));
    });
}

pub(super) fn spawn_sync(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    comparison: ComparisonResult,
    remote_a: String,
    remote_b: String,
    timeout: Duration,
) {
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.cancel.load(Ordering::Relaxed) {
            return;
        }
        let result = SyncExecutor::new(git.as_ref())
            .with_timeout(timeout)
            .sync_from(&comparison, &remote_a, &remote_b)
            .map_err(|e| describe(&e));
        sender.send(AppEvent::SyncCompleted(result));
    });
}

pub(super) fn spawn_add_remote(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    name: String,
    url: String,
) {
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.cancel.load(Ordering::Relaxed) {
            return;
        }
        let result = RemoteCatalog::new(git.as_ref())
            .add(&name, &url)
            .map_err(|e| describe(&e));
        sender.send(AppEvent::RemoteAdded(result));
    });
}

pub(super) fn spawn_branch_loading(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    remote_a: String,
    remote_b: String,
) {
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.cancel.load(Ordering::Relaxed) {
            return;
        }
        let result = BranchCatalog::new(git.as_ref())
            .list_merged(&remote_a, &remote_b)
            .map_err(|e| describe(&e));
        sender.send(AppEvent::BranchesLoaded(result));
    });
}

/// Push `source`'s tracking ref of `branch` to `target` as a new branch
pub(super) fn spawn_branch_creation(
    git: &Arc<dyn GitProvider>,
    sender: &EventSender,
    target: String,
    source: String,
    branch: String,
    timeout: Duration,
) {
    let git = Arc::clone(git);
    let sender = sender.clone();
    thread::spawn(move || {
        if sender.cancel.load(Ordering::Relaxed) {
            return;
        }
        let source_ref = format!("{REMOTES_PREFIX}{source}/{branch}");
        let result = BranchCatalog::new(git.as_ref())
            .create_on_remote(&target, &branch, &source_ref, timeout)
            .map_err(|e| describe(&e));
        sender.send(AppEvent::BranchCreated {
            branch,
            remote: target,
            result,
        });
    });
}
