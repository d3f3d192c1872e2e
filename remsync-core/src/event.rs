use crate::{
    compare::ComparisonResult,
    git::{Remote, RemoteBranch},
    sync::SyncDirection,
};

/// Completion events sent by background tasks to the main loop.
/// Errors arrive pre-rendered since they only ever reach the status line.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Both remotes fetched (or the first failure)
    FetchCompleted(Result<(), String>),

    CompareCompleted(Result<ComparisonResult, String>),

    SyncCompleted(Result<SyncDirection, String>),

    RemoteAdded(Result<Remote, String>),

    /// Merged branch list of both remotes
    BranchesLoaded(Result<Vec<RemoteBranch>, String>),

    BranchCreated {
        branch: String,
        remote: String,
        result: Result<(), String>,
    },
}
