pub mod action;
pub mod catalog;
pub mod compare;
pub mod config;
pub mod constants;
pub mod event;
pub mod git;
pub mod state;
pub mod sync;

// Re-export commonly used types at crate root
pub use action::Action;
pub use compare::{ComparisonResult, SyncStatus};
pub use config::Config;
pub use event::AppEvent;
pub use git::{Commit, GitProvider, Remote, RemoteBranch};
pub use state::{AppState, Mode};
pub use sync::SyncDirection;
