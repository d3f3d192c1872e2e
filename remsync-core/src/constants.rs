/// Maximum number of unique commits listed per side of a comparison
pub const DEFAULT_COMMIT_LIMIT: usize = 50;

/// Seconds a network-bound git command (fetch, push) may run before it is killed
pub const DEFAULT_NETWORK_TIMEOUT_SECS: u64 = 30;

/// `git log` format consumed by [`crate::git::parse_commit_log`]
pub const COMMIT_LOG_FORMAT: &str = "%H|%h|%s|%an|%ai";

/// Separator between fields of [`COMMIT_LOG_FORMAT`]
pub const COMMIT_FIELD_SEPARATOR: char = '|';

/// Date layout produced by `%ai`
pub const COMMIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

pub const HEADS_PREFIX: &str = "refs/heads/";
pub const REMOTES_PREFIX: &str = "refs/remotes/";

/// Interval at which a running command is checked against its deadline
pub const COMMAND_POLL_INTERVAL_MS: u64 = 25;
