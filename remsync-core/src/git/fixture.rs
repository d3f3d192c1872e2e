//! Throwaway repositories with two bare remotes for git-backed tests

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
    sync::atomic::{AtomicUsize, Ordering},
};

pub(crate) struct RemotePair {
    // Held so the directories outlive the test
    #[allow(dead_code)]
    pub tmp: tempfile::TempDir,
    pub work: PathBuf,
}

/// Run git in `dir`, panicking on failure, and return stdout
pub(crate) fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub(crate) fn init_test_repo(dir: &Path) {
    git(dir, &["init"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(dir, &["config", "user.email", "test@test.com"]);
    git(dir, &["config", "user.name", "Test"]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    commit(dir, "init");
}

/// Commit a fresh change and return its id
pub(crate) fn commit(dir: &Path, message: &str) -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    fs::write(dir.join(format!("file-{n}.txt")), message).unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", message]);
    git(dir, &["rev-parse", "HEAD"]).trim().to_string()
}

/// A work repo on `main` with `origin` and `upstream` bare remotes, both at the
/// same initial commit and already fetched
pub(crate) fn remote_pair() -> RemotePair {
    let tmp = tempfile::tempdir().unwrap();
    let work = tmp.path().join("work");
    fs::create_dir_all(&work).unwrap();
    for name in ["origin", "upstream"] {
        let bare = tmp.path().join(format!("{name}.git"));
        fs::create_dir_all(&bare).unwrap();
        git(&bare, &["init", "--bare"]);
    }
    init_test_repo(&work);
    for name in ["origin", "upstream"] {
        let url = tmp.path().join(format!("{name}.git"));
        git(&work, &["remote", "add", name, &url.to_string_lossy()]);
        git(&work, &["push", name, "main"]);
        git(&work, &["fetch", name]);
    }
    RemotePair { tmp, work }
}
