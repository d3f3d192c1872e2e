use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

fn remsync_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_remsync"))
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn commit_file(dir: &Path, name: &str, message: &str) {
    fs::write(dir.join(name), message).unwrap();
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", message]);
}

/// A working repository on `main` with bare remotes `alpha` and `beta`, both at the
/// same initial commit
struct TestEnv {
    tmp: tempfile::TempDir,
    work: PathBuf,
}

impl TestEnv {
    fn new() -> Self {
        let tmp = tempfile::tempdir().unwrap();
        let work = tmp.path().join("work");
        fs::create_dir_all(&work).unwrap();

        git(&work, &["init", "--quiet"]);
        git(&work, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        git(&work, &["config", "user.email", "test@test.com"]);
        git(&work, &["config", "user.name", "Test"]);
        commit_file(&work, "README.md", "init");

        let env = Self { tmp, work };
        env.add_bare_remote("alpha");
        env.add_bare_remote("beta");
        git(&env.work, &["push", "--quiet", "alpha", "main"]);
        git(&env.work, &["push", "--quiet", "beta", "main"]);
        env
    }

    fn add_bare_remote(&self, name: &str) {
        let bare = self.tmp.path().join(format!("{name}.git"));
        git(self.tmp.path(), &["init", "--quiet", "--bare", bare.to_str().unwrap()]);
        git(&self.work, &["remote", "add", name, bare.to_str().unwrap()]);
    }

    fn run_in(&self, dir: &Path, args: &[&str]) -> Output {
        Command::new(remsync_binary())
            .args(args)
            .current_dir(dir)
            .env("XDG_CONFIG_HOME", self.tmp.path().join("config"))
            .env("XDG_CACHE_HOME", self.tmp.path().join("cache"))
            .env("GIT_CEILING_DIRECTORIES", self.tmp.path())
            .env_remove("REMSYNC_LOG")
            .output()
            .unwrap()
    }

    fn run(&self, args: &[&str]) -> Output {
        self.run_in(&self.work, args)
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_status_in_sync() {
    let env = TestEnv::new();
    let output = env.run(&["status"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "Branch: main | ✓ alpha and beta are in sync\n"
    );
}

#[test]
fn test_status_reports_ahead_commits() {
    let env = TestEnv::new();
    commit_file(&env.work, "feature.txt", "add feature");
    git(&env.work, &["push", "--quiet", "alpha", "main"]);

    let output = env.run(&["status"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("Branch: main | → alpha has 1 commit(s) ahead of beta\n"));
    assert!(text.contains("alpha:\n"));
    assert!(text.contains(" add feature\n"));
}

#[test]
fn test_status_json_shape() {
    let env = TestEnv::new();
    commit_file(&env.work, "one.txt", "one");
    commit_file(&env.work, "two.txt", "two");
    git(&env.work, &["push", "--quiet", "beta", "main"]);

    let output = env.run(&["status", "--json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["branch"], "main");
    assert_eq!(json["status"], "ahead_b");
    assert_eq!(json["ahead_b"], 2);
    assert_eq!(json["unique_b"][0]["summary"], "two");
    assert_eq!(json["unique_a"].as_array().unwrap().len(), 0);
}

#[test]
fn test_status_no_fetch_uses_existing_tracking_refs() {
    let env = TestEnv::new();
    git(&env.work, &["fetch", "--quiet", "alpha"]);
    git(&env.work, &["fetch", "--quiet", "beta"]);
    commit_file(&env.work, "late.txt", "late");
    git(&env.work, &["push", "--quiet", "alpha", "main"]);
    // The push updated alpha's tracking ref, but beta has not been fetched again
    let output = env.run(&["status", "--no-fetch"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("alpha has 1 commit(s) ahead of beta"));
}

#[test]
fn test_status_missing_branch() {
    let env = TestEnv::new();
    git(&env.work, &["push", "--quiet", "alpha", "main:refs/heads/topic"]);

    let output = env.run(&["status", "--branch", "topic"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("✗ Branch missing on beta"));
}

#[test]
fn test_branches_lists_availability() {
    let env = TestEnv::new();
    git(&env.work, &["push", "--quiet", "beta", "main:refs/heads/feature"]);

    let output = env.run(&["branches"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "feature [beta]\nmain [both]\n");

    let output = env.run(&["branches", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            { "name": "feature", "remotes": ["beta"] },
            { "name": "main", "remotes": ["alpha", "beta"] },
        ])
    );
}

#[test]
fn test_no_remotes_is_user_error() {
    let env = TestEnv::new();
    git(&env.work, &["remote", "remove", "alpha"]);
    git(&env.work, &["remote", "remove", "beta"]);

    let output = env.run(&["status"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("git remote add origin <url>"));
}

#[test]
fn test_too_many_remotes_lists_them() {
    let env = TestEnv::new();
    env.add_bare_remote("gamma");

    let output = env.run(&["branches"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Found 3 remotes"));
    assert!(err.contains("  - gamma: "));
}

#[test]
fn test_single_remote_json_error() {
    let env = TestEnv::new();
    git(&env.work, &["remote", "remove", "beta"]);

    let output = env.run(&["branches", "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_str(stderr(&output).trim()).unwrap();
    assert!(json["error"].as_str().unwrap().contains("Only one remote found"));
}

#[test]
fn test_outside_repository_is_user_error() {
    let env = TestEnv::new();
    let elsewhere = env.tmp.path().join("elsewhere");
    fs::create_dir_all(&elsewhere).unwrap();

    let output = env.run_in(&elsewhere, &["status"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("not a git repository"));
}

#[test]
fn test_invalid_config_is_system_error() {
    let env = TestEnv::new();
    let config = env.tmp.path().join("bad.toml");
    fs::write(&config, "[git]\ncommit_limit = 0\n").unwrap();

    let output = env.run(&["--config", config.to_str().unwrap(), "status"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_explicit_config_is_error() {
    let env = TestEnv::new();
    let output = env.run(&["--config", "/nonexistent/remsync.toml", "branches"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Config file not found"));
}
