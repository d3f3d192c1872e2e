use crate::constants::COMMAND_POLL_INTERVAL_MS;
use std::{
    fmt,
    io::{self, Read},
    path::Path,
    process::{Child, Command, Stdio},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

const GIT: &str = "git";

/// Why a git invocation did not produce usable output
#[derive(Debug)]
pub enum CommandError {
    /// The process could not be started at all
    Spawn { command: String, source: io::Error },
    /// The process ran and exited unsuccessfully
    Failed {
        command: String,
        code: Option<i32>,
        output: String,
    },
    /// The process outlived its deadline and was killed
    TimedOut { operation: String, after: Duration },
}

impl CommandError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }

    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Failed { code, .. } => *code,
            _ => None,
        }
    }

    /// Replace the operation label of a timeout, leaving other errors untouched
    #[must_use]
    pub fn relabel_timeout(self, operation: impl Into<String>) -> Self {
        match self {
            Self::TimedOut { after, .. } => Self::TimedOut {
                operation: operation.into(),
                after,
            },
            other => other,
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { command, source } => write!(f, "failed to run {command}: {source}"),
            Self::Failed {
                command,
                code,
                output,
            } => {
                if !output.is_empty() {
                    write!(f, "{output}")
                } else if let Some(code) = code {
                    write!(f, "{command} exited with status {code}")
                } else {
                    write!(f, "{command} was terminated by a signal")
                }
            }
            Self::TimedOut { operation, after } => write!(
                f,
                "{operation} timed out after {} seconds",
                after.as_secs()
            ),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Captured result of a process that ran to completion
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Trimmed stdout followed by trimmed stderr, as a user would see them in a terminal
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (true, _) => stderr.to_string(),
            (false, true) => stdout.to_string(),
            (false, false) => format!("{stdout}\n{stderr}"),
        }
    }
}

/// Run `git <args>` in `dir`. A non-zero exit is not an error at this level.
pub fn run_git(
    dir: &Path,
    args: &[&str],
    timeout: Option<Duration>,
) -> Result<CommandOutput, CommandError> {
    run_program(GIT, dir, args, timeout)
}

/// Run `git <args>` in `dir` and return stdout, treating a non-zero exit as failure
pub fn run_git_checked(
    dir: &Path,
    args: &[&str],
    timeout: Option<Duration>,
) -> Result<String, CommandError> {
    let output = run_git(dir, args, timeout)?;
    if output.success() {
        Ok(output.stdout)
    } else {
        Err(CommandError::Failed {
            command: describe(GIT, args),
            code: output.code,
            output: output.combined(),
        })
    }
}

fn describe(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{program} {}", args.join(" "))
    }
}

fn run_program(
    program: &str,
    dir: &Path,
    args: &[&str],
    timeout: Option<Duration>,
) -> Result<CommandOutput, CommandError> {
    let command = describe(program, args);
    log::debug!("running `{command}` in {}", dir.display());

    let mut child = Command::new(program)
        .args(args)
        .current_dir(dir)
        // A credential prompt would block forever with the terminal in raw mode
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| CommandError::Spawn {
            command: command.clone(),
            source,
        })?;

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let status = match timeout {
        Some(limit) => wait_with_deadline(&mut child, limit).map_err(|e| match e {
            WaitError::Io(source) => CommandError::Spawn {
                command: command.clone(),
                source,
            },
            WaitError::Expired => {
                log::warn!("`{command}` killed after {}s", limit.as_secs());
                CommandError::TimedOut {
                    operation: command.clone(),
                    after: limit,
                }
            }
        })?,
        None => child.wait().map_err(|source| CommandError::Spawn {
            command: command.clone(),
            source,
        })?,
    };

    Ok(CommandOutput {
        code: status.code(),
        stdout: collect(stdout),
        stderr: collect(stderr),
    })
}

enum WaitError {
    Io(io::Error),
    Expired,
}

fn wait_with_deadline(
    child: &mut Child,
    limit: Duration,
) -> Result<std::process::ExitStatus, WaitError> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().map_err(WaitError::Io)? {
            return Ok(status);
        }
        if start.elapsed() >= limit {
            let _ = child.kill();
            let _ = child.wait();
            return Err(WaitError::Expired);
        }
        thread::sleep(Duration::from_millis(COMMAND_POLL_INTERVAL_MS));
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}
