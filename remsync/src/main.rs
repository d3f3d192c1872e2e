mod cli;
mod logging;

use anyhow::Result;
use clap::{Parser, Subcommand};
use remsync_core::{
    AppState, config,
    git::{CliGitProvider, GitProvider},
};
use remsync_tui::{SessionSettings, Theme};
use std::{path::PathBuf, process::ExitCode, sync::Arc};

use crate::cli::{CliError, CliResult};

#[derive(Parser)]
#[command(version, about = "Compare and reconcile a branch across two git remotes")]
struct Cli {
    /// Override path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug or trace (overrides REMSYNC_LOG)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch both remotes and print how a branch compares between them
    Status {
        /// Branch to compare (defaults to the current branch)
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        json: bool,
        /// Compare the existing remote-tracking refs without fetching
        #[arg(long)]
        no_fetch: bool,
    },
    /// List branches found on either remote
    Branches {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_errors = command_wants_json(cli.command.as_ref());

    match run(cli) {
        Ok(()) => ExitCode::from(0),
        Err(error) => {
            log::error!("{}", error.message());
            cli::print_error(&error, json_errors);
            let code: u8 = match error.code() {
                1 => 1,
                _ => 2,
            };
            ExitCode::from(code)
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let level =
        logging::resolve_level(cli.log_level.as_deref()).map_err(|e| CliError::user(e.to_string()))?;
    let config = config::load_config(cli.config.as_deref())
        .map_err(|e| CliError::system(format!("{e:#}")))?;
    if let Err(e) = logging::setup_logging(level) {
        eprintln!("Warning: logging disabled: {e:#}");
    }

    let git = open_repository(&config)?;

    match cli.command {
        Some(Commands::Status {
            branch,
            json,
            no_fetch,
        }) => {
            let args = cli::StatusArgs {
                branch,
                json,
                no_fetch,
            };
            cli::cmd_status(&config, git.as_ref(), &args)
        }
        Some(Commands::Branches { json }) => cli::cmd_branches(git.as_ref(), json),
        None => {
            let (remote_a, remote_b) = cli::session_remotes(git.as_ref())?;
            let branch = git.current_branch()?;
            run_tui(&config, &git, AppState::new(remote_a, remote_b, branch))
                .map_err(CliError::from)
        }
    }
}

/// Find the repository containing the working directory
fn open_repository(config: &config::Config) -> CliResult<Arc<dyn GitProvider>> {
    let cwd = std::env::current_dir()
        .map_err(|e| CliError::system(format!("cannot read working directory: {e}")))?;
    let cwd = dunce::canonicalize(&cwd).unwrap_or(cwd);
    let provider = CliGitProvider::discover(&cwd)
        .map_err(|e| CliError::user(format!("{e:#}")))?
        .with_network_timeout(config.git.network_timeout());
    log::info!("using repository at {}", provider.root().display());
    Ok(Arc::new(provider))
}

fn run_tui(config: &config::Config, git: &Arc<dyn GitProvider>, mut state: AppState) -> Result<()> {
    let theme = Theme::from_config(&config.theme);
    let settings = SessionSettings::from_config(&config.git);

    let mut terminal = if should_disable_alt_screen() {
        // Inline viewport keeps drawing in the primary screen buffer, which makes
        // terminal captures usable for automation/debugging.
        ratatui::init_with_options(ratatui::TerminalOptions {
            viewport: ratatui::Viewport::Inline(30),
        })
    } else {
        ratatui::init()
    };
    let result = remsync_tui::run(&mut terminal, &mut state, git, &theme, &settings);
    ratatui::restore();
    result
}

fn command_wants_json(command: Option<&Commands>) -> bool {
    match command {
        Some(Commands::Status { json, .. } | Commands::Branches { json }) => *json,
        None => false,
    }
}

fn should_disable_alt_screen() -> bool {
    match std::env::var("REMSYNC_NO_ALT_SCREEN") {
        Ok(value) => {
            let value = value.trim().to_ascii_lowercase();
            !matches!(value.as_str(), "" | "0" | "false" | "no" | "off")
        }
        Err(_) => false,
    }
}
