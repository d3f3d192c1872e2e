use remsync_core::config::APP_NAME;
use std::{path::PathBuf, str::FromStr};

const LOG_FILE_NAME: &str = "remsync.log";
const LOG_LEVEL_ENV: &str = "REMSYNC_LOG";

pub const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Warn;

pub fn cache_dir() -> Option<PathBuf> {
    if let Ok(xdg_cache_home) = std::env::var("XDG_CACHE_HOME")
        && !xdg_cache_home.is_empty()
    {
        return Some(PathBuf::from(xdg_cache_home).join(APP_NAME));
    }
    dirs::home_dir().map(|home| home.join(".cache").join(APP_NAME))
}

pub fn default_log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LOG_FILE_NAME))
}

/// Pick the level from the `--log-level` flag, then `REMSYNC_LOG`, then the default
pub fn resolve_level(flag: Option<&str>) -> anyhow::Result<log::LevelFilter> {
    let env = std::env::var(LOG_LEVEL_ENV).ok();
    resolve_level_from(flag, env.as_deref())
}

fn resolve_level_from(flag: Option<&str>, env: Option<&str>) -> anyhow::Result<log::LevelFilter> {
    match flag {
        Some(value) => log::LevelFilter::from_str(value.trim())
            .map_err(|_| anyhow::anyhow!("invalid log level '{value}'")),
        None => Ok(env
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .and_then(|value| log::LevelFilter::from_str(value).ok())
            .unwrap_or(DEFAULT_LOG_LEVEL)),
    }
}

pub fn setup_logging(level: log::LevelFilter) -> anyhow::Result<()> {
    if level == log::LevelFilter::Off {
        return Ok(());
    }
    let log_file = default_log_file()
        .ok_or_else(|| anyhow::anyhow!("unable to determine a cache directory for the log file"))?;
    if let Some(parent) = log_file.parent() {
        std::fs::create_dir_all(parent)?;
    }
    simple_log::file(log_file.to_string_lossy().into_owned(), level, 10, 10)
        .map_err(|e| anyhow::anyhow!(e))?;
    log::info!("remsync logging initialised (level={level})");
    Ok(())
}
