use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub(crate) const DATA_ENV: &str = "BUDGET_TRACKER_DATA";
pub(crate) const LOG_ENV: &str = "BUDGET_TRACKER_LOG";

/// Where the CSV snapshot lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) data_dir: PathBuf,
}

impl Config {
    /// Pull the global `--data <dir>` flag out of `args`, then resolve the
    /// data directory from it, the environment, or the platform default.
    pub(crate) fn from_args(args: &mut Vec<String>) -> Result<Self> {
        let flag = take_flag(args, "--data")?;
        Self::resolve(flag, std::env::var(DATA_ENV).ok())
    }

    pub(crate) fn resolve(flag: Option<String>, env: Option<String>) -> Result<Self> {
        let explicit = flag.or(env).filter(|dir| !dir.trim().is_empty());
        let data_dir = match explicit {
            Some(dir) => PathBuf::from(shellexpand(dir.trim())),
            None => default_data_dir()?,
        };
        Ok(Self { data_dir })
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "budget-tracker", "BudgetTracker")
        .context("Could not determine data directory")?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

/// Remove `name <value>` from `args` and return the value.
pub(crate) fn take_flag(args: &mut Vec<String>, name: &str) -> Result<Option<String>> {
    let Some(pos) = args.iter().position(|a| a == name) else {
        return Ok(None);
    };
    if pos + 1 >= args.len() {
        anyhow::bail!("Missing value for {name}");
    }
    let value = args.remove(pos + 1);
    args.remove(pos);
    Ok(Some(value))
}

/// Remove a bare `name` switch from `args`; true when it was present.
pub(crate) fn take_switch(args: &mut Vec<String>, name: &str) -> bool {
    match args.iter().position(|a| a == name) {
        Some(pos) => {
            args.remove(pos);
            true
        }
        None => false,
    }
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

/// Compact log lines on stderr; `BUDGET_TRACKER_LOG` takes an `EnvFilter`
/// directive and defaults to `warn`.
pub(crate) fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
