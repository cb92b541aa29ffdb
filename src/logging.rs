//! Log output setup for the command line
//!
//! Library code logs through the `log` and `tracing` facades; this installs a
//! `tracing-subscriber` console formatter that also receives `log` records,
//! plus an optional plain-text log file per run.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,chromiumoxide=warn";

/// Filter used with `--verbose` when `RUST_LOG` is unset
pub const VERBOSE_LOG_FILTER: &str = "debug,chromiumoxide=warn,tungstenite=warn";

/// Directory for run log files unless overridden
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Open a fresh `shelfwalk_<timestamp>.log` under `dir`, creating the directory.
///
/// Lines written through the returned writer reach disk on a background
/// thread; keep the guard alive until logging is done.
///
/// # Errors
///
/// If the directory cannot be created.
pub fn open_log_file(dir: &Path) -> anyhow::Result<(NonBlocking, WorkerGuard, PathBuf)> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
    let file_name = format!(
        "shelfwalk_{}.log",
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let path = dir.join(&file_name);
    let (writer, guard) = non_blocking(rolling::never(dir, file_name));
    Ok((writer, guard, path))
}

/// Install the global subscriber. `RUST_LOG` wins over `verbose`.
///
/// With `log_dir` set, every line also goes to a log file in that directory.
/// The returned guard must be held until exit or buffered lines are lost.
///
/// # Errors
///
/// If the log directory cannot be created or a global subscriber is already
/// installed.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    });

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let (writer, guard, _) = open_log_file(dir)?;
            let layer = fmt::Layer::new()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    Registry::default()
        .with(filter)
        .with(fmt::Layer::new().with_target(false))
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;
    Ok(guard)
}
