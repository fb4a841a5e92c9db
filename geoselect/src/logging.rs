//! Logging infrastructure for GeoSelect.
//!
//! Structured logging with a file sink and an optional console sink:
//! - Writes to `~/.geoselect/logs/geoselect.log` by default (cleared on session start)
//! - Optionally mirrors to stdout
//! - `info` by default, `debug` when requested, `RUST_LOG` overrides both

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Logging options.
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Log file path
    pub file: PathBuf,
    /// Mirror output to stdout
    pub stdout: bool,
    /// Default to `debug` instead of `info`
    pub debug: bool,
}

/// Create the log directory and truncate the log file.
///
/// Returns the (directory, file name) pair for the appender.
pub fn prepare_log_file(path: &Path) -> Result<(PathBuf, String), io::Error> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "log path has no file name"))?
        .to_string();

    fs::create_dir_all(&dir)?;
    fs::write(path, "")?;
    Ok((dir, name))
}

fn default_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("geoselect=debug,geoselect_cli=debug,info")
        } else {
            EnvFilter::new("info")
        }
    })
}

/// Initialize the global subscriber.
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the log file
/// cannot be cleared.
pub fn init_logging(options: &LoggingOptions) -> Result<LoggingGuard, io::Error> {
    let (dir, name) = prepare_log_file(&options.file)?;

    let file_appender = tracing_appender::rolling::never(dir, name);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);

    let stdout_layer = options.stdout.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stdout)
            .with_ansi(true)
            .compact()
    });

    tracing_subscriber::registry()
        .with(default_filter(options.debug))
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
