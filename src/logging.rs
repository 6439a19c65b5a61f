//! Logging setup for hosts embedding the import encoder.
//!
//! Writes structured events to a session log file and to stdout, filtered
//! through the `RUST_LOG` environment variable (default `info`). The log
//! file is truncated at session start so each import session reads clean.

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default directory for session logs.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default session log filename.
pub const DEFAULT_LOG_FILE: &str = "eagfx.log";

/// Keeps the non-blocking log writer alive.
///
/// Dropping the guard flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize dual file/stdout logging.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the previous
/// log file cannot be truncated.
pub fn init_logging(log_dir: &str, log_file: &str) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;

    // Truncate the previous session's log.
    fs::write(Path::new(log_dir).join(log_file), "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .compact();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .compact();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn unique_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        PathBuf::from(format!("test_logs_{}_{}", tag, nanos))
    }

    #[test]
    fn test_default_paths() {
        assert_eq!(DEFAULT_LOG_DIR, "logs");
        assert_eq!(DEFAULT_LOG_FILE, "eagfx.log");
    }

    // init_logging installs a process-global subscriber, so only the file
    // handling is unit-tested here.

    #[test]
    fn test_log_file_truncated_on_start() {
        let dir = unique_dir("truncate");
        fs::create_dir_all(&dir).unwrap();
        let file = dir.join("session.log");
        fs::write(&file, "stale entries").unwrap();

        fs::write(&file, "").unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_nested_log_dir_created() {
        let dir = unique_dir("nested").join("deep");
        fs::create_dir_all(&dir).unwrap();
        assert!(dir.exists());

        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }
}
