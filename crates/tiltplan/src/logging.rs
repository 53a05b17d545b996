//! File logging for the CLI
//!
//! The terminal carries the report itself, so diagnostics go to
//! `{log_dir}/tiltplan.log`. One previous log is kept as `tiltplan.log.1`.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the log file inside the log directory
pub const LOG_FILE: &str = "tiltplan.log";
/// Size at which the current log is moved aside (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;

fn backup_path(log_path: &Path) -> PathBuf {
    let mut name = log_path.as_os_str().to_owned();
    name.push(".1");
    PathBuf::from(name)
}

/// Move the log to its `.1` backup once it grows past `max_size`, replacing
/// any older backup. Returns whether the log was moved.
fn roll_over(log_path: &Path, max_size: u64) -> io::Result<bool> {
    let size = match fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if size <= max_size {
        return Ok(false);
    }
    fs::rename(log_path, backup_path(log_path))?;
    Ok(true)
}

/// Default directives when `RUST_LOG` is unset: the CLI at `level`, the
/// analysis core only when it has something to warn about.
fn default_directives(level: &str) -> String {
    format!("tiltplan={level},tiltplan_core=warn")
}

/// Send `tracing` output for this process to the log file under `log_dir`.
///
/// `RUST_LOG` takes precedence over `level` when it is set.
pub fn init_logging(log_dir: &Path, level: &str) -> color_eyre::Result<()> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(LOG_FILE);

    if let Err(e) = roll_over(&log_path, MAX_LOG_SIZE) {
        eprintln!("Warning: could not roll over {}: {e}", log_path.display());
    }
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .try_init()?;

    tracing::info!(log_path = %log_path.display(), "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_small_log_stays_in_place() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        fs::write(&path, "run 1\n").unwrap();

        assert!(!roll_over(&path, 1024).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "run 1\n");
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn test_large_log_replaces_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(LOG_FILE);
        let backup = dir.path().join("tiltplan.log.1");
        fs::write(&backup, "older run\n").unwrap();
        fs::write(&path, "x".repeat(64)).unwrap();

        assert!(roll_over(&path, 32).unwrap());
        assert!(!path.exists());
        assert_eq!(fs::read_to_string(&backup).unwrap(), "x".repeat(64));
    }

    #[test]
    fn test_missing_log_is_not_rolled() {
        let dir = tempdir().unwrap();
        assert!(!roll_over(&dir.path().join(LOG_FILE), 0).unwrap());
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives("debug"), "tiltplan=debug,tiltplan_core=warn");
        assert!(EnvFilter::try_new(default_directives("info")).is_ok());
    }
}
