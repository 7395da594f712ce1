#[cfg(debug_assertions)]
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use simplelog::{CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, WriteLogger};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::SettingsError;

const LOG_TARGET_PREFIX: &str = "updraft";

/// Append-only log that reopens its path when the file is deleted underneath
/// it, e.g. by a user clearing the data directory.
struct ReopeningLog {
    path: PathBuf,
    file: File,
}

impl ReopeningLog {
    fn open(path: PathBuf) -> io::Result<Self> {
        let file = open_for_append(&path)?;
        Ok(Self { path, file })
    }

    fn reopen_if_missing(&mut self) -> io::Result<()> {
        if !self.path.exists() {
            self.file = open_for_append(&self.path)?;
        }
        Ok(())
    }
}

impl Write for ReopeningLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.reopen_if_missing()?;
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn open_for_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Drop the older half of the log once it grows past `max_bytes`, cutting at
/// a line boundary. Returns whether anything was removed.
fn trim_to_recent_half(path: &Path, max_bytes: u64) -> io::Result<bool> {
    let len = match std::fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(error) => return Err(error),
    };
    if len <= max_bytes {
        return Ok(false);
    }

    let contents = std::fs::read(path)?;
    let half = contents.len() / 2;
    let keep_from = contents[half..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(half, |pos| half + pos + 1);
    std::fs::write(path, &contents[keep_from..])?;
    Ok(true)
}

/// Install the process-wide logger writing to `log_path`.
///
/// A logger installed earlier in the process is kept; only the level is
/// reapplied.
pub(crate) fn install(
    log_path: &Path,
    debug_enabled: bool,
    max_bytes: u64,
) -> Result<(), SettingsError> {
    let trimmed = trim_to_recent_half(log_path, max_bytes)
        .map_err(|error| SettingsError::io("failed to trim log file", error))?;
    let writer = ReopeningLog::open(log_path.to_path_buf())
        .map_err(|error| SettingsError::io("failed to open log file", error))?;

    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str(LOG_TARGET_PREFIX)
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    #[cfg(debug_assertions)]
    loggers.push(TermLogger::new(
        LevelFilter::Debug,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));

    loggers.push(WriteLogger::new(LevelFilter::Debug, config, writer));

    let fresh = CombinedLogger::init(loggers).is_ok();
    set_logging_enabled(debug_enabled);

    if fresh {
        log::info!("Logging to {}", log_path.display());
    } else {
        log::debug!("Logger already installed, keeping it");
    }
    if trimmed {
        log::debug!("Trimmed log file above {max_bytes} bytes");
    }
    Ok(())
}

pub(crate) fn set_logging_enabled(enabled: bool) {
    log::set_max_level(if enabled {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Off
    });
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::{ReopeningLog, trim_to_recent_half};

    #[test]
    fn reopens_deleted_log_on_next_write() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("nested").join("debug.log");
        let mut log = ReopeningLog::open(log_path.clone()).expect("log should open");

        log.write_all(b"before\n").expect("first write should succeed");
        std::fs::remove_file(&log_path).expect("log file should be removable");
        log.write_all(b"after\n").expect("write should reopen the file");

        let contents = std::fs::read_to_string(&log_path).expect("log should be readable");
        assert_eq!(contents, "after\n");
    }

    #[test]
    fn oversized_log_keeps_recent_lines() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("debug.log");
        std::fs::write(&log_path, "check-1\ncheck-2\ncheck-3\ncheck-4\ncheck-5\n")
            .expect("test log file should be written");

        assert!(trim_to_recent_half(&log_path, 10).expect("trim should succeed"));

        let trimmed = std::fs::read_to_string(&log_path).expect("log should be readable");
        assert!(!trimmed.contains("check-1"));
        assert!(trimmed.ends_with("check-5\n"));
        assert!(trimmed.starts_with("check-"), "cut lands on a line boundary");
    }

    #[test]
    fn small_or_missing_log_is_left_alone() {
        let temp_dir = tempfile::tempdir().expect("temporary directory should be created");
        let log_path = temp_dir.path().join("debug.log");

        assert!(!trim_to_recent_half(&log_path, 1024).expect("missing file is fine"));

        std::fs::write(&log_path, "short\n").expect("test log file should be written");
        assert!(!trim_to_recent_half(&log_path, 1024).expect("trim should succeed"));
        assert_eq!(
            std::fs::read_to_string(&log_path).expect("log should be readable"),
            "short\n"
        );
    }
}
