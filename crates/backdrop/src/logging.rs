//! File logging. The terminal belongs to the UI, so log lines go to
//! `<data_local_dir>/backdrop.log`.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing::Level;

const LOG_FILE: &str = "backdrop.log";

/// Where the log file lives, if the platform has a data directory.
pub fn log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "backdrop").map(|dirs| dirs.data_local_dir().join(LOG_FILE))
}

/// Parse a level name, falling back to `info`.
pub fn parse_level(level: &str) -> Level {
    Level::from_str(level.trim()).unwrap_or(Level::INFO)
}

fn open(path: &Path) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Logging stays off when the file cannot be opened.
pub fn init(level: &str) {
    let Some(path) = log_path() else {
        return;
    };
    let Ok(file) = open(&path) else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_max_level(parse_level(level))
        .with_ansi(false)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level(" WARN "), Level::WARN);
        assert_eq!(parse_level("chatty"), Level::INFO);
    }
}
