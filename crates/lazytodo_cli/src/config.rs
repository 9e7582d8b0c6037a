//! CLI runtime configuration.
//!
//! # Responsibility
//! - Resolve data file, log directory and log level from flags/env.
//! - Supply per-platform defaults when nothing is given.

use anyhow::{Context, Result};
use std::env::consts::OS;
use std::env::var;
use std::path::{Path, PathBuf};

pub const APP_DIR_NAME: &str = "lazytodo";
pub const DATA_FILE_NAME: &str = "lazytodo.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub data_file: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl CliConfig {
    /// Fills unset values with defaults and makes paths absolute.
    pub fn resolve(
        data_file: Option<PathBuf>,
        log_dir: Option<PathBuf>,
        log_level: Option<String>,
    ) -> Result<Self> {
        let base = platform_data_dir().join(APP_DIR_NAME);
        let data_file = absolutize(data_file.unwrap_or_else(|| base.join(DATA_FILE_NAME)))?;
        let log_dir = match log_dir {
            Some(dir) => absolutize(dir)?,
            None => data_file
                .parent()
                .map_or_else(|| base.join("logs"), |parent| parent.join("logs")),
        };
        Ok(Self {
            data_file,
            log_dir,
            log_level: log_level
                .unwrap_or_else(|| lazytodo_core::default_log_level().to_string()),
        })
    }
}

/// `%LOCALAPPDATA%`, `~/Library/Application Support`, or `~/.local/share`.
fn platform_data_dir() -> PathBuf {
    let home = || var("HOME").unwrap_or_else(|_| ".".into());
    match OS {
        "windows" => PathBuf::from(var("LOCALAPPDATA").unwrap_or_else(|_| ".".into())),
        "macos" => Path::new(&home()).join("Library").join("Application Support"),
        _ => Path::new(&home()).join(".local").join("share"),
    }
}

fn absolutize(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = std::env::current_dir().context("failed to read current directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::CliConfig;
    use std::path::PathBuf;

    #[test]
    fn log_dir_defaults_next_to_data_file() {
        let config =
            CliConfig::resolve(Some(PathBuf::from("/tmp/todo/data.sqlite3")), None, None)
                .unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/tmp/todo/logs"));
        assert_eq!(config.log_level, lazytodo_core::default_log_level());
    }

    #[test]
    fn relative_paths_become_absolute() {
        let config = CliConfig::resolve(
            Some(PathBuf::from("data.sqlite3")),
            Some(PathBuf::from("logs")),
            Some("warn".to_string()),
        )
        .unwrap();
        assert!(config.data_file.is_absolute());
        assert!(config.log_dir.is_absolute());
        assert_eq!(config.log_level, "warn");
    }
}
