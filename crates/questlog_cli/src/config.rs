//! Runtime configuration for the CLI.
//!
//! Precedence: command-line flag, then environment variable (both handled by
//! clap), then the platform data directory.

use clap::Args;
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "questlog";
const DB_FILE_NAME: &str = "questlog.sqlite3";
const LOG_DIR_NAME: &str = "logs";

/// Global options shared by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// SQLite file holding the saved progress
    #[arg(long, global = true, env = "QUESTLOG_DB_PATH")]
    pub db: Option<PathBuf>,
    /// Directory for rolling log files
    #[arg(long, global = true, env = "QUESTLOG_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, env = "QUESTLOG_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl CliConfig {
    /// Resolves missing options against the platform data directory.
    pub fn resolve(args: &GlobalArgs) -> Self {
        Self::resolve_with(args, &default_app_dir(), &current_dir())
    }

    fn resolve_with(args: &GlobalArgs, app_dir: &Path, cwd: &Path) -> Self {
        let db_path = args
            .db
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .map(|path| absolutize(path, cwd))
            .unwrap_or_else(|| app_dir.join(DB_FILE_NAME));
        let log_dir = args
            .log_dir
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
            .map(|path| absolutize(path, cwd))
            .unwrap_or_else(|| app_dir.join(LOG_DIR_NAME));
        let log_level = args
            .log_level
            .as_deref()
            .map(str::trim)
            .filter(|level| !level.is_empty())
            .unwrap_or(questlog_core::default_log_level())
            .to_string();

        Self {
            db_path,
            log_dir,
            log_level,
        }
    }
}

fn default_app_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::env::temp_dir())
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
