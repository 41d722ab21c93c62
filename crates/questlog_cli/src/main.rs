//! Questlog command-line front end.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the state database.
//! - Dispatch one action per invocation and print the views it affects.

mod config;
mod render;

use clap::{Parser, Subcommand};
use config::{CliConfig, GlobalArgs};
use log::info;
use questlog_core::db::{open_db, DbError};
use questlog_core::{
    init_logging, ActionOutcome, IntensityKey, ProgressService, ServiceError,
    SqliteStateRepository, STATE_BACKUP_KEY,
};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "questlog", version, about = "Turn daily tasks into XP, levels and gems")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show level, XP progress and gems
    Status,
    /// Change the profile name (blank restores the default)
    Rename { name: String },
    /// Manage your own repeatable tasks
    Task {
        #[command(subcommand)]
        action: TaskAction,
    },
    /// Complete built-in routines
    Routine {
        #[command(subcommand)]
        action: RoutineAction,
    },
    /// Spend gems
    Shop {
        #[command(subcommand)]
        action: ShopAction,
    },
    /// Show the most recent rewards
    History,
    /// Write all progress to a JSON file
    Export {
        /// Target file or directory; `-` prints to stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace all progress with a previously exported file
    Import { file: PathBuf },
    /// Erase all progress
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum TaskAction {
    /// Add a task
    Add {
        title: String,
        /// light|moderate|intense|epic
        #[arg(long, default_value = "light")]
        intensity: IntensityKey,
    },
    /// List tasks
    List,
    /// Complete a task once (it stays in the list)
    Done { id: String },
    /// Delete a task
    Delete { id: String },
}

#[derive(Subcommand)]
enum RoutineAction {
    /// List routines
    List,
    /// Complete a routine once
    Done { id: String },
}

#[derive(Subcommand)]
enum ShopAction {
    /// List shop items
    List,
    /// Buy an item
    Buy { id: String },
}

#[derive(Debug)]
enum CliError {
    Db(DbError),
    Service(ServiceError),
    Io { path: PathBuf, source: std::io::Error },
    ResetNotConfirmed,
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "cannot open progress database: {err}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::ResetNotConfirmed => {
                write!(f, "reset erases all progress; re-run with --yes to confirm")
            }
        }
    }
}

impl Error for CliError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Service(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::ResetNotConfirmed => None,
        }
    }
}

impl From<DbError> for CliError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

fn main() {
    let cli = Cli::parse();
    let config = CliConfig::resolve(&cli.global);

    if let Err(err) = init_logging(&config.log_level, &config.log_dir.to_string_lossy()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    if let Err(err) = run(cli.command, &config) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(command: Command, config: &CliConfig) -> Result<(), CliError> {
    let conn = open_db(&config.db_path)?;
    let mut service = ProgressService::new(SqliteStateRepository::new(&conn));
    info!(
        "event=cli_start module=cli status=ok db_path={}",
        config.db_path.display()
    );
    if service.store().backed_up_unreadable() {
        eprintln!(
            "warning: saved progress could not be read; starting fresh. \
             The unreadable copy is kept under `{STATE_BACKUP_KEY}`."
        );
    }

    match command {
        Command::Status => print!("{}", render::profile(service.state())),
        Command::Rename { name } => {
            let outcome = service.rename_profile(&name);
            report(&outcome);
            print!("{}", render::profile(service.state()));
        }
        Command::Task { action } => run_task(&mut service, action)?,
        Command::Routine { action } => match action {
            RoutineAction::List => print!("{}", render::routines(service.state())),
            RoutineAction::Done { id } => {
                let outcome = service.complete_routine(&id);
                if !outcome.changed {
                    eprintln!("no routine with id `{id}`");
                }
                report(&outcome);
                print!("{}", render::profile(service.state()));
            }
        },
        Command::Shop { action } => match action {
            ShopAction::List => print!("{}", render::shop(service.state())),
            ShopAction::Buy { id } => {
                let outcome = service.purchase(&id)?;
                report(&outcome);
                print!("{}", render::profile(service.state()));
            }
        },
        Command::History => print!("{}", render::history(service.state())),
        Command::Export { out } => {
            let today = chrono::Local::now().date_naive();
            let document = service.export_state(today)?;
            match out.as_deref() {
                Some(path) if path == Path::new("-") => println!("{}", document.contents),
                other => {
                    let target = export_target(other, &document.file_name);
                    std::fs::write(&target, &document.contents).map_err(|source| {
                        CliError::Io {
                            path: target.clone(),
                            source,
                        }
                    })?;
                    println!("Exported to {}", target.display());
                }
            }
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file).map_err(|source| CliError::Io {
                path: file.clone(),
                source,
            })?;
            let outcome = service.import_state(&text)?;
            report(&outcome);
            print!("{}", render::profile(service.state()));
        }
        Command::Reset { yes } => {
            if !yes {
                return Err(CliError::ResetNotConfirmed);
            }
            let outcome = service.reset_state();
            report(&outcome);
            print!("{}", render::profile(service.state()));
        }
    }
    Ok(())
}

fn run_task(
    service: &mut ProgressService<SqliteStateRepository<'_>>,
    action: TaskAction,
) -> Result<(), CliError> {
    match action {
        TaskAction::Add { title, intensity } => {
            let outcome = service.add_task(&title, intensity)?;
            report(&outcome);
            print!("{}", render::tasks(service.state()));
        }
        TaskAction::List => print!("{}", render::tasks(service.state())),
        TaskAction::Done { id } => {
            let outcome = service.complete_task(&id);
            if !outcome.changed {
                eprintln!("no task with id `{id}`");
            }
            report(&outcome);
            print!("{}", render::profile(service.state()));
        }
        TaskAction::Delete { id } => {
            let outcome = service.delete_task(&id);
            report(&outcome);
            print!("{}", render::tasks(service.state()));
        }
    }
    Ok(())
}

fn report(outcome: &ActionOutcome) {
    print!("{}", render::notices(&outcome.notices));
}

fn export_target(out: Option<&Path>, file_name: &str) -> PathBuf {
    match out {
        Some(path) if path.is_dir() => path.join(file_name),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::{export_target, Cli};
    use clap::CommandFactory;
    use std::path::{Path, PathBuf};

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn export_target_joins_directories_and_keeps_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            export_target(Some(dir.path()), "questlog-2026-10-17.json"),
            dir.path().join("questlog-2026-10-17.json")
        );
        assert_eq!(
            export_target(Some(Path::new("/tmp/backup.json")), "x.json"),
            PathBuf::from("/tmp/backup.json")
        );
        assert_eq!(
            export_target(None, "questlog-2026-10-17.json"),
            PathBuf::from("questlog-2026-10-17.json")
        );
    }
}
