//! CLI entry point for tasklist.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tasklist_app::{DEFAULT_LOCATION, FilterState, ProjectConfig};
use tasklist_core::{FilterMode, TaskId};
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;

/// Todo list kept in a local key-value store.
#[derive(Parser, Debug)]
#[command(
    name = "tasklist",
    version,
    about = "tasklist: a todo list persisted in a local key-value store"
)]
struct Cli {
    /// Data directory holding the store and `.tasklist/config.toml`.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Current view location; its `filter` query parameter selects the view.
    #[arg(long, default_value = DEFAULT_LOCATION)]
    location: String,

    /// Navigate to this filter (all, done, todo) before running the command.
    #[arg(long)]
    filter: Option<FilterMode>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Append a task.
    Add {
        /// Task text; surrounding whitespace is trimmed.
        text: String,
    },

    /// Flip the completion flag of a task.
    Toggle {
        /// Task id.
        id: TaskId,
    },

    /// Replace the text of a task.
    Edit {
        /// Task id.
        id: TaskId,
        /// New text, stored as given.
        text: String,
    },

    /// Delete a task.
    Rm {
        /// Task id.
        id: TaskId,
    },

    /// Delete every completed task.
    ClearDone,

    /// Delete every task.
    Clear,

    /// Move a task to another task's position within the current view.
    Mv {
        /// Task being moved.
        from: TaskId,
        /// Task whose position it takes.
        to: TaskId,
    },

    /// List the tasks visible in the current view.
    Ls {
        /// Output format.
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },

    /// Navigate to another filter and print the new location.
    Filter {
        /// all, done or todo.
        mode: FilterMode,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LsFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let Cli {
        dir,
        location,
        filter,
        cmd,
    } = Cli::parse();

    install_tracing();

    let dir = dir.unwrap_or_else(default_data_dir);
    let config = ProjectConfig::from_dir(&dir)?;
    let mut view = FilterState::parse(&location)?;
    if let Some(mode) = filter {
        view.set_filter(mode);
    }

    tokio::runtime::Runtime::new()?.block_on(commands::run(cmd, &config, &dir, &mut view))
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from("."), |base| base.join("tasklist"))
}

fn install_tracing() {
    // RUST_LOG overrides the default INFO level.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_add_command() {
        let cli = Cli::parse_from(["tasklist", "--dir", "/tmp/tl", "add", "buy milk"]);
        assert_eq!(cli.dir, Some(PathBuf::from("/tmp/tl")));
        match cli.cmd {
            Command::Add { text } => assert_eq!(text, "buy milk"),
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn parse_mv_with_filter() {
        let cli = Cli::parse_from(["tasklist", "--filter", "todo", "mv", "abc1234", "xyz9876"]);
        assert_eq!(cli.filter, Some(FilterMode::Todo));
        assert_eq!(cli.location, DEFAULT_LOCATION);
        match cli.cmd {
            Command::Mv { from, to } => {
                assert_eq!(from.as_str(), "abc1234");
                assert_eq!(to.as_str(), "xyz9876");
            }
            _ => panic!("expected mv command"),
        }
    }

    #[test]
    fn parse_ls_json() {
        let cli = Cli::parse_from([
            "tasklist",
            "--location",
            "https://todo.test/?filter=done",
            "ls",
            "--format",
            "json",
        ]);
        assert!(matches!(cli.cmd, Command::Ls { format: LsFormat::Json }));
    }

    #[test]
    fn rejects_unknown_filter() {
        assert!(Cli::try_parse_from(["tasklist", "filter", "later"]).is_err());
    }

    #[test]
    fn rejects_blank_ids() {
        assert!(Cli::try_parse_from(["tasklist", "rm", " "]).is_err());
    }
}
