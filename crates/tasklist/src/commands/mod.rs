use std::path::Path;
use std::sync::Arc;

use anyhow::{Result, bail};
use tasklist_app::{
    AsyncTaskStore, FilterState, MutationCoordinator, ProjectConfig, QueryCache, QueryKey,
};
use tasklist_core::{FilterMode, Task, TaskId, TaskList};

use crate::{Command, LsFormat};

/// What a parsed command needs: a new location, or a pass over the store.
enum Dispatch {
    Navigate(FilterMode),
    Store(Action),
}

/// Commands that read or write the task list.
enum Action {
    Add { text: String },
    Toggle { id: TaskId },
    Edit { id: TaskId, text: String },
    Rm { id: TaskId },
    ClearDone,
    Clear,
    Mv { from: TaskId, to: TaskId },
    Ls { format: LsFormat },
}

impl From<Command> for Dispatch {
    fn from(command: Command) -> Self {
        let action = match command {
            Command::Filter { mode } => return Self::Navigate(mode),
            Command::Add { text } => Action::Add { text },
            Command::Toggle { id } => Action::Toggle { id },
            Command::Edit { id, text } => Action::Edit { id, text },
            Command::Rm { id } => Action::Rm { id },
            Command::ClearDone => Action::ClearDone,
            Command::Clear => Action::Clear,
            Command::Mv { from, to } => Action::Mv { from, to },
            Command::Ls { format } => Action::Ls { format },
        };
        Self::Store(action)
    }
}

pub async fn run(
    command: Command,
    config: &ProjectConfig,
    dir: &Path,
    view: &mut FilterState,
) -> Result<()> {
    let action = match Dispatch::from(command) {
        Dispatch::Navigate(mode) => {
            println!("{}", view.set_filter(mode));
            return Ok(());
        }
        Dispatch::Store(action) => action,
    };

    let store = Arc::new(config.storage.open(dir));
    let coordinator = MutationCoordinator::new(QueryCache::new(store));
    let output = execute(action, &coordinator, view).await?;
    print!("{output}");
    Ok(())
}

async fn execute<S: AsyncTaskStore>(
    action: Action,
    coordinator: &MutationCoordinator<S>,
    view: &FilterState,
) -> Result<String> {
    let before = coordinator.cache().ensure(QueryKey::Tasks).await;

    let tasks = match action {
        Action::Add { text } => {
            let tasks = coordinator.add(text).await?;
            let added = tasks.iter().find(|task| !before.contains(&task.id));
            return Ok(added.map_or_else(
                || "Nothing added: task text is blank\n".to_owned(),
                |task| format!("added: {} {}\n", task.id, task.text),
            ));
        }
        Action::Toggle { id } => {
            ensure_exists(&before, &id)?;
            coordinator.toggle(id).await?
        }
        Action::Edit { id, text } => {
            ensure_exists(&before, &id)?;
            coordinator.edit_text(id, text).await?
        }
        Action::Rm { id } => {
            ensure_exists(&before, &id)?;
            coordinator.delete(id).await?
        }
        Action::ClearDone => coordinator.delete_completed().await?,
        Action::Clear => coordinator.delete_all().await?,
        Action::Mv { from, to } => {
            let visible = view.project(&before);
            for id in [&from, &to] {
                if !visible.iter().any(|task| &task.id == id) {
                    bail!("Task {id} is not visible under filter '{}'", view.mode());
                }
            }
            coordinator.reorder(from, to, view.mode()).await?
        }
        Action::Ls { format } => {
            let visible = view.project(&before);
            return match format {
                LsFormat::Table => Ok(render_task_table(&visible, view)),
                LsFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&visible)?)),
            };
        }
    };

    Ok(render_task_table(&view.project(&tasks), view))
}

fn ensure_exists(tasks: &TaskList, id: &TaskId) -> Result<()> {
    if !tasks.contains(id) {
        bail!("Task not found: {id}");
    }
    Ok(())
}

fn render_task_table(tasks: &[&Task], view: &FilterState) -> String {
    if tasks.is_empty() {
        return format!("No tasks found (filter: {})\n", view.mode());
    }

    let mut out = String::from("ID | Done | Text\n-- | ---- | ----\n");
    for task in tasks {
        let done = if task.completed { "x" } else { " " };
        out.push_str(&format!("{} | [{}] | {}\n", task.id, done, task.text));
    }
    out
}
