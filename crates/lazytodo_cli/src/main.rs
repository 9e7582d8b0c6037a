//! `lazytodo` command-line front end.
//!
//! # Responsibility
//! - Parse commands into core intents and render the resulting view.
//! - Own process setup: configuration, logging, storage location.

mod config;
mod view;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use config::CliConfig;
use lazytodo_core::{
    format_date_time, init_logging, AppError, Change, DateFilter, FormError, Intent,
    KvTaskRepository, RawFields, SqliteStore, TaskId, TaskRepository, TodoApp, TypeFilter,
};
use log::debug;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lazytodo", author, version, about = "Local to-do list manager")]
#[command(arg_required_else_help(true))]
struct Cli {
    /// SQLite file holding tasks and filter selections.
    #[arg(long, global = true, env = "LAZYTODO_DATA_FILE")]
    data_file: Option<PathBuf>,
    #[arg(long, global = true, env = "LAZYTODO_LOG_DIR")]
    log_dir: Option<PathBuf>,
    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "LAZYTODO_LOG_LEVEL")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Show tasks, optionally changing the saved filters")]
    List {
        /// all|Meeting|Task|Event
        #[arg(long = "type")]
        type_filter: Option<TypeFilter>,
        /// all|upcoming|expired
        #[arg(long = "date")]
        date_filter: Option<DateFilter>,
    },
    #[command(about = "Add a task")]
    Add(FieldArgs),
    #[command(about = "Edit a task; omitted fields keep their value")]
    Edit {
        id: TaskId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    #[command(about = "Delete a task")]
    Delete { id: TaskId },
}

#[derive(Debug, clap::Args)]
struct FieldArgs {
    #[arg(long)]
    topic: Option<String>,
    #[arg(long)]
    description: Option<String>,
    /// YYYY-MM-DD HH:mm
    #[arg(long)]
    date_time: Option<String>,
    /// Meeting|Task|Event
    #[arg(long = "type")]
    task_type: Option<String>,
}

impl FieldArgs {
    /// Overlays given values on `base`.
    fn merge_into(self, base: RawFields) -> RawFields {
        RawFields {
            topic: self.topic.unwrap_or(base.topic),
            description: self.description.unwrap_or(base.description),
            date_time: self.date_time.unwrap_or(base.date_time),
            task_type: self.task_type.unwrap_or(base.task_type),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = CliConfig::resolve(cli.data_file, cli.log_dir, cli.log_level)?;

    if let Err(err) = init_logging(&config.log_level, &config.log_dir.to_string_lossy()) {
        eprintln!("warning: file logging disabled: {err}");
    }

    let store = SqliteStore::open(&config.data_file).with_context(|| {
        format!(
            "failed to open task storage at `{}`",
            config.data_file.display()
        )
    })?;
    let mut app = TodoApp::load(KvTaskRepository::new(store));
    app.subscribe(|change: Change| debug!("event=view_invalidate module=cli change={change:?}"));

    run(&mut app, cli.command)
}

/// Applies one parsed command to `app` and prints the outcome.
fn run<R: TaskRepository>(app: &mut TodoApp<R>, command: Commands) -> Result<()> {
    match command {
        Commands::List {
            type_filter,
            date_filter,
        } => {
            if let Some(value) = type_filter {
                app.dispatch(Intent::SelectTypeFilter(value))?;
            }
            if let Some(value) = date_filter {
                app.dispatch(Intent::SelectDateFilter(value))?;
            }
            view::render_list(&app.view_now());
        }
        Commands::Add(fields) => {
            app.dispatch(Intent::OpenCreate)?;
            let raw = fields.merge_into(RawFields::default());
            submit(app, raw, "Added")?;
        }
        Commands::Edit { id, fields } => {
            app.dispatch(Intent::OpenEdit(id))?;
            let prefilled = current_form_fields(app);
            submit(app, fields.merge_into(prefilled), "Updated")?;
        }
        Commands::Delete { id } => {
            let existed = app.store().get(id).is_some();
            app.dispatch(Intent::DeleteTask(id))?;
            if existed {
                println!("Deleted task {id}");
            } else {
                println!("No task with id {id}");
            }
        }
    }

    Ok(())
}

fn submit<R: TaskRepository>(app: &mut TodoApp<R>, raw: RawFields, action: &str) -> Result<()> {
    match app.dispatch(Intent::SubmitForm(raw)) {
        Ok(Some(task)) => {
            view::render_saved(action, &task);
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(AppError::Form(FormError::Invalid(errors))) => {
            view::render_field_errors(&errors);
            bail!("task was not saved")
        }
        Err(err) => Err(err.into()),
    }
}

/// Current form values as raw text, used to pre-fill `edit`.
fn current_form_fields<R: TaskRepository>(app: &TodoApp<R>) -> RawFields {
    let fields = app.form().fields();
    RawFields {
        topic: fields.topic.clone(),
        description: fields.description.clone(),
        date_time: fields.date_time.map(format_date_time).unwrap_or_default(),
        task_type: fields
            .task_type
            .map(|kind| kind.as_str().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::{run, Cli, Commands, FieldArgs};
    use clap::Parser;
    use lazytodo_core::{KvTaskRepository, MemoryStore, RawFields, TaskType, TodoApp};

    fn fields(
        topic: Option<&str>,
        description: Option<&str>,
        date_time: Option<&str>,
        task_type: Option<&str>,
    ) -> FieldArgs {
        FieldArgs {
            topic: topic.map(str::to_string),
            description: description.map(str::to_string),
            date_time: date_time.map(str::to_string),
            task_type: task_type.map(str::to_string),
        }
    }

    fn empty_app() -> TodoApp<KvTaskRepository<MemoryStore>> {
        TodoApp::load(KvTaskRepository::new(MemoryStore::new()))
    }

    #[test]
    fn merge_into_keeps_base_for_omitted_fields() {
        let base = RawFields {
            topic: "Standup".to_string(),
            description: "daily".to_string(),
            date_time: "2099-01-01 09:00".to_string(),
            task_type: "Meeting".to_string(),
        };

        let merged = fields(None, Some("moved"), None, None).merge_into(base);

        assert_eq!(merged.topic, "Standup");
        assert_eq!(merged.description, "moved");
        assert_eq!(merged.date_time, "2099-01-01 09:00");
        assert_eq!(merged.task_type, "Meeting");
    }

    #[test]
    fn edit_with_one_flag_keeps_the_other_fields() {
        let mut app = empty_app();
        run(
            &mut app,
            Commands::Add(fields(
                Some("Standup"),
                Some("daily"),
                Some("2099-01-01 09:00"),
                Some("Meeting"),
            )),
        )
        .unwrap();
        let id = app.store().tasks()[0].id;

        run(
            &mut app,
            Commands::Edit {
                id,
                fields: fields(None, Some("moved to noon"), None, None),
            },
        )
        .unwrap();

        let task = app.store().get(id).unwrap();
        assert_eq!(app.store().len(), 1);
        assert_eq!(task.topic, "Standup");
        assert_eq!(task.description, "moved to noon");
        assert_eq!(task.date_time_string(), "2099-01-01 09:00");
        assert_eq!(task.kind, TaskType::Meeting);
    }

    #[test]
    fn add_with_missing_fields_fails_and_saves_nothing() {
        let mut app = empty_app();

        let result = run(
            &mut app,
            Commands::Add(fields(None, Some("no topic"), Some("2099-01-01 09:00"), None)),
        );

        assert!(result.is_err());
        assert!(app.store().is_empty());
    }

    #[test]
    fn edit_of_unknown_id_fails() {
        let mut app = empty_app();

        let result = run(
            &mut app,
            Commands::Edit {
                id: 42,
                fields: fields(Some("ghost"), None, None, None),
            },
        );

        assert!(result.is_err());
        assert!(app.store().is_empty());
    }

    #[test]
    fn edit_flags_parse_as_optional_overrides() {
        let cli = Cli::try_parse_from(["lazytodo", "edit", "7", "--description", "later"]).unwrap();

        match cli.command {
            Commands::Edit { id, fields } => {
                assert_eq!(id, 7);
                assert_eq!(fields.description.as_deref(), Some("later"));
                assert_eq!(fields.topic, None);
                assert_eq!(fields.task_type, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
