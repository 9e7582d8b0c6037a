//! Terminal rendering of the visible task list.

use lazytodo_core::{FieldErrors, Task, ViewModel};
use prettytable::{row, Table};

/// Display format for scheduled time, e.g. `Jan 1, 2099 9:00 AM`.
const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y %-I:%M %p";

pub fn render_list(view: &ViewModel) {
    println!("To-Do List");
    println!(
        "type: {}  date: {}  showing: {}",
        view.type_filter,
        view.date_filter,
        view.tasks.len()
    );

    if view.tasks.is_empty() {
        println!("No tasks.");
        return;
    }

    let mut table = Table::new();
    table.add_row(row!["ID", "TOPIC", "DESCRIPTION", "DATE", "TYPE"]);
    for task in &view.tasks {
        table.add_row(row![
            task.id,
            task.topic,
            task.description,
            display_date(task),
            task.kind
        ]);
    }
    table.printstd();
}

pub fn render_saved(action: &str, task: &Task) {
    println!(
        "{action} task {} `{}` ({}, {})",
        task.id,
        task.topic,
        task.kind,
        display_date(task)
    );
}

pub fn render_field_errors(errors: &FieldErrors) {
    for (field, message) in errors.iter() {
        eprintln!("{}: {}", field.label(), message);
    }
}

fn display_date(task: &Task) -> String {
    task.date_time.format(DISPLAY_DATE_FORMAT).to_string()
}
