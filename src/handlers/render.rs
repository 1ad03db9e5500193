//! Shared rendering helpers for the human-readable command output.

use colored::{ColoredString, Colorize};
use serde::Serialize;
use tend::engine::dates;
use tend::engine::locale::Locale;
use tend::engine::status::{presentation, ClassifiedTask, StatusCategory};

/// Colors a status label. The engine's presentation token owns the
/// status-to-style mapping; this only translates tokens to terminal colors.
#[must_use]
pub fn paint_status(category: StatusCategory) -> ColoredString {
    let label = category.to_string();
    match presentation(category).style_token {
        "task-never-completed" => label.magenta(),
        "task-overdue" => label.red().bold(),
        "task-due-today" => label.yellow().bold(),
        "task-due-soon" => label.cyan(),
        _ => label.green(),
    }
}

/// One task line: `[name] STATUS  due phrase`.
pub fn print_task_line(item: &ClassifiedTask, now: &str, locale: Locale) {
    let due_phrase = match &item.status.calculated_next_due {
        Some(due) => format!("due {}", dates::format_relative_date(due, now, locale)),
        None => "no completion on record".to_string(),
    };
    println!(
        "   [{}] {}  {}",
        item.task.name.blue(),
        paint_status(item.status.category),
        due_phrase.dimmed()
    );
}

/// JSON view of a classified task, shared by every `--json` path.
#[derive(Serialize)]
pub struct TaskView {
    pub name: String,
    pub path: String,
    pub status: String,
    pub days_remaining: i64,
    pub calculated_next_due: Option<String>,
    pub is_eligible_for_completion: bool,
}

impl TaskView {
    #[must_use]
    pub fn from_classified(item: &ClassifiedTask) -> Self {
        Self {
            name: item.task.name.clone(),
            path: item.task.path.display().to_string(),
            status: item.status.category.keyword().to_string(),
            days_remaining: item.status.days_remaining,
            calculated_next_due: item.status.calculated_next_due.clone(),
            is_eligible_for_completion: item.status.is_eligible_for_completion,
        }
    }
}
