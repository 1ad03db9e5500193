//! Handler for the `list` command.

use super::render::{print_task_line, TaskView};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tend::engine::filter::{self, TaskQuery};
use tend::engine::locale::Locale;
use tend::engine::vault::Vault;

/// Lists every recurring task in the vault with its computed status.
///
/// # Errors
/// Returns error if the vault cannot be scanned.
pub fn handle(vault_dir: &Path, tag: &str, locale: Locale, now: &str, json: bool) -> Result<()> {
    let vault = Vault::open(vault_dir)?;
    let tasks = filter::apply(&TaskQuery::default(), filter::process(vault.scan(tag)?, now));

    if json {
        let views: Vec<TaskView> = tasks.iter().map(TaskView::from_classified).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("No recurring tasks found (marker tag: {})", tag.blue());
        return Ok(());
    }

    println!("{} Recurring Tasks:", "🌱".cyan());
    for item in &tasks {
        print_task_line(item, now, locale);
    }
    Ok(())
}
