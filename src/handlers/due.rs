//! Handler for the `due` command.

use super::render::{print_task_line, TaskView};
use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tend::engine::filter::{self, TaskQuery};
use tend::engine::locale::Locale;
use tend::engine::vault::Vault;

/// Shows the actionable frontier: everything not up to date.
///
/// # Errors
/// Returns error if the vault cannot be scanned.
pub fn handle(vault_dir: &Path, tag: &str, locale: Locale, now: &str, json: bool) -> Result<()> {
    let vault = Vault::open(vault_dir)?;
    let classified = filter::apply(&TaskQuery::default(), filter::process(vault.scan(tag)?, now));
    let due: Vec<_> = classified
        .into_iter()
        .filter(|t| t.status.category.is_actionable())
        .collect();

    if json {
        let views: Vec<TaskView> = due.iter().map(TaskView::from_classified).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if due.is_empty() {
        println!("{} Nothing due. Everything is tended.", "✓".green());
        return Ok(());
    }

    println!("{} Due Tasks:", "⏰".yellow());
    for item in &due {
        print_task_line(item, now, locale);
    }
    Ok(())
}
