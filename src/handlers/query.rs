//! Handler for the `query` command.

use super::render::{print_task_line, TaskView};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use tend::engine::filter::{self, TaskQuery};
use tend::engine::locale::Locale;
use tend::engine::vault::Vault;

/// Runs a filter query against the vault.
///
/// Clauses are newline-separated in the documented syntax; on the command
/// line `;` works as a separator too.
///
/// # Errors
/// Returns error if the query is malformed or the vault cannot be scanned.
pub fn handle(
    vault_dir: &Path,
    tag: &str,
    locale: Locale,
    now: &str,
    query_text: &str,
    json: bool,
) -> Result<()> {
    let normalized = query_text.replace(';', "\n");
    let query = TaskQuery::parse(&normalized).context("invalid query")?;

    let vault = Vault::open(vault_dir)?;
    let matched = filter::apply(&query, filter::process(vault.scan(tag)?, now));

    if json {
        let views: Vec<TaskView> = matched.iter().map(TaskView::from_classified).collect();
        println!("{}", serde_json::to_string_pretty(&views)?);
        return Ok(());
    }

    if matched.is_empty() {
        println!("No tasks match.");
        return Ok(());
    }

    println!("{} {} matching tasks:", "🔍".cyan(), matched.len());
    for item in &matched {
        print_task_line(item, now, locale);
    }
    Ok(())
}
