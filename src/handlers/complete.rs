//! Handler for the `complete` command.

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;
use tend::engine::dates;
use tend::engine::identity::EnvIdentity;
use tend::engine::locale::Locale;
use tend::engine::status::classify;
use tend::engine::vault::{resolve, Resolution, Vault};

/// Marks a task complete: updates `last_done` and appends a history row.
///
/// Completion outside the early window needs `--force`; a task already
/// completed today is refused outright.
///
/// # Errors
/// Returns error if the task cannot be resolved or the note written.
pub fn handle(
    vault_dir: &Path,
    tag: &str,
    locale: Locale,
    now: &str,
    name: &str,
    force: bool,
) -> Result<()> {
    let vault = Vault::open(vault_dir)?;
    let tasks = vault.scan(tag)?;

    let task = match resolve(&tasks, name) {
        Resolution::One(task) => task,
        Resolution::NotFound => bail!("no recurring task matches `{name}`"),
        Resolution::Ambiguous(hits) => {
            let names: Vec<&str> = hits.iter().map(|t| t.name.as_str()).collect();
            bail!("`{name}` is ambiguous: {}", names.join(", "));
        }
    };

    if !task.never_completed() && dates::is_today(task.last_done.as_deref().unwrap_or(""), now) {
        bail!("[{}] was already completed today", task.name);
    }

    let status = classify(task, now);
    if !status.is_eligible_for_completion && !force {
        bail!(
            "[{}] is not due for another {} days (use --force to complete early)",
            task.name,
            status.days_remaining
        );
    }

    let now_ts = chrono::Local::now().naive_local();
    vault.mark_complete(task, now_ts, locale, &EnvIdentity)?;

    println!(
        "{} Completed [{}] on {}",
        "✓".green(),
        task.name.blue(),
        now_ts.format("%Y-%m-%d")
    );
    Ok(())
}
