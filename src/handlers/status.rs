//! Handler for the `status` command.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tend::engine::filter::{self, StatusCounts};
use tend::engine::vault::Vault;

/// Displays per-category counts for the whole vault.
///
/// # Errors
/// Returns error if the vault cannot be scanned.
pub fn handle(vault_dir: &Path, tag: &str, now: &str, json: bool) -> Result<()> {
    let vault = Vault::open(vault_dir)?;
    let classified = filter::process(vault.scan(tag)?, now);
    let counts = StatusCounts::tally(&classified);

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    println!("{} Vault Status ({} tasks)", "🌱".cyan(), counts.total());
    println!();
    println!("   {}: {}", "never completed".magenta(), counts.never_completed);
    println!("   {}: {}", "overdue".red(), counts.overdue);
    println!("   {}: {}", "due today".yellow(), counts.due_today);
    println!("   {}: {}", "due soon".cyan(), counts.due_soon);
    println!("   {}: {}", "up to date".green(), counts.up_to_date);
    Ok(())
}
