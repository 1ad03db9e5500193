//! End-to-end: scan a vault, classify, complete, rescan.

use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;
use tend::engine::filter::{self, TaskQuery};
use tend::engine::identity::FixedIdentity;
use tend::engine::locale::Locale;
use tend::engine::status::StatusCategory;
use tend::engine::vault::{Vault, DEFAULT_MARKER_TAG};

const NOW: &str = "2024-01-15";

fn write_note(dir: &TempDir, name: &str, frontmatter: &str, body: &str) {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, format!("---\n{frontmatter}\n---\n\n{body}")).unwrap();
}

fn noon(date: &str) -> chrono::NaiveDateTime {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

#[test]
fn scan_picks_up_marked_notes_only() {
    let dir = TempDir::new().unwrap();
    write_note(
        &dir,
        "bike-chain.md",
        "tags: [recurring-task, bicycle]\nlast_done: 2024-01-01\ninterval: 2\ninterval_unit: weeks",
        "Lube the chain.",
    );
    write_note(&dir, "groceries.md", "tags: [shopping]", "Milk, eggs.");
    write_note(&dir, "plain.md", "", "No tags at all.");

    let vault = Vault::open(dir.path()).unwrap();
    let tasks = vault.scan(DEFAULT_MARKER_TAG).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "bike-chain");
    assert_eq!(tasks[0].last_done.as_deref(), Some("2024-01-01"));
    assert_eq!(tasks[0].interval, 2);
    assert_eq!(tasks[0].interval_unit, "weeks");
}

#[test]
fn scan_tolerates_loose_frontmatter_shapes() {
    let dir = TempDir::new().unwrap();
    // Interval quoted as a string, tags as a single scalar.
    write_note(
        &dir,
        "furnace.md",
        "tags: recurring-task\nlast_done: 2023-11-01\ninterval: \"2\"\ninterval_unit: months",
        "",
    );
    // Broken YAML: skipped with a warning, not fatal.
    write_note(&dir, "broken.md", "tags: [recurring-task\ninterval: {", "");

    let vault = Vault::open(dir.path()).unwrap();
    let tasks = vault.scan(DEFAULT_MARKER_TAG).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].interval, 2);
}

#[test]
fn scan_recurses_but_skips_dot_dirs() {
    let dir = TempDir::new().unwrap();
    write_note(
        &dir,
        "home/gutters.md",
        "tags: [recurring-task]\ninterval: 1\ninterval_unit: years",
        "",
    );
    write_note(
        &dir,
        ".obsidian/cache.md",
        "tags: [recurring-task]\ninterval: 1\ninterval_unit: years",
        "",
    );

    let vault = Vault::open(dir.path()).unwrap();
    let tasks = vault.scan(DEFAULT_MARKER_TAG).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].name, "gutters");
}

#[test]
fn complete_updates_frontmatter_and_appends_history() {
    let dir = TempDir::new().unwrap();
    write_note(
        &dir,
        "bike-chain.md",
        "tags: [recurring-task]\nlast_done: 2024-01-01\ninterval: 2\ninterval_unit: weeks",
        "Lube the chain.",
    );

    let vault = Vault::open(dir.path()).unwrap();
    let tasks = vault.scan(DEFAULT_MARKER_TAG).unwrap();
    vault
        .mark_complete(&tasks[0], noon(NOW), Locale::En, &FixedIdentity("sam".into()))
        .unwrap();

    let content = fs::read_to_string(dir.path().join("bike-chain.md")).unwrap();
    assert!(content.contains("last_done: 2024-01-15"));
    assert!(content.contains("## Completion History"));
    // 14 days at midnight to noon: 14.5 days since last.
    assert!(content.contains("| 2024-01-15 | 12:00 | 14.5 | 14 | sam |"));

    // Rescan sees the new completion; task now classifies up to date with
    // the full cycle shown.
    let tasks = vault.scan(DEFAULT_MARKER_TAG).unwrap();
    let classified = filter::process(tasks, NOW);
    assert_eq!(classified[0].status.category, StatusCategory::UpToDate);
    assert_eq!(classified[0].status.days_remaining, 14);
    assert!(!classified[0].status.is_eligible_for_completion);
}

#[test]
fn repeated_completions_append_single_rows() {
    let dir = TempDir::new().unwrap();
    write_note(
        &dir,
        "plants.md",
        "tags: [recurring-task]\ninterval: 7\ninterval_unit: days",
        "Water everything.",
    );

    let vault = Vault::open(dir.path()).unwrap();
    for day in ["2024-01-15", "2024-01-22", "2024-01-29"] {
        let tasks = vault.scan(DEFAULT_MARKER_TAG).unwrap();
        vault
            .mark_complete(&tasks[0], noon(day), Locale::En, &FixedIdentity("sam".into()))
            .unwrap();
    }

    let content = fs::read_to_string(dir.path().join("plants.md")).unwrap();
    let table_rows: Vec<&str> = content
        .lines()
        .filter(|l| l.starts_with("| 2024-"))
        .collect();
    assert_eq!(table_rows.len(), 3);
    assert_eq!(
        content.matches("## Completion History").count(),
        1,
        "section must not be duplicated"
    );
    assert!(!content.contains("\n\n\n"));
    // First completion had no prior last_done: days since last is "-".
    assert!(table_rows[0].contains("| - |"));
    // Later rows: stored last_done is a date (midnight), completion at
    // noon, so 7.5 days since last against a 7-day schedule.
    assert!(table_rows[1].contains("| 7.5 | 7 |"));
}

#[test]
fn never_completed_note_classifies_and_queries() {
    let dir = TempDir::new().unwrap();
    write_note(
        &dir,
        "gutters.md",
        "tags: [recurring-task, home]\nlast_done: never\ninterval: 1\ninterval_unit: months",
        "",
    );

    let vault = Vault::open(dir.path()).unwrap();
    let classified = filter::process(vault.scan(DEFAULT_MARKER_TAG).unwrap(), NOW);
    assert_eq!(classified[0].status.category, StatusCategory::NeverCompleted);
    assert_eq!(classified[0].status.days_remaining, -9999);
    assert_eq!(classified[0].status.calculated_next_due, None);
    assert!(classified[0].status.is_eligible_for_completion);

    let query = TaskQuery::parse("status:never-completed OR status:overdue\ntag:home").unwrap();
    let matched = filter::apply(&query, classified);
    assert_eq!(matched.len(), 1);
}
