//! Vault: all note storage operations in one place.
//!
//! A vault is a directory of markdown notes. Recurring tasks are the notes
//! whose YAML frontmatter tags include the marker tag. This module is the
//! only part of the engine that touches the filesystem; everything it hands
//! out is plain data for the pure core.

use super::dates;
use super::history::{self, CompletionRecord};
use super::identity::IdentityProvider;
use super::locale::Locale;
use super::types::RecurringTask;
use anyhow::{bail, Context, Result};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Frontmatter tag that marks a note as a recurring task.
pub const DEFAULT_MARKER_TAG: &str = "recurring-task";

/// The recognized frontmatter fields, deserialized forgivingly: interval
/// may arrive as a number or a quoted string, tags as a list or a single
/// string. Anything else in the frontmatter is ignored.
#[derive(Debug, Default, Deserialize)]
struct Frontmatter {
    #[serde(default)]
    last_done: Option<serde_yaml::Value>,
    #[serde(default)]
    interval: Option<serde_yaml::Value>,
    #[serde(default)]
    interval_unit: Option<String>,
    #[serde(default)]
    complete_early_days: Option<i64>,
    #[serde(default)]
    tags: Option<TagsField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagsField {
    One(String),
    Many(Vec<String>),
}

impl TagsField {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(tag) => vec![tag],
            Self::Many(tags) => tags,
        }
    }
}

fn yaml_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn yaml_to_i64(value: &serde_yaml::Value) -> Option<i64> {
    match value {
        serde_yaml::Value::Number(n) => n.as_i64(),
        serde_yaml::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Splits a note into its frontmatter block and the remainder.
fn extract_frontmatter(content: &str) -> Option<&str> {
    let rest = content.strip_prefix("---\n")?;
    let end = rest.find("\n---").filter(|i| {
        let after = &rest[i + 4..];
        after.is_empty() || after.starts_with('\n')
    })?;
    Some(&rest[..end])
}

pub struct Vault {
    root: PathBuf,
}

impl Vault {
    /// Anchors a vault on an existing directory.
    ///
    /// # Errors
    /// Returns an error if the directory does not exist.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            bail!("vault directory not found: {}", root.display());
        }
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Scans the vault for notes carrying `marker_tag` and returns them as
    /// recurring tasks, sorted by path for stable output.
    ///
    /// Notes with unreadable content or broken frontmatter are skipped with
    /// a warning; one bad note must never take down the whole list.
    ///
    /// # Errors
    /// Returns an error only if the vault directory itself cannot be read.
    pub fn scan(&self, marker_tag: &str) -> Result<Vec<RecurringTask>> {
        let mut tasks = Vec::new();
        self.scan_dir(&self.root, marker_tag, &mut tasks)?;
        tasks.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(tasks)
    }

    fn scan_dir(&self, dir: &Path, marker_tag: &str, out: &mut Vec<RecurringTask>) -> Result<()> {
        let entries =
            fs::read_dir(dir).with_context(|| format!("reading vault dir {}", dir.display()))?;
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                // Obsidian convention: dot-directories hold app state.
                let hidden = path
                    .file_name()
                    .is_some_and(|n| n.to_string_lossy().starts_with('.'));
                if !hidden {
                    self.scan_dir(&path, marker_tag, out)?;
                }
            } else if path.extension().is_some_and(|e| e == "md") {
                match self.read_task(&path, marker_tag) {
                    Ok(Some(task)) => out.push(task),
                    Ok(None) => {}
                    Err(err) => {
                        tracing::warn!(path = %path.display(), error = %err, "skipping note");
                    }
                }
            }
        }
        Ok(())
    }

    fn read_task(&self, path: &Path, marker_tag: &str) -> Result<Option<RecurringTask>> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let Some(block) = extract_frontmatter(&content) else {
            return Ok(None);
        };
        let fm: Frontmatter = serde_yaml::from_str(block)
            .with_context(|| format!("invalid frontmatter in {}", path.display()))?;

        let tags = fm.tags.map(TagsField::into_vec).unwrap_or_default();
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(marker_tag)) {
            return Ok(None);
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Some(RecurringTask {
            path: path.to_path_buf(),
            name,
            last_done: fm.last_done.as_ref().and_then(yaml_to_string),
            // Missing or unparsable interval becomes 0 and degrades to a
            // null schedule downstream instead of failing the scan.
            interval: fm.interval.as_ref().and_then(yaml_to_i64).unwrap_or(0),
            interval_unit: fm.interval_unit.unwrap_or_default(),
            complete_early_days: fm.complete_early_days,
            tags,
        }))
    }

    /// Marks a task complete at `now`: updates the `last_done:` frontmatter
    /// field, then appends a row to the note's completion-history table.
    ///
    /// The two writes are deliberately separate. The frontmatter update is
    /// the primary record and its failure is a hard error; a history-append
    /// failure after that point is logged as a warning and does not roll
    /// back the completion.
    ///
    /// # Errors
    /// Returns an error if the note cannot be read or the frontmatter
    /// update cannot be written.
    pub fn mark_complete(
        &self,
        task: &RecurringTask,
        now: NaiveDateTime,
        locale: Locale,
        identity: &dyn IdentityProvider,
    ) -> Result<()> {
        let content = fs::read_to_string(&task.path)
            .with_context(|| format!("reading {}", task.path.display()))?;
        let today = now.format("%Y-%m-%d").to_string();

        let updated = set_last_done(&content, &today)
            .with_context(|| format!("no frontmatter block in {}", task.path.display()))?;
        fs::write(&task.path, &updated)
            .with_context(|| format!("writing {}", task.path.display()))?;

        let record = CompletionRecord::new(
            task.last_done.as_deref().filter(|_| !task.never_completed()),
            now,
            dates::interval_in_days(task.interval, &task.interval_unit),
            &identity.username(),
        );
        let with_history = history::append_completion(&updated, &record, locale);
        if let Err(err) = fs::write(&task.path, with_history) {
            tracing::warn!(
                path = %task.path.display(),
                error = %err,
                "completion recorded, but history row could not be written"
            );
        }
        Ok(())
    }
}

/// Rewrites (or inserts) the `last_done:` line inside the frontmatter
/// block. Returns `None` when the note has no frontmatter to edit.
fn set_last_done(content: &str, date: &str) -> Option<String> {
    let rest = content.strip_prefix("---\n")?;
    let end = rest.find("\n---")?;
    let block = &rest[..end];
    let tail = &rest[end..];

    let new_block = if block
        .lines()
        .any(|l| l.trim_start().starts_with("last_done:"))
    {
        block
            .lines()
            .map(|l| {
                if l.trim_start().starts_with("last_done:") {
                    format!("last_done: {date}")
                } else {
                    l.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        format!("{block}\nlast_done: {date}")
    };

    Some(format!("---\n{new_block}{tail}"))
}

/// Outcome of resolving a user-supplied name against the task list.
#[derive(Debug)]
pub enum Resolution<'a> {
    One(&'a RecurringTask),
    NotFound,
    Ambiguous(Vec<&'a RecurringTask>),
}

/// Resolves a query against task names: exact match (case-insensitive)
/// wins, otherwise substring matching, ambiguity reported rather than
/// guessed at.
#[must_use]
pub fn resolve<'a>(tasks: &'a [RecurringTask], query: &str) -> Resolution<'a> {
    let needle = query.to_ascii_lowercase();
    if let Some(task) = tasks
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(query))
    {
        return Resolution::One(task);
    }
    let hits: Vec<&RecurringTask> = tasks
        .iter()
        .filter(|t| t.name.to_ascii_lowercase().contains(&needle))
        .collect();
    match hits.len() {
        0 => Resolution::NotFound,
        1 => Resolution::One(hits[0]),
        _ => Resolution::Ambiguous(hits),
    }
}
