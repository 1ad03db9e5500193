//! Core types for the tend engine.
//!
//! Note: `TaskStatus` (the computed truth) lives in `status.rs`. The types
//! here describe what a note's frontmatter *claims*; everything derived from
//! it is recomputed fresh on every read.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Sentinel for "days remaining cannot be computed" (no completion on
/// record, or unparsable schedule metadata).
pub const DAYS_UNKNOWN: i64 = -9999;

/// Early-completion window applied when frontmatter does not set one.
pub const DEFAULT_EARLY_WINDOW: i64 = 7;

/// Recognized recurrence units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntervalUnit {
    Day,
    Week,
    Month,
    Year,
}

impl IntervalUnit {
    /// Parses a unit string. Singular and plural are both accepted,
    /// case-insensitive; anything else is `None`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Some(Self::Day),
            "week" | "weeks" => Some(Self::Week),
            "month" | "months" => Some(Self::Month),
            "year" | "years" => Some(Self::Year),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recurring task as read from a note's frontmatter.
///
/// `interval_unit` stays a raw string on purpose: an unrecognized unit must
/// degrade to a null schedule downstream, not fail the scan.
#[derive(Debug, Clone, Serialize)]
pub struct RecurringTask {
    /// Path of the backing note. Stable identity for filtering and sorting.
    pub path: PathBuf,
    /// File stem, used as the display name.
    pub name: String,
    /// Last completion date (`YYYY-MM-DD`), absent or literal "never" when
    /// the task was never completed.
    pub last_done: Option<String>,
    pub interval: i64,
    pub interval_unit: String,
    pub complete_early_days: Option<i64>,
    pub tags: Vec<String>,
}

impl RecurringTask {
    /// The effective early-completion window: default 7 when absent,
    /// negative input clamped to 0.
    #[must_use]
    pub fn early_window(&self) -> i64 {
        self.complete_early_days
            .map_or(DEFAULT_EARLY_WINDOW, |d| d.max(0))
    }

    /// True when the task has no completion on record.
    #[must_use]
    pub fn never_completed(&self) -> bool {
        match self.last_done.as_deref() {
            None => true,
            Some(s) => s.trim().is_empty() || s.trim().eq_ignore_ascii_case("never"),
        }
    }
}
