//! Status Classifier: computes a task's due state from its frontmatter.
//!
//! This module is the "truth oracle" - it answers "how urgent is this task
//! right now?" by examining the last completion against the recurrence
//! schedule. Nothing here is cached or stored; status is derived fresh on
//! every read from `(last_done, interval, unit, early window, now)`.

use super::dates;
use super::types::{RecurringTask, DAYS_UNKNOWN, DEFAULT_EARLY_WINDOW};
use serde::Serialize;
use std::fmt;

/// The derived urgency tier of a task.
///
/// Ordering is by urgency: `NeverCompleted` sorts ahead of everything,
/// `UpToDate` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum StatusCategory {
    /// No completion on record - the task has never been done
    NeverCompleted,
    /// The computed due date is in the past
    Overdue,
    /// Due exactly today
    DueToday,
    /// Inside the early-completion window
    DueSoon,
    /// Not due yet
    UpToDate,
}

impl StatusCategory {
    /// Returns true if this task should appear in the due list (actionable).
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Self::UpToDate)
    }

    /// The hyphenated keyword used by the `status:` filter clause.
    #[must_use]
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::NeverCompleted => "never-completed",
            Self::Overdue => "overdue",
            Self::DueToday => "due-today",
            Self::DueSoon => "due-soon",
            Self::UpToDate => "up-to-date",
        }
    }

    /// Parses a filter keyword (case-insensitive).
    #[must_use]
    pub fn parse_keyword(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "never-completed" | "never" => Some(Self::NeverCompleted),
            "overdue" => Some(Self::Overdue),
            "due-today" => Some(Self::DueToday),
            "due-soon" => Some(Self::DueSoon),
            "up-to-date" => Some(Self::UpToDate),
            _ => None,
        }
    }
}

impl fmt::Display for StatusCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeverCompleted => write!(f, "NEVER COMPLETED"),
            Self::Overdue => write!(f, "OVERDUE"),
            Self::DueToday => write!(f, "DUE TODAY"),
            Self::DueSoon => write!(f, "DUE SOON"),
            Self::UpToDate => write!(f, "UP TO DATE"),
        }
    }
}

/// The full computed status of one task. Plain comparable data, so UI code
/// can decide whether to redraw by structural equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStatus {
    pub category: StatusCategory,
    /// Signed days to `calculated_next_due`; `DAYS_UNKNOWN` when no due
    /// date can be computed.
    pub days_remaining: i64,
    pub calculated_next_due: Option<String>,
    pub is_eligible_for_completion: bool,
}

/// Classifies one task against `now` (a `YYYY-MM-DD` local date).
///
/// Pure function: no I/O, no side effects, no mutation of the task. Never
/// panics - malformed schedule metadata degrades to the `DAYS_UNKNOWN`
/// sentinel instead.
#[must_use]
pub fn classify(task: &RecurringTask, now: &str) -> TaskStatus {
    if task.never_completed() {
        return TaskStatus {
            category: StatusCategory::NeverCompleted,
            days_remaining: DAYS_UNKNOWN,
            calculated_next_due: None,
            is_eligible_for_completion: true,
        };
    }

    let last_done = task.last_done.as_deref().unwrap_or_default();
    let next_due = dates::calculate_next_due_date(last_done, task.interval, &task.interval_unit);
    let days_remaining = next_due
        .as_deref()
        .map_or(DAYS_UNKNOWN, |due| dates::calculate_days_remaining(due, now));

    // Completed today: show the full cycle length, not a near-zero
    // countdown, and block a second completion.
    if dates::is_today(last_done, now) {
        let cycle = dates::interval_in_days(task.interval, &task.interval_unit)
            .unwrap_or(DAYS_UNKNOWN);
        return TaskStatus {
            category: StatusCategory::UpToDate,
            days_remaining: cycle,
            calculated_next_due: next_due,
            is_eligible_for_completion: false,
        };
    }

    let early_window = task.early_window();
    let category = if days_remaining < 0 {
        StatusCategory::Overdue
    } else if days_remaining == 0 {
        StatusCategory::DueToday
    } else if days_remaining <= early_window.max(DEFAULT_EARLY_WINDOW) {
        StatusCategory::DueSoon
    } else {
        StatusCategory::UpToDate
    };

    TaskStatus {
        category,
        days_remaining,
        calculated_next_due: next_due,
        is_eligible_for_completion: days_remaining <= early_window,
    }
}

/// A task with its status pre-computed. Useful wherever both the raw
/// frontmatter and the derived state are needed together.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedTask {
    pub task: RecurringTask,
    pub status: TaskStatus,
}

impl ClassifiedTask {
    #[must_use]
    pub fn new(task: RecurringTask, now: &str) -> Self {
        let status = classify(&task, now);
        Self { task, status }
    }
}

/// Display mapping for a status category: a stable style token for theming
/// and a tooltip template with a `{days}` placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub style_token: &'static str,
    pub tooltip_template: &'static str,
}

impl Presentation {
    /// Fills the `{days}` placeholder with a concrete count.
    #[must_use]
    pub fn tooltip(&self, days: i64) -> String {
        self.tooltip_template.replace("{days}", &days.abs().to_string())
    }
}

/// Pure status-to-display mapping. No hidden state; callable without any
/// rendering framework in sight.
#[must_use]
pub fn presentation(category: StatusCategory) -> Presentation {
    match category {
        StatusCategory::NeverCompleted => Presentation {
            style_token: "task-never-completed",
            tooltip_template: "never completed",
        },
        StatusCategory::Overdue => Presentation {
            style_token: "task-overdue",
            tooltip_template: "overdue by {days} days",
        },
        StatusCategory::DueToday => Presentation {
            style_token: "task-due-today",
            tooltip_template: "due today",
        },
        StatusCategory::DueSoon => Presentation {
            style_token: "task-due-soon",
            tooltip_template: "due in {days} days",
        },
        StatusCategory::UpToDate => Presentation {
            style_token: "task-up-to-date",
            tooltip_template: "due in {days} days",
        },
    }
}
