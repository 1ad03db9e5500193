//! Filter Engine: the query language over classified tasks.
//!
//! A query is a newline-separated set of clauses; each clause is either
//! `key:value` or a bare status keyword, and `OR` inside one line unions
//! values for that key. Application is a plain narrow → sort → limit
//! pipeline - vaults are small, correctness beats cleverness.

use super::status::{ClassifiedTask, StatusCategory};
use super::types::{RecurringTask, DAYS_UNKNOWN};
use serde::Serialize;
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("limit must be a positive integer, got `{0}`")]
    InvalidLimit(String),
    #[error("bad days filter `{0}` (use e.g. days:<=3)")]
    InvalidDays(String),
    #[error("unknown sort key `{0}` (due-date, status, name)")]
    InvalidSort(String),
}

/// Sort order for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Never-completed first, then ascending next-due date.
    #[default]
    DueDate,
    /// Urgency order, due date as tiebreak.
    Status,
    /// Note name, case-insensitive.
    Name,
}

impl SortKey {
    fn parse(s: &str) -> Result<Self, QueryError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "due-date" | "due" => Ok(Self::DueDate),
            "status" => Ok(Self::Status),
            "name" => Ok(Self::Name),
            other => Err(QueryError::InvalidSort(other.to_string())),
        }
    }
}

/// A comparator clause against days remaining, e.g. `days:<=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    Le(i64),
    Ge(i64),
    Lt(i64),
    Gt(i64),
    Eq(i64),
}

impl DayFilter {
    fn parse(s: &str) -> Result<Self, QueryError> {
        let s = s.trim();
        let bad = || QueryError::InvalidDays(s.to_string());
        let (make, rest): (fn(i64) -> Self, &str) = if let Some(r) = s.strip_prefix("<=") {
            (Self::Le, r)
        } else if let Some(r) = s.strip_prefix(">=") {
            (Self::Ge, r)
        } else if let Some(r) = s.strip_prefix('<') {
            (Self::Lt, r)
        } else if let Some(r) = s.strip_prefix('>') {
            (Self::Gt, r)
        } else if let Some(r) = s.strip_prefix('=') {
            (Self::Eq, r)
        } else {
            (Self::Eq, s)
        };
        rest.trim().parse().map(make).map_err(|_| bad())
    }

    fn matches(&self, days: i64) -> bool {
        match *self {
            Self::Le(n) => days <= n,
            Self::Ge(n) => days >= n,
            Self::Lt(n) => days < n,
            Self::Gt(n) => days > n,
            Self::Eq(n) => days == n,
        }
    }
}

/// A parsed filter query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskQuery {
    pub statuses: Vec<StatusCategory>,
    pub tags: Vec<String>,
    pub intervals: Vec<String>,
    pub days: Vec<DayFilter>,
    pub limit: Option<usize>,
    pub sort: SortKey,
}

impl TaskQuery {
    /// Parses the documented end-user syntax. Unknown keys and
    /// unrecognized bare words are ignored (forgiving); malformed values
    /// for known numeric keys are errors.
    pub fn parse(input: &str) -> Result<Self, QueryError> {
        let mut query = Self::default();
        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            for clause in line.split(" OR ") {
                query.parse_clause(clause.trim())?;
            }
        }
        Ok(query)
    }

    fn parse_clause(&mut self, clause: &str) -> Result<(), QueryError> {
        let Some((key, value)) = clause.split_once(':') else {
            // Bare word: treat as a status keyword if it is one.
            if let Some(cat) = StatusCategory::parse_keyword(clause) {
                self.statuses.push(cat);
            }
            return Ok(());
        };
        let value = value.trim();
        match key.trim().to_ascii_lowercase().as_str() {
            "status" => {
                if let Some(cat) = StatusCategory::parse_keyword(value) {
                    self.statuses.push(cat);
                }
            }
            "tag" => self.tags.push(value.to_ascii_lowercase()),
            "interval" => self.intervals.push(value.to_ascii_lowercase()),
            "days" => self.days.push(DayFilter::parse(value)?),
            "limit" => {
                self.limit = Some(
                    value
                        .parse::<usize>()
                        .ok()
                        .filter(|n| *n > 0)
                        .ok_or_else(|| QueryError::InvalidLimit(value.to_string()))?,
                );
            }
            "sort" => self.sort = SortKey::parse(value)?,
            _ => {} // unknown key: ignore
        }
        Ok(())
    }

    fn matches(&self, item: &ClassifiedTask) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&item.status.category) {
            return false;
        }
        if !self.tags.is_empty() {
            let hit = item.task.tags.iter().any(|t| {
                let t = t.to_ascii_lowercase();
                self.tags.iter().any(|q| t.contains(q))
            });
            if !hit {
                return false;
            }
        }
        if !self.intervals.is_empty() {
            let unit = item.task.interval_unit.to_ascii_lowercase();
            if !self.intervals.iter().any(|q| unit.contains(q)) {
                return false;
            }
        }
        if !self.days.is_empty() {
            // The sentinel must not satisfy comparators: `days:<=3` should
            // not sweep in never-completed tasks.
            let days = item.status.days_remaining;
            if days == DAYS_UNKNOWN || !self.days.iter().any(|f| f.matches(days)) {
                return false;
            }
        }
        true
    }
}

/// Classifies every raw task against `now`.
#[must_use]
pub fn process(tasks: Vec<RecurringTask>, now: &str) -> Vec<ClassifiedTask> {
    tasks
        .into_iter()
        .map(|task| ClassifiedTask::new(task, now))
        .collect()
}

/// Narrow → sort → limit.
#[must_use]
pub fn apply(query: &TaskQuery, tasks: Vec<ClassifiedTask>) -> Vec<ClassifiedTask> {
    let mut kept: Vec<ClassifiedTask> = tasks.into_iter().filter(|t| query.matches(t)).collect();
    sort_tasks(&mut kept, query.sort);
    if let Some(limit) = query.limit {
        kept.truncate(limit);
    }
    kept
}

/// Sorts in place by the given key.
pub fn sort_tasks(tasks: &mut [ClassifiedTask], key: SortKey) {
    match key {
        SortKey::DueDate => tasks.sort_by(cmp_due_date),
        SortKey::Status => tasks.sort_by(|a, b| {
            a.status
                .category
                .cmp(&b.status.category)
                .then_with(|| cmp_due_date(a, b))
        }),
        SortKey::Name => tasks.sort_by(|a, b| {
            a.task
                .name
                .to_ascii_lowercase()
                .cmp(&b.task.name.to_ascii_lowercase())
        }),
    }
}

/// Never-completed tasks (no computable due date) come first - they are the
/// most actionable. Then ascending due date, note name as tiebreak.
fn cmp_due_date(a: &ClassifiedTask, b: &ClassifiedTask) -> Ordering {
    match (&a.status.calculated_next_due, &b.status.calculated_next_due) {
        (None, None) => a.task.name.cmp(&b.task.name),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(y).then_with(|| a.task.name.cmp(&b.task.name)),
    }
}

/// Per-category tallies for the status summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub never_completed: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub due_soon: usize,
    pub up_to_date: usize,
}

impl StatusCounts {
    #[must_use]
    pub fn tally(tasks: &[ClassifiedTask]) -> Self {
        let mut counts = Self::default();
        for t in tasks {
            match t.status.category {
                StatusCategory::NeverCompleted => counts.never_completed += 1,
                StatusCategory::Overdue => counts.overdue += 1,
                StatusCategory::DueToday => counts.due_today += 1,
                StatusCategory::DueSoon => counts.due_soon += 1,
                StatusCategory::UpToDate => counts.up_to_date += 1,
            }
        }
        counts
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.never_completed + self.overdue + self.due_today + self.due_soon + self.up_to_date
    }
}
