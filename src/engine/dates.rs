//! Date Engine: local-calendar arithmetic for recurrence schedules.
//!
//! Everything here is a pure, total function. Bad input yields an explicit
//! sentinel (`None` / `DAYS_UNKNOWN`), never a panic, so callers can compose
//! these freely over whatever frontmatter a note happens to contain.
//!
//! All parsing uses local calendar semantics (`NaiveDate`), never UTC
//! conversion. This is the central correctness property: a date written as
//! `2024-01-15` means that calendar day everywhere, and must not shift by a
//! day depending on the host timezone.

use super::locale::{Locale, Msg, PeriodUnit};
use super::types::{IntervalUnit, DAYS_UNKNOWN};
use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

const MS_PER_DAY: i64 = 86_400_000;

static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static regex"));

/// Parses a calendar date from frontmatter text.
///
/// Tolerates full ISO-8601 timestamps by stripping everything from an
/// embedded `'T'` onward; what remains must be exactly `YYYY-MM-DD`,
/// zero-padded. Returns `None` for absent or malformed input.
#[must_use]
pub fn parse_local_date(input: Option<&str>) -> Option<NaiveDate> {
    let raw = input?.trim();
    if raw.is_empty() {
        return None;
    }
    let date_part = raw.split('T').next().unwrap_or(raw);
    if !DATE_SHAPE.is_match(date_part) {
        return None;
    }
    let year: i32 = date_part[0..4].parse().ok()?;
    let month: u32 = date_part[5..7].parse().ok()?;
    let day: u32 = date_part[8..10].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Computes the next due date from the last completion.
///
/// Returns `None` when `last_done` is unparsable, `interval <= 0`, or the
/// unit is unrecognized - a null schedule, handled downstream as "never due".
///
/// Month addition clamps to the last day of the target month when the
/// original day does not exist there (Jan 31 + 1 month → Feb 29 in a leap
/// year), rather than rolling into the following month.
#[must_use]
pub fn calculate_next_due_date(last_done: &str, interval: i64, unit: &str) -> Option<String> {
    let start = parse_local_date(Some(last_done))?;
    if interval <= 0 {
        return None;
    }
    let due = match IntervalUnit::parse(unit)? {
        IntervalUnit::Day => start.checked_add_days(chrono::Days::new(interval as u64))?,
        IntervalUnit::Week => start.checked_add_days(chrono::Days::new(interval as u64 * 7))?,
        IntervalUnit::Month => add_months_clamped(start, interval)?,
        IntervalUnit::Year => add_years_clamped(start, interval)?,
    };
    Some(due.format("%Y-%m-%d").to_string())
}

fn add_months_clamped(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let total = i64::from(date.year()) * 12 + i64::from(date.month0()) + months;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = total.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
}

fn add_years_clamped(date: NaiveDate, years: i64) -> Option<NaiveDate> {
    let year = i32::try_from(i64::from(date.year()) + years).ok()?;
    // Feb 29 collapses to Feb 28 in non-leap targets.
    let day = date.day().min(days_in_month(year, date.month()));
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_y, next_m) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_y, next_m, 1)
        .and_then(|d| d.pred_opt())
        .map_or(28, |d| d.day())
}

/// Signed day count from `now` to `due`. Negative means overdue.
///
/// Returns `DAYS_UNKNOWN` when either side is unparsable. The rounding rule
/// is a ceiling over millisecond timestamps: any positive sub-day remainder
/// counts as a full day ahead, never truncated to zero.
#[must_use]
pub fn calculate_days_remaining(due: &str, now: &str) -> i64 {
    let (Some(due), Some(now)) = (parse_local_date(Some(due)), parse_local_date(Some(now)))
    else {
        return DAYS_UNKNOWN;
    };
    ceil_days(due.signed_duration_since(now).num_milliseconds())
}

/// Ceiling of `ms / 86_400_000`, exact over the whole signed range.
#[must_use]
pub fn ceil_days(ms: i64) -> i64 {
    (ms + MS_PER_DAY - 1).div_euclid(MS_PER_DAY)
}

/// Exact calendar-day equality; false when either input is invalid.
#[must_use]
pub fn is_today(date: &str, now: &str) -> bool {
    match (parse_local_date(Some(date)), parse_local_date(Some(now))) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Interval length in whole days, for display and eligibility math.
///
/// Month and year use the conventional 30/365 approximations; the real
/// next-due date is always computed calendar-aware, this is only the cycle
/// length shown after completion.
#[must_use]
pub fn interval_in_days(interval: i64, unit: &str) -> Option<i64> {
    if interval <= 0 {
        return None;
    }
    let per = match IntervalUnit::parse(unit)? {
        IntervalUnit::Day => 1,
        IntervalUnit::Week => 7,
        IntervalUnit::Month => 30,
        IntervalUnit::Year => 365,
    };
    Some(interval * per)
}

/// Formats a date relative to `now`: today / tomorrow / yesterday, a weekday
/// name within the coming week, otherwise a coarse period phrase.
///
/// Unparsable input is returned unchanged - the raw text is still the most
/// useful thing to show.
#[must_use]
pub fn format_relative_date(date: &str, now: &str, locale: Locale) -> String {
    let (Some(target), Some(now)) = (parse_local_date(Some(date)), parse_local_date(Some(now)))
    else {
        return date.to_string();
    };
    let days = target.signed_duration_since(now).num_days();
    match days {
        0 => locale.msg(Msg::Today),
        1 => locale.msg(Msg::Tomorrow),
        -1 => locale.msg(Msg::Yesterday),
        2..=6 => locale.msg(Msg::Weekday(target.weekday())),
        _ => format_days_to_period(days, locale),
    }
}

/// Buckets a signed day distance into the coarsest fitting period, rounding
/// to the nearest unit count: 10 days is "in 1 week" (10/7 ≈ 1.43 → 1),
/// not "in 10 days".
#[must_use]
pub fn format_days_to_period(days: i64, locale: Locale) -> String {
    if days == 0 {
        return locale.msg(Msg::Today);
    }
    let magnitude = days.unsigned_abs() as f64;
    let (unit, per) = if magnitude >= 365.0 {
        (PeriodUnit::Year, 365.0)
    } else if magnitude >= 30.0 {
        (PeriodUnit::Month, 30.0)
    } else if magnitude >= 7.0 {
        (PeriodUnit::Week, 7.0)
    } else {
        (PeriodUnit::Day, 1.0)
    };
    let count = ((magnitude / per).round() as i64).max(1);
    if days > 0 {
        locale.msg(Msg::InPeriod { count, unit })
    } else {
        locale.msg(Msg::PeriodAgo { count, unit })
    }
}
