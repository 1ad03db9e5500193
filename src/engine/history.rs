//! History Appender: records completion events as a markdown table.
//!
//! Pure string transformation - the caller owns reading and writing the
//! note. The one load-bearing rule is the smart append: never glue a row
//! onto the previous line, never leave a blank line inside the table.

use super::dates::parse_local_date;
use super::locale::Locale;
use chrono::{NaiveDateTime, Timelike};

/// One row of the completion-history table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRecord {
    /// `YYYY-MM-DD` of the completion.
    pub date: String,
    /// `HH:MM` of the completion.
    pub time: String,
    /// Fractional days since the previous completion, rounded to two
    /// decimals with trailing zeros trimmed; `"-"` when none.
    pub days_since_last: String,
    /// Scheduled cycle length in days; `-1` when interval metadata was
    /// missing or invalid.
    pub days_scheduled: i64,
    /// Who completed it; `"-"` when identity is unknown.
    pub user: String,
}

impl CompletionRecord {
    /// Builds a record for a completion happening at `now`.
    ///
    /// `days_since_last` is computed from full timestamps, not truncated
    /// dates, so sub-day precision survives into the log.
    #[must_use]
    pub fn new(
        previous_last_done: Option<&str>,
        now: NaiveDateTime,
        interval_days: Option<i64>,
        user: &str,
    ) -> Self {
        let days_since_last = previous_last_done
            .and_then(parse_previous_timestamp)
            .map_or_else(|| "-".to_string(), |prev| {
                let minutes = now.signed_duration_since(prev).num_minutes();
                trim_decimal(minutes as f64 / (24.0 * 60.0))
            });
        Self {
            date: now.format("%Y-%m-%d").to_string(),
            time: format!("{:02}:{:02}", now.hour(), now.minute()),
            days_since_last,
            days_scheduled: interval_days.unwrap_or(-1),
            user: if user.is_empty() { "-".to_string() } else { user.to_string() },
        }
    }

    fn row_line(&self) -> String {
        format!(
            "| {} | {} | {} | {} | {} |\n",
            self.date, self.time, self.days_since_last, self.days_scheduled, self.user
        )
    }
}

/// Previous completions are dates, but tolerate a stored timestamp too.
/// Total over arbitrary frontmatter text: a timestamp that does not parse
/// degrades to the date part at midnight, never a panic.
fn parse_previous_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Some((date_part, _)) = raw.split_once('T') {
        // `get` rather than slicing: the offset may not be a char boundary
        // in corrupted input.
        if let Some(prefix) = raw.get(..19) {
            if let Ok(dt) = NaiveDateTime::parse_from_str(prefix, "%Y-%m-%dT%H:%M:%S") {
                return Some(dt);
            }
        }
        return parse_local_date(Some(date_part)).and_then(|d| d.and_hms_opt(0, 0, 0));
    }
    parse_local_date(Some(raw)).and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Formats to two decimals, then trims trailing zeros: `1.00` → `"1"`,
/// `1.50` → `"1.5"`, `1.256` → `"1.26"`.
fn trim_decimal(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// True if any supported locale's history heading is present in the text.
///
/// All locales are checked, not just the active one - a vault edited under
/// one locale must not grow a duplicate section under another.
#[must_use]
pub fn has_history_section(document: &str) -> bool {
    document.lines().any(|line| {
        let trimmed = line.trim_start();
        if !trimmed.starts_with('#') {
            return false;
        }
        let title = trimmed.trim_start_matches('#').trim();
        Locale::all_history_headings().contains(&title)
    })
}

/// Appends a completion record to the note text, creating the history
/// section on first use.
///
/// Smart-append rule: when the document does not end with a newline the row
/// gets one inserted before it; when it already does, the row is appended
/// directly. A naive "always `\n` + row" would double the newline and leave
/// a blank line inside the table.
#[must_use]
pub fn append_completion(document: &str, record: &CompletionRecord, locale: Locale) -> String {
    let row = record.row_line();

    if !has_history_section(document) {
        let cols = locale.history_columns();
        let mut out = document.trim_end_matches('\n').to_string();
        if !out.is_empty() {
            out.push_str("\n\n");
        }
        out.push_str(&format!("## {}\n\n", locale.history_heading()));
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            cols[0], cols[1], cols[2], cols[3], cols[4]
        ));
        out.push_str("| --- | --- | --- | --- | --- |\n");
        out.push_str(&row);
        return out;
    }

    let mut out = document.to_string();
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&row);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(date: &str, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn record() -> CompletionRecord {
        CompletionRecord::new(Some("2024-01-01"), at("2024-01-15", 9, 30), Some(14), "sam")
    }

    #[test]
    fn test_trim_decimal_cases() {
        assert_eq!(trim_decimal(1.0), "1");
        assert_eq!(trim_decimal(1.5), "1.5");
        assert_eq!(trim_decimal(1.256), "1.26");
        assert_eq!(trim_decimal(0.0), "0");
        assert_eq!(trim_decimal(14.399), "14.4");
    }

    #[test]
    fn test_record_sub_day_precision() {
        // 14 days and 9.5 hours ≈ 14.40 days.
        let rec = record();
        assert_eq!(rec.days_since_last, "14.4");
        assert_eq!(rec.date, "2024-01-15");
        assert_eq!(rec.time, "09:30");
        assert_eq!(rec.days_scheduled, 14);
    }

    #[test]
    fn test_record_no_previous() {
        let rec = CompletionRecord::new(None, at("2024-01-15", 9, 30), None, "");
        assert_eq!(rec.days_since_last, "-");
        assert_eq!(rec.days_scheduled, -1);
        assert_eq!(rec.user, "-");
    }

    #[test]
    fn test_record_unparsable_previous() {
        let rec = CompletionRecord::new(Some("someday"), at("2024-01-15", 9, 30), Some(7), "sam");
        assert_eq!(rec.days_since_last, "-");
    }

    #[test]
    fn test_record_multibyte_corrupted_timestamp() {
        // A multibyte character straddling the timestamp prefix must not
        // panic; the date part still carries the gap at midnight.
        let rec = CompletionRecord::new(
            Some("2024-01-15T08:00:0é"),
            at("2024-01-16", 0, 0),
            Some(7),
            "sam",
        );
        assert_eq!(rec.days_since_last, "1");

        // Garbage before the 'T' degrades to "-" instead.
        let rec = CompletionRecord::new(Some("héuteT08:00"), at("2024-01-16", 0, 0), Some(7), "sam");
        assert_eq!(rec.days_since_last, "-");

        // Truncated timestamps fall back to the date part too.
        let rec = CompletionRecord::new(Some("2024-01-15T08"), at("2024-01-16", 0, 0), Some(7), "sam");
        assert_eq!(rec.days_since_last, "1");
    }

    #[test]
    fn test_creates_section_on_first_append() {
        let doc = "---\ntags: [recurring-task]\n---\n\n# Bike chain\n";
        let out = append_completion(doc, &record(), Locale::En);
        assert!(out.contains("## Completion History"));
        assert!(out.contains("| Date | Time | Days Since Last | Days Scheduled | User |"));
        assert!(out.contains("| 2024-01-15 | 09:30 | 14.4 | 14 | sam |"));
        assert!(!out.contains("\n\n\n"));
    }

    #[test]
    fn test_smart_append_with_trailing_newline() {
        let doc = "## Completion History\n\n| Date | Time | Days Since Last | Days Scheduled | User |\n| --- | --- | --- | --- | --- |\n| 2024-01-01 | 08:00 | - | 14 | sam |\n";
        let out = append_completion(doc, &record(), Locale::En);
        let expected_row = "| 2024-01-15 | 09:30 | 14.4 | 14 | sam |\n";
        assert_eq!(out, format!("{doc}{expected_row}"));
    }

    #[test]
    fn test_smart_append_without_trailing_newline() {
        let doc = "## Completion History\n\n| Date | Time | Days Since Last | Days Scheduled | User |\n| --- | --- | --- | --- | --- |\n| 2024-01-01 | 08:00 | - | 14 | sam |";
        let out = append_completion(doc, &record(), Locale::En);
        let expected_row = "| 2024-01-15 | 09:30 | 14.4 | 14 | sam |\n";
        assert_eq!(out, format!("{doc}\n{expected_row}"));
    }

    #[test]
    fn test_repeated_appends_keep_table_uniform() {
        let mut doc = "# Note".to_string();
        for _ in 0..4 {
            doc = append_completion(&doc, &record(), Locale::En);
        }
        // Header + separator + 4 data rows, every table line 5 columns.
        let table_lines: Vec<&str> =
            doc.lines().filter(|l| l.starts_with('|')).collect();
        assert_eq!(table_lines.len(), 6);
        for line in &table_lines {
            assert_eq!(line.matches('|').count(), 6, "bad column count: {line}");
        }
        assert!(!doc.contains("\n\n\n"));
    }

    #[test]
    fn test_section_detected_across_locales() {
        let doc = "## Erledigungsverlauf\n\n| Datum | Uhrzeit | Tage seit letzter | Tage geplant | Benutzer |\n| --- | --- | --- | --- | --- |\n| 2024-01-01 | 08:00 | - | 14 | sam |\n";
        // Appending with the English locale must not create a second section.
        let out = append_completion(doc, &record(), Locale::En);
        assert!(!out.contains("Completion History"));
        assert_eq!(out.lines().filter(|l| l.starts_with("##")).count(), 1);
    }
}
