//! Message catalog: enum-keyed strings per locale.
//!
//! The active locale is always an explicit parameter threaded through calls.
//! There is no ambient "current locale" global, so the engine stays testable
//! without an initialization step.

use chrono::Weekday;

/// A coarse calendar unit used by relative-date phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodUnit {
    Day,
    Week,
    Month,
    Year,
}

/// A message key. Every user-visible phrase the engine produces goes
/// through one of these, so adding a locale means filling one match arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Today,
    Tomorrow,
    Yesterday,
    Weekday(Weekday),
    /// "in 2 weeks" - count is always >= 1.
    InPeriod { count: i64, unit: PeriodUnit },
    /// "2 weeks ago" - count is always >= 1.
    PeriodAgo { count: i64, unit: PeriodUnit },
}

/// Supported display locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    #[default]
    En,
    De,
}

impl Locale {
    /// Parses a locale code, falling back to English for anything unknown.
    #[must_use]
    pub fn parse(code: &str) -> Self {
        match code.to_ascii_lowercase().as_str() {
            "de" | "de-de" => Self::De,
            _ => Self::En,
        }
    }

    /// Renders a message key into display text for this locale.
    #[must_use]
    pub fn msg(&self, msg: Msg) -> String {
        match self {
            Self::En => msg_en(msg),
            Self::De => msg_de(msg),
        }
    }

    /// Heading text of the completion-history section written in this locale.
    #[must_use]
    pub fn history_heading(&self) -> &'static str {
        match self {
            Self::En => "Completion History",
            Self::De => "Erledigungsverlauf",
        }
    }

    /// Column headers for a freshly created history table.
    #[must_use]
    pub fn history_columns(&self) -> [&'static str; 5] {
        match self {
            Self::En => ["Date", "Time", "Days Since Last", "Days Scheduled", "User"],
            Self::De => ["Datum", "Uhrzeit", "Tage seit letzter", "Tage geplant", "Benutzer"],
        }
    }

    /// Every heading any supported locale may have written. Section
    /// detection must match all of them, or switching locales would
    /// duplicate the section.
    #[must_use]
    pub fn all_history_headings() -> &'static [&'static str] {
        &["Completion History", "Erledigungsverlauf"]
    }
}

fn msg_en(msg: Msg) -> String {
    match msg {
        Msg::Today => "today".to_string(),
        Msg::Tomorrow => "tomorrow".to_string(),
        Msg::Yesterday => "yesterday".to_string(),
        Msg::Weekday(w) => match w {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
        .to_string(),
        Msg::InPeriod { count, unit } => format!("in {} {}", count, unit_en(unit, count)),
        Msg::PeriodAgo { count, unit } => format!("{} {} ago", count, unit_en(unit, count)),
    }
}

fn unit_en(unit: PeriodUnit, count: i64) -> &'static str {
    match (unit, count) {
        (PeriodUnit::Day, 1) => "day",
        (PeriodUnit::Day, _) => "days",
        (PeriodUnit::Week, 1) => "week",
        (PeriodUnit::Week, _) => "weeks",
        (PeriodUnit::Month, 1) => "month",
        (PeriodUnit::Month, _) => "months",
        (PeriodUnit::Year, 1) => "year",
        (PeriodUnit::Year, _) => "years",
    }
}

fn msg_de(msg: Msg) -> String {
    match msg {
        Msg::Today => "heute".to_string(),
        Msg::Tomorrow => "morgen".to_string(),
        Msg::Yesterday => "gestern".to_string(),
        Msg::Weekday(w) => match w {
            Weekday::Mon => "Montag",
            Weekday::Tue => "Dienstag",
            Weekday::Wed => "Mittwoch",
            Weekday::Thu => "Donnerstag",
            Weekday::Fri => "Freitag",
            Weekday::Sat => "Samstag",
            Weekday::Sun => "Sonntag",
        }
        .to_string(),
        Msg::InPeriod { count, unit } => format!("in {} {}", count, unit_de(unit, count)),
        Msg::PeriodAgo { count, unit } => format!("vor {} {}", count, unit_de(unit, count)),
    }
}

fn unit_de(unit: PeriodUnit, count: i64) -> &'static str {
    match (unit, count) {
        (PeriodUnit::Day, 1) => "Tag",
        (PeriodUnit::Day, _) => "Tagen",
        (PeriodUnit::Week, 1) => "Woche",
        (PeriodUnit::Week, _) => "Wochen",
        (PeriodUnit::Month, 1) => "Monat",
        (PeriodUnit::Month, _) => "Monaten",
        (PeriodUnit::Year, 1) => "Jahr",
        (PeriodUnit::Year, _) => "Jahren",
    }
}
