use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

/// Numbers above this are treated as unix milliseconds, everything at or
/// below it as unix seconds. Seconds values only exceed it after year 2286.
pub const MILLISECONDS_THRESHOLD: i64 = 10_000_000_000;

const DOTTED_FORMATS: [&str; 3] = ["%d.%m.%Y %H:%M:%S", "%d.%m.%Y %H:%M", "%d.%m.%Y"];
const GENERIC_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];
const GENERIC_DATE_FORMATS: [&str; 2] = ["%Y/%m/%d", "%B %d, %Y"];

/// Parser that accepted a date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `23.09.2020`, optionally followed by a time.
    DayMonthYearDotted,
    /// `2020-09-23`
    IsoDashed,
    /// RFC 3339, RFC 2822 and a handful of common layouts.
    Generic,
    /// Digits interpreted as unix seconds or milliseconds.
    NumericTimestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedDate {
    pub datetime: DateTime<Utc>,
    pub format: DateFormat,
}

impl ParsedDate {
    pub fn timestamp(&self) -> i64 {
        self.datetime.timestamp()
    }
}

/// Parses a date string, trying the dotted, ISO, generic and numeric
/// representations in that order. Dates without a time of day resolve to
/// midnight UTC.
pub fn parse_date(text: &str) -> Option<ParsedDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parsed = parse_dotted(text)
        .map(|datetime| (datetime, DateFormat::DayMonthYearDotted))
        .or_else(|| parse_iso_dashed(text).map(|datetime| (datetime, DateFormat::IsoDashed)))
        .or_else(|| parse_generic(text).map(|datetime| (datetime, DateFormat::Generic)))
        .or_else(|| parse_numeric(text).map(|datetime| (datetime, DateFormat::NumericTimestamp)));

    parsed.map(|(datetime, format)| ParsedDate { datetime, format })
}

/// Converts a numeric timestamp of unknown unit into unix seconds.
pub fn seconds_from_number(value: f64) -> i64 {
    if value > MILLISECONDS_THRESHOLD as f64 {
        (value / 1000.0).floor() as i64
    } else {
        value.floor() as i64
    }
}

/// `DD.MM.YYYY`, used for chart labels.
pub fn format_day(timestamp: i64) -> String {
    match DateTime::from_timestamp(timestamp, 0) {
        Some(datetime) => datetime.format("%d.%m.%Y").to_string(),
        None => timestamp.to_string(),
    }
}

/// `DD.MM.YYYY HH:MM:SS`, the display form stored next to every snapshot.
pub fn format_recorded_at(datetime: DateTime<Utc>) -> String {
    datetime.format("%d.%m.%Y %H:%M:%S").to_string()
}

pub fn midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

fn parse_dotted(text: &str) -> Option<DateTime<Utc>> {
    if !text.contains('.') {
        return None;
    }
    for format in DOTTED_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&datetime));
        }
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(midnight(date));
        }
    }
    None
}

fn parse_iso_dashed(text: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().map(midnight)
}

fn parse_generic(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Some(datetime.with_timezone(&Utc));
    }
    if let Ok(datetime) = DateTime::parse_from_rfc2822(text) {
        return Some(datetime.with_timezone(&Utc));
    }
    GENERIC_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|datetime| Utc.from_utc_datetime(&datetime))
        .or_else(|| {
            GENERIC_DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
                .map(midnight)
        })
}

fn parse_numeric(text: &str) -> Option<DateTime<Utc>> {
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
    {
        return None;
    }
    let value: f64 = text.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    DateTime::from_timestamp(seconds_from_number(value), 0)
}
