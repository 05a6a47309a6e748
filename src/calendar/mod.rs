//! Calendar helpers for the display dates printed on weighbridge slips.
//!
//! Slips carry Thai-locale date strings: numeric `D/M/Y` with a Buddhist-era
//! year, or the long form `D <month name> Y`. Grouping and sorting parse these
//! back into calendar days; strings that fit neither form land in a designated
//! fallback bucket instead of failing the whole aggregation.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Offset between Buddhist-era and Gregorian years.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Years above this are Buddhist-era and get normalized on parse.
const BUDDHIST_ERA_FLOOR: i32 = 2400;

/// Abbreviated Thai month names, January first.
pub const THAI_MONTHS_SHORT: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.ค.", "เม.ย.", "พ.ค.", "มิ.ย.", "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.",
    "ธ.ค.",
];

/// Full Thai month names, January first.
pub const THAI_MONTHS_FULL: [&str; 12] = [
    "มกราคม",
    "กุมภาพันธ์",
    "มีนาคม",
    "เมษายน",
    "พฤษภาคม",
    "มิถุนายน",
    "กรกฎาคม",
    "สิงหาคม",
    "กันยายน",
    "ตุลาคม",
    "พฤศจิกายน",
    "ธันวาคม",
];

/// Label of the grouping bucket for unparsable display dates.
pub const UNSPECIFIED_DATE_LABEL: &str = "ไม่ระบุวันที่";

/// Day-of-month/month key with no year component, e.g. `13/4`.
///
/// Holiday and lucky-day tables are keyed this way, so they only apply
/// cleanly within the single season they were written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DayKey {
    pub day: u32,
    pub month: u32,
}

impl DayKey {
    pub const fn new(day: u32, month: u32) -> Self {
        Self { day, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.day, self.month)
    }
}

/// Grouping key for records: a parsed calendar day, or the fallback bucket.
///
/// `Unspecified` orders before every real day so malformed entries surface at
/// the top of chronological listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DateBucket {
    Unspecified,
    Day(NaiveDate),
}

impl fmt::Display for DateBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateBucket::Unspecified => f.write_str(UNSPECIFIED_DATE_LABEL),
            DateBucket::Day(date) => f.write_str(&thai_display_date(*date)),
        }
    }
}

/// Month-level grouping key derived from parsed display dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MonthBucket {
    Unspecified,
    Month { year: i32, month: u32 },
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthBucket::Unspecified => f.write_str(UNSPECIFIED_DATE_LABEL),
            MonthBucket::Month { year, month } => {
                let name = THAI_MONTHS_FULL
                    .get(month.saturating_sub(1) as usize)
                    .copied()
                    .unwrap_or("?");
                write!(f, "{} {}", name, year + BUDDHIST_ERA_OFFSET)
            }
        }
    }
}

/// Parses a slip display date into a calendar day, if it fits a known form.
pub fn parse_display_date(raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if value.contains('/') {
        let parts: Vec<&str> = value.split('/').collect();
        if parts.len() == 3 {
            let day: u32 = parts[0].trim().parse().ok()?;
            let month: u32 = parts[1].trim().parse().ok()?;
            let year: i32 = parts[2].trim().parse().ok()?;
            return NaiveDate::from_ymd_opt(normalize_year(year), month, day);
        }
        return None;
    }

    // Long form: "D <month name> Y", with tolerance for extra tokens in
    // between (weekday prefixes and the like).
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() >= 3 {
        let day: u32 = parts[0].parse().ok()?;
        let year: i32 = parts.last()?.parse().ok()?;
        let month = month_from_name(parts[1])?;
        return NaiveDate::from_ymd_opt(normalize_year(year), month, day);
    }

    // ISO strings occasionally arrive from the spreadsheet side.
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Grouping bucket for a display date: parsed day or the fallback.
pub fn bucket_for(raw: &str) -> DateBucket {
    match parse_display_date(raw) {
        Some(date) => DateBucket::Day(date),
        None => DateBucket::Unspecified,
    }
}

/// Month-level bucket for a display date.
pub fn month_bucket_for(raw: &str) -> MonthBucket {
    match parse_display_date(raw) {
        Some(date) => MonthBucket::Month {
            year: date.year(),
            month: date.month(),
        },
        None => MonthBucket::Unspecified,
    }
}

/// Formats a calendar day the way slips display it: `D/M/<Buddhist year>`.
pub fn thai_display_date(date: NaiveDate) -> String {
    format!(
        "{}/{}/{}",
        date.day(),
        date.month(),
        date.year() + BUDDHIST_ERA_OFFSET
    )
}

/// Short chart label for a calendar day: `D <abbreviated month>`.
pub fn thai_day_month_label(date: NaiveDate) -> String {
    let name = THAI_MONTHS_SHORT
        .get(date.month0() as usize)
        .copied()
        .unwrap_or("?");
    format!("{} {}", date.day(), name)
}

fn normalize_year(year: i32) -> i32 {
    if year > BUDDHIST_ERA_FLOOR {
        year - BUDDHIST_ERA_OFFSET
    } else {
        year
    }
}

fn month_from_name(token: &str) -> Option<u32> {
    for (idx, name) in THAI_MONTHS_FULL.iter().enumerate() {
        if token.contains(name) {
            return Some(idx as u32 + 1);
        }
    }
    for (idx, name) in THAI_MONTHS_SHORT.iter().enumerate() {
        if token.contains(name) {
            return Some(idx as u32 + 1);
        }
    }
    None
}
