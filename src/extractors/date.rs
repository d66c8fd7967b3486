// src/extractors/date.rs

// --- Imports ---
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

// --- Constants ---
pub const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

// --- Regex Patterns (Lazy Static) ---
// 03/12/1985, 03-12-1985, 3.12.1985: month first, day first when that is impossible
static NUMERIC_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4})$").expect("Failed to compile NUMERIC_DATE_RE")
});

// 19850312
static COMPACT_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})$").expect("Failed to compile COMPACT_DATE_RE")
});

// 12th March 1985 -> 12 March 1985
static ORDINAL_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").expect("Failed to compile ORDINAL_SUFFIX_RE")
});

/// Normalizes a raw date of birth into `YYYY-MM-DD HH:MM:SS`.
///
/// Anything that cannot be read as a date (empty, garbage, impossible
/// calendar values) becomes the empty string. Never fails.
pub fn normalize_date(raw: &str) -> String {
    match parse_permissive(raw) {
        Some(dt) => dt.format(OUTPUT_FORMAT).to_string(),
        None => {
            if !raw.trim().is_empty() {
                tracing::debug!("Unparseable date value '{}', leaving DOB empty", raw);
            }
            String::new()
        }
    }
}

/// Best-effort parse of the date shapes bureau feeds are known to emit.
pub fn parse_permissive(raw: &str) -> Option<NaiveDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    // Offsets keep the wall-clock time as written.
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.naive_local());
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt);
    }

    parse_date_only(value).and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_date_only(value: &str) -> Option<NaiveDate> {
    if let Some(caps) = COMPACT_DATE_RE.captures(value) {
        let (y, m, d) = (caps[1].parse().ok()?, caps[2].parse().ok()?, caps[3].parse().ok()?);
        return NaiveDate::from_ymd_opt(y, m, d);
    }

    if let Some(caps) = NUMERIC_DATE_RE.captures(value) {
        let first: u32 = caps[1].parse().ok()?;
        let second: u32 = caps[2].parse().ok()?;
        let year: i32 = caps[3].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, first, second)
            .or_else(|| NaiveDate::from_ymd_opt(year, second, first));
    }

    let cleaned = ORDINAL_SUFFIX_RE.replace_all(value, "$1");
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
}
