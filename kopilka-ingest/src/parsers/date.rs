//! Calendar-date cells.
//!
//! Accepted shapes depend on the [`DateLocale`]:
//!   2024-05-01, 2024-05-01 13:45:00   (all locales)
//!   01.05.2024, 01/05/2024, 1 мая 2024 г.   (ru)
//!   05/01/2024   (us)

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use kopilka_core::DateLocale;
use regex::Regex;

pub struct DateParser {
    locale: DateLocale,
    month_name_re: Regex,
}

impl DateParser {
    pub fn new(locale: DateLocale) -> Result<Self, regex::Error> {
        let month_name_re = Regex::new(r"(?i)^(\d{1,2})\s+([а-яё]+)\.?\s+(\d{4})(?:\s*г\.?)?$")?;
        Ok(Self {
            locale,
            month_name_re,
        })
    }

    pub fn locale(&self) -> DateLocale {
        self.locale
    }

    /// Parse a cell to a calendar day, dropping any time of day.
    /// Returns `None` instead of failing so the caller can mark the field missing.
    pub fn parse(&self, s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        for fmt in self.locale.datetime_formats() {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                if plausible_year(dt.date()) {
                    return Some(dt.date());
                }
            }
        }

        for fmt in self.locale.date_formats() {
            if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                // %Y happily reads "24" as year 24; leave two-digit years to %y
                if fmt.contains("%Y") && !plausible_year(d) {
                    continue;
                }
                return Some(d);
            }
        }

        if self.locale.accepts_month_names() {
            return self.parse_month_name(s);
        }

        None
    }

    fn parse_month_name(&self, s: &str) -> Option<NaiveDate> {
        let caps = self.month_name_re.captures(s)?;
        let day: u32 = caps[1].parse().ok()?;
        let month = ru_month(&caps[2].to_lowercase())?;
        let year: i32 = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

fn plausible_year(d: NaiveDate) -> bool {
    d.year() >= 1000
}

/// Nominative or genitive Russian month name (or its common abbreviation) to 1..=12
fn ru_month(name: &str) -> Option<u32> {
    const PREFIXES: [(&str, u32); 12] = [
        ("янв", 1),
        ("фев", 2),
        ("мар", 3),
        ("апр", 4),
        ("июн", 6),
        ("июл", 7),
        ("авг", 8),
        ("сен", 9),
        ("окт", 10),
        ("ноя", 11),
        ("дек", 12),
        ("ма", 5),
    ];
    PREFIXES
        .iter()
        .find(|(prefix, _)| name.starts_with(prefix))
        .map(|&(_, m)| m)
}
