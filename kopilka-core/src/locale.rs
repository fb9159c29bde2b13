//! Date locale: which day/month order a statement uses.
//!
//! Passed explicitly to the date parser instead of living in process-wide state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DateLocale {
    /// Day first (`01.05.2024`), Russian month names accepted
    #[default]
    Ru,
    /// Month first (`05/01/2024`)
    Us,
    /// Only `YYYY-MM-DD`
    Iso,
}

impl DateLocale {
    /// `chrono` formats tried in order for a bare date
    pub fn date_formats(&self) -> &'static [&'static str] {
        match self {
            DateLocale::Ru => &[
                "%Y-%m-%d", "%d.%m.%Y", "%d.%m.%y", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d",
            ],
            DateLocale::Us => &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%m-%d-%Y", "%Y/%m/%d"],
            DateLocale::Iso => &["%Y-%m-%d"],
        }
    }

    /// Formats tried for cells carrying a time of day; the time is truncated
    pub fn datetime_formats(&self) -> &'static [&'static str] {
        match self {
            DateLocale::Ru => &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%d.%m.%Y %H:%M:%S", "%d.%m.%Y %H:%M"],
            DateLocale::Us => &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%m/%d/%Y %H:%M:%S", "%m/%d/%Y %H:%M"],
            DateLocale::Iso => &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"],
        }
    }

    pub fn accepts_month_names(&self) -> bool {
        matches!(self, DateLocale::Ru)
    }
}

impl fmt::Display for DateLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DateLocale::Ru => "ru",
            DateLocale::Us => "us",
            DateLocale::Iso => "iso",
        };
        f.write_str(s)
    }
}

impl FromStr for DateLocale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ru" | "ru_ru" | "ru_ru.utf-8" => Ok(DateLocale::Ru),
            "us" | "en_us" | "en_us.utf-8" => Ok(DateLocale::Us),
            "iso" => Ok(DateLocale::Iso),
            other => Err(format!("unknown date locale: {other} (expected ru, us or iso)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locale_names() {
        assert_eq!("ru_RU.UTF-8".parse::<DateLocale>(), Ok(DateLocale::Ru));
        assert_eq!("US".parse::<DateLocale>(), Ok(DateLocale::Us));
        assert!("fr".parse::<DateLocale>().is_err());
        assert_eq!(DateLocale::default(), DateLocale::Ru);
    }

    #[test]
    fn test_iso_first_everywhere() {
        for l in [DateLocale::Ru, DateLocale::Us, DateLocale::Iso] {
            assert_eq!(l.date_formats()[0], "%Y-%m-%d");
        }
    }
}
