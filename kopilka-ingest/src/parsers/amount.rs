//! Money cells.
//!
//! Thousands separators (`1,000`, `1 000`, NBSP), currency marks (`₸`, `руб.`, `$`)
//! and accounting negatives (`(100.00)`) are tolerated. A lone comma that is not a
//! thousands grouping is read as the decimal point (`12,5`).

use regex::Regex;

pub struct AmountParser {
    currency_re: Regex,
    grouped_re: Regex,
}

impl AmountParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            currency_re: Regex::new(r"(?i)[₸₽$€£]|\b(?:kzt|rub|usd|eur|gbp)\b|тг\.?|руб\.?")?,
            grouped_re: Regex::new(r"^[-+]?\d{1,3}(?:,\d{3})+$")?,
        })
    }

    /// Returns `None` for anything that is not a finite number after cleanup.
    pub fn parse(&self, s: &str) -> Option<f64> {
        let stripped = self.currency_re.replace_all(s, "");
        let mut t: String = stripped.chars().filter(|c| !c.is_whitespace()).collect();
        if t.is_empty() {
            return None;
        }

        let negative = t.starts_with('(') && t.ends_with(')');
        if negative {
            t = t[1..t.len() - 1].to_string();
        }

        let normalized = match (t.rfind(','), t.rfind('.')) {
            // Whichever separator comes last is the decimal point
            (Some(comma), Some(dot)) if comma > dot => t.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => t.replace(',', ""),
            (Some(_), None) if self.grouped_re.is_match(&t) => t.replace(',', ""),
            (Some(_), None) if t.matches(',').count() == 1 => t.replace(',', "."),
            (Some(_), None) => return None,
            (None, _) => t,
        };

        let value: f64 = normalized.parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        Some(if negative { -value } else { value })
    }
}
