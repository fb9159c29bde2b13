//! Transaction record types shared by ingestion, aggregation and prompting

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a row is money coming in or going out.
///
/// The statement column `Доходы/Расходы` is authoritative; the amount sign is not consulted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "income")]
    Income,
    #[serde(rename = "expense")]
    Expense,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Income, Direction::Expense];

    /// Label used in statement files and chart legends
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Income => "Доходы",
            Direction::Expense => "Расходы",
        }
    }

    /// Parse a statement cell. Only the two exact labels are accepted (after trimming).
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim() {
            "Доходы" => Some(Direction::Income),
            "Расходы" => Some(Direction::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unknown direction: {s:?} (expected Доходы or Расходы)"))
    }
}

/// One statement row after coercion.
///
/// `date`, `amount` and `direction` are `None` when the source cell could not be
/// parsed; such records stay in the set and are filtered by whichever view needs the field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub date: Option<NaiveDate>,
    pub amount: Option<f64>,
    /// `None` when `Доходы/Расходы` held neither label
    pub direction: Option<Direction>,
    /// Free-text label, compared byte-for-byte ("Food" and "food" differ)
    pub category: String,
    /// Display only
    pub description: String,
}

impl Transaction {
    pub fn new(
        date: Option<NaiveDate>,
        amount: Option<f64>,
        direction: impl Into<Option<Direction>>,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            amount,
            direction: direction.into(),
            category: category.into(),
            description: description.into(),
        }
    }

    pub fn is_income(&self) -> bool {
        self.direction == Some(Direction::Income)
    }

    pub fn is_expense(&self) -> bool {
        self.direction == Some(Direction::Expense)
    }

    /// Date and amount both present, so the record can sit on a time axis
    pub fn is_dated(&self) -> bool {
        self.date.is_some() && self.amount.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_labels() {
        assert_eq!(Direction::from_label("Доходы"), Some(Direction::Income));
        assert_eq!(Direction::from_label(" Расходы "), Some(Direction::Expense));
        assert_eq!(Direction::from_label("доходы"), None);
        assert_eq!(Direction::Expense.to_string(), "Расходы");
        assert!("Income".parse::<Direction>().is_err());
    }

    #[test]
    fn test_transaction_flags() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let t = Transaction::new(Some(date), None, Direction::Expense, "Еда", "обед");
        assert!(t.is_expense());
        assert!(!t.is_income());
        assert!(!t.is_dated());

        let t = Transaction::new(Some(date), Some(10.0), Direction::Income, "Стипендия", "");
        assert!(t.is_dated());

        let t = Transaction::new(Some(date), Some(10.0), None, "Перевод", "");
        assert!(!t.is_income());
        assert!(!t.is_expense());
    }

    #[test]
    fn test_serde_direction() {
        let json = serde_json::to_string(&Direction::Income).unwrap();
        assert_eq!(json, "\"income\"");
    }
}
