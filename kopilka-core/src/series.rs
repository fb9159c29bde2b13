//! Derived views over a transaction set: per-day and per-category totals.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::transaction::Direction;

/// Label of the synthetic bucket holding collapsed small categories
pub const OTHER_CATEGORY: &str = "Мелкие";

/// A value computed once for income and once for expense
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ByDirection<T> {
    pub income: T,
    pub expense: T,
}

impl<T> ByDirection<T> {
    pub fn get(&self, direction: Direction) -> &T {
        match direction {
            Direction::Income => &self.income,
            Direction::Expense => &self.expense,
        }
    }

    pub fn get_mut(&mut self, direction: Direction) -> &mut T {
        match direction {
            Direction::Income => &mut self.income,
            Direction::Expense => &mut self.expense,
        }
    }

    /// Build both halves from the same function
    pub fn from_fn(mut f: impl FnMut(Direction) -> T) -> Self {
        Self {
            income: f(Direction::Income),
            expense: f(Direction::Expense),
        }
    }
}

/// Sparse day -> total map, ascending by date. Days without transactions have no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    days: BTreeMap<NaiveDate, f64>,
}

impl DailySeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, date: NaiveDate, amount: f64) {
        *self.days.entry(date).or_insert(0.0) += amount;
    }

    pub fn get(&self, date: NaiveDate) -> Option<f64> {
        self.days.get(&date).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.days.iter().map(|(d, v)| (*d, *v))
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn total(&self) -> f64 {
        self.days.values().sum()
    }

    pub fn max(&self) -> Option<f64> {
        self.days.values().copied().reduce(f64::max)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl ByDirection<DailySeries> {
    /// Union of days present in either series, ascending
    pub fn all_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.income.dates().chain(self.expense.dates()).collect();
        dates.sort();
        dates.dedup();
        dates
    }
}

/// One slice of a category breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

/// Category totals for one direction after small categories were collapsed.
///
/// Order is meaningful: kept categories in order of first appearance, then
/// [`OTHER_CATEGORY`] last when present. Colors and legends are assigned by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    entries: Vec<CategoryTotal>,
}

impl CategoryBreakdown {
    pub fn new(entries: Vec<CategoryTotal>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[CategoryTotal] {
        &self.entries
    }

    pub fn get(&self, category: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.amount)
    }

    /// Amount folded into the synthetic bucket, if any category was collapsed
    pub fn other(&self) -> Option<f64> {
        self.entries
            .last()
            .filter(|e| e.category == OTHER_CATEGORY)
            .map(|e| e.amount)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.amount).sum()
    }

    /// Entries paired with their share of the total in percent (pie labels)
    pub fn percentages(&self) -> Vec<(&CategoryTotal, f64)> {
        let total = self.total();
        self.entries
            .iter()
            .map(|e| {
                let pct = if total == 0.0 { 0.0 } else { e.amount / total * 100.0 };
                (e, pct)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
