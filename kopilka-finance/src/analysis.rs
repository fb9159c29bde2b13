//! One full pass over a statement: both chart views plus headline totals.

use kopilka_core::{ByDirection, CategoryBreakdown, DailySeries, Direction, Transaction};

use crate::categories::build_category_breakdown;
use crate::daily::build_daily_series;

/// Sums over every classified record with an amount, dated or not
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
}

impl Totals {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut totals = Totals::default();
        for txn in transactions {
            let Some(amount) = txn.amount else { continue };
            match txn.direction {
                Some(Direction::Income) => totals.income += amount,
                Some(Direction::Expense) => totals.expense += amount,
                None => {}
            }
        }
        totals
    }

    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// Derived views, recomputed from scratch on every call
#[derive(Debug, Clone)]
pub struct Analysis {
    pub daily: ByDirection<DailySeries>,
    pub categories: ByDirection<CategoryBreakdown>,
    pub totals: Totals,
}

impl Analysis {
    pub fn compute(transactions: &[Transaction], threshold: f64) -> Self {
        Self {
            daily: build_daily_series(transactions),
            categories: build_category_breakdown(transactions, threshold),
            totals: Totals::from_transactions(transactions),
        }
    }
}
