//! Per-category totals with the long tail folded into one bucket (pie chart input).

use std::collections::HashMap;

use kopilka_core::{ByDirection, CategoryBreakdown, CategoryTotal, OTHER_CATEGORY, Transaction};
use tracing::debug;

/// Categories under 5% of their direction's total are collapsed
pub const DEFAULT_THRESHOLD: f64 = 0.05;

/// Category totals for income and expense, small categories collapsed.
///
/// A missing amount, a missing direction or a blank category excludes a record
/// here; a record with a missing date still counts toward its category.
pub fn build_category_breakdown(transactions: &[Transaction], threshold: f64) -> ByDirection<CategoryBreakdown> {
    ByDirection::from_fn(|direction| {
        let totals = category_totals(transactions.iter().filter(|t| t.direction == Some(direction)));
        let breakdown = collapse_small_categories(totals, threshold);
        debug!(%direction, slices = breakdown.len(), "category breakdown");
        breakdown
    })
}

/// Sum amounts per category, in order of each category's first appearance.
/// Rows with a blank category get no slice.
pub fn category_totals<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Vec<CategoryTotal> {
    let mut index: HashMap<&'a str, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for txn in transactions {
        let Some(amount) = txn.amount else {
            continue;
        };
        if txn.category.trim().is_empty() {
            continue;
        }
        match index.get(txn.category.as_str()) {
            Some(&i) => totals[i].amount += amount,
            None => {
                index.insert(txn.category.as_str(), totals.len());
                totals.push(CategoryTotal {
                    category: txn.category.clone(),
                    amount,
                });
            }
        }
    }

    totals
}

/// Keep categories whose share is `>= threshold`; fold the rest into [`OTHER_CATEGORY`],
/// appended last and only when something was folded.
///
/// A zero total yields an empty breakdown. An input category already named
/// [`OTHER_CATEGORY`] is folded too, whatever its share, so the label appears at
/// most once and always last. That is the one case where a category at or above
/// the threshold is not kept on its own.
pub fn collapse_small_categories(totals: Vec<CategoryTotal>, threshold: f64) -> CategoryBreakdown {
    let total: f64 = totals.iter().map(|c| c.amount).sum();
    if total == 0.0 {
        return CategoryBreakdown::default();
    }

    let mut kept = Vec::with_capacity(totals.len());
    let mut other = 0.0;
    let mut collapsed = 0usize;

    for c in totals {
        if c.amount / total < threshold || c.category == OTHER_CATEGORY {
            other += c.amount;
            collapsed += 1;
        } else {
            kept.push(c);
        }
    }

    if collapsed > 0 {
        kept.push(CategoryTotal {
            category: OTHER_CATEGORY.to_string(),
            amount: other,
        });
    }

    CategoryBreakdown::new(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kopilka_core::Direction;

    fn spend(category: &str, amount: f64) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 5, 1),
            Some(amount),
            Direction::Expense,
            category,
            "",
        )
    }

    fn names(b: &CategoryBreakdown) -> Vec<&str> {
        b.entries().iter().map(|e| e.category.as_str()).collect()
    }

    #[test]
    fn test_first_appearance_order_other_last() {
        let txns = vec![
            spend("Транспорт", 300.0),
            spend("Кино", 10.0),
            spend("Еда", 500.0),
            spend("Транспорт", 100.0),
            spend("Книги", 20.0),
            spend("Учеба", 70.0),
        ];
        let b = build_category_breakdown(&txns, DEFAULT_THRESHOLD).expense;
        // total 1000: Кино 1%, Книги 2% collapse
        assert_eq!(names(&b), vec!["Транспорт", "Еда", "Учеба", OTHER_CATEGORY]);
        assert_eq!(b.get("Транспорт"), Some(400.0));
        assert_eq!(b.other(), Some(30.0));
        assert_eq!(b.total(), 1000.0);
    }

    #[test]
    fn test_threshold_boundary_is_kept() {
        // exactly 5% stays, just under goes
        let totals = vec![
            CategoryTotal { category: "A".into(), amount: 950.0 },
            CategoryTotal { category: "B".into(), amount: 50.0 },
        ];
        let b = collapse_small_categories(totals, 0.05);
        assert_eq!(names(&b), vec!["A", "B"]);
        assert_eq!(b.other(), None);

        let totals = vec![
            CategoryTotal { category: "A".into(), amount: 951.0 },
            CategoryTotal { category: "B".into(), amount: 49.0 },
        ];
        let b = collapse_small_categories(totals, 0.05);
        assert_eq!(names(&b), vec!["A", OTHER_CATEGORY]);
        assert_eq!(b.other(), Some(49.0));
    }

    #[test]
    fn test_everything_small_collapses_to_single_bucket() {
        let totals: Vec<CategoryTotal> = (0..25)
            .map(|i| CategoryTotal { category: format!("c{i}"), amount: 4.0 })
            .collect();
        let b = collapse_small_categories(totals, 0.05);
        assert_eq!(b.len(), 1);
        assert_eq!(b.entries()[0].category, OTHER_CATEGORY);
        assert_eq!(b.entries()[0].amount, 100.0);
    }

    #[test]
    fn test_zero_total_is_empty() {
        assert!(build_category_breakdown(&[], DEFAULT_THRESHOLD).income.is_empty());
        let b = build_category_breakdown(&[spend("A", 0.0), spend("B", 0.0)], DEFAULT_THRESHOLD);
        assert!(b.expense.is_empty());
    }

    #[test]
    fn test_missing_amount_excluded_missing_date_kept() {
        let mut undated = spend("B", 200.0);
        undated.date = None;
        let mut no_amount = spend("B", 0.0);
        no_amount.amount = None;
        let txns = vec![spend("B", 500.0), undated, no_amount];
        let b = build_category_breakdown(&txns, DEFAULT_THRESHOLD);
        assert_eq!(b.expense.get("B"), Some(700.0));
    }

    #[test]
    fn test_blank_category_gets_no_slice() {
        let txns = vec![spend("Еда", 500.0), spend("", 300.0), spend("  ", 200.0)];
        let b = build_category_breakdown(&txns, DEFAULT_THRESHOLD).expense;
        assert_eq!(names(&b), vec!["Еда"]);
        assert_eq!(b.total(), 500.0);
    }

    #[test]
    fn test_unclassified_rows_excluded() {
        let txns = vec![spend("Еда", 500.0), Transaction::new(None, Some(900.0), None, "Еда", "перевод")];
        let b = build_category_breakdown(&txns, DEFAULT_THRESHOLD);
        assert_eq!(b.expense.get("Еда"), Some(500.0));
        assert!(b.income.is_empty());
    }

    #[test]
    fn test_categories_are_case_sensitive() {
        let txns = vec![spend("Food", 50.0), spend("food", 50.0)];
        let b = build_category_breakdown(&txns, DEFAULT_THRESHOLD).expense;
        assert_eq!(names(&b), vec!["Food", "food"]);
    }

    #[test]
    fn test_literal_other_category_merges_into_bucket() {
        let txns = vec![spend("Еда", 80.0), spend(OTHER_CATEGORY, 20.0)];
        let b = build_category_breakdown(&txns, DEFAULT_THRESHOLD).expense;
        assert_eq!(names(&b), vec!["Еда", OTHER_CATEGORY]);
        assert_eq!(b.other(), Some(20.0));
    }

    #[test]
    fn test_directions_are_independent() {
        let mut salary = spend("Работа", 1000.0);
        salary.direction = Some(Direction::Income);
        let txns = vec![salary, spend("Еда", 10.0)];
        let b = build_category_breakdown(&txns, DEFAULT_THRESHOLD);
        assert_eq!(names(&b.income), vec!["Работа"]);
        assert_eq!(names(&b.expense), vec!["Еда"]);
    }
}
