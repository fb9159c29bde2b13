//! Per-day income/expense totals for the time-series chart.

use kopilka_core::{ByDirection, DailySeries, Transaction};

/// Sum amounts per calendar day, separately for income and expense.
///
/// Records missing the date, the amount or the direction are left out. Days with
/// no matching records get no entry.
pub fn build_daily_series(transactions: &[Transaction]) -> ByDirection<DailySeries> {
    let mut out: ByDirection<DailySeries> = ByDirection::default();
    for txn in transactions {
        if let (Some(date), Some(amount), Some(direction)) = (txn.date, txn.amount, txn.direction) {
            out.get_mut(direction).add(date, amount);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use kopilka_core::Direction;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn txn(date: Option<NaiveDate>, amount: Option<f64>, direction: Direction) -> Transaction {
        Transaction::new(date, amount, direction, "X", "")
    }

    #[test]
    fn test_groups_by_day_and_direction() {
        let txns = vec![
            txn(Some(d(2)), Some(100.0), Direction::Income),
            txn(Some(d(1)), Some(40.0), Direction::Expense),
            txn(Some(d(1)), Some(60.0), Direction::Expense),
            txn(Some(d(2)), Some(5.0), Direction::Expense),
        ];
        let series = build_daily_series(&txns);

        assert_eq!(series.income.iter().collect::<Vec<_>>(), vec![(d(2), 100.0)]);
        assert_eq!(
            series.expense.iter().collect::<Vec<_>>(),
            vec![(d(1), 100.0), (d(2), 5.0)]
        );
    }

    #[test]
    fn test_missing_fields_excluded() {
        let txns = vec![
            txn(None, Some(200.0), Direction::Expense),
            txn(Some(d(3)), None, Direction::Expense),
            txn(Some(d(3)), Some(1.0), Direction::Expense),
            Transaction::new(Some(d(3)), Some(50.0), None, "X", ""),
        ];
        let series = build_daily_series(&txns);
        assert_eq!(series.expense.len(), 1);
        assert_eq!(series.expense.get(d(3)), Some(1.0));
        assert!(series.income.is_empty());
    }

    #[test]
    fn test_sparse_no_gap_filling() {
        let txns = vec![
            txn(Some(d(1)), Some(1.0), Direction::Income),
            txn(Some(d(10)), Some(1.0), Direction::Income),
        ];
        let series = build_daily_series(&txns);
        assert_eq!(series.income.len(), 2);
        assert_eq!(series.income.get(d(5)), None);
    }

    #[test]
    fn test_empty_input() {
        let series = build_daily_series(&[]);
        assert!(series.income.is_empty());
        assert!(series.expense.is_empty());
    }
}
