use kopilka_core::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DATE_COLUMN: &str = "Дата";
pub const AMOUNT_COLUMN: &str = "Сумма";
pub const DIRECTION_COLUMN: &str = "Доходы/Расходы";
pub const CATEGORY_COLUMN: &str = "Категория";
/// Optional; rows without it get an empty description
pub const DESCRIPTION_COLUMN: &str = "Описание";

/// Columns a statement must carry, in display order
pub const REQUIRED_COLUMNS: [&str; 4] = [DATE_COLUMN, AMOUNT_COLUMN, DIRECTION_COLUMN, CATEGORY_COLUMN];

/// One uncoerced input row: column name -> cell text
pub type RawRow = HashMap<String, String>;

/// Output of ingestion: every row in file order, plus how many had cells coerced to missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IngestReport {
    pub transactions: Vec<Transaction>,
    /// Rows seen in the input
    pub rows_read: usize,
    pub missing_date: usize,
    pub missing_amount: usize,
    /// Rows with at least one coerced cell (date, amount or direction). They are still in `transactions`.
    pub flagged: usize,
    /// Rows whose `Доходы/Расходы` was neither label; kept with `direction: None`
    pub unknown_direction: usize,
}

impl IngestReport {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}
