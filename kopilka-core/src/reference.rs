//! Static lookup tables (parks, canteens) keyed by their `Название` column.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column every reference table is keyed by
pub const NAME_COLUMN: &str = "Название";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub name: String,
    /// Remaining cells, aligned with [`ReferenceTable::columns`]
    pub values: Vec<String>,
}

/// Immutable once built. Rows keep file order; lookup by name is O(1).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReferenceTable {
    columns: Vec<String>,
    entries: Vec<ReferenceEntry>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl ReferenceTable {
    /// Build from non-key column names and entries. A repeated name keeps its first row.
    pub fn new(columns: Vec<String>, entries: Vec<ReferenceEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (i, e) in entries.iter().enumerate() {
            index.entry(e.name.clone()).or_insert(i);
        }
        Self {
            columns,
            entries,
            index,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn get(&self, name: &str) -> Option<&ReferenceEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    /// Single cell by row name and column name
    pub fn value(&self, name: &str, column: &str) -> Option<&str> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.get(name)?.values.get(col).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
