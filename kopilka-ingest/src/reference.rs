//! Load static reference tables (parks, canteens) from CSV.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use kopilka_core::{NAME_COLUMN, ReferenceEntry, ReferenceTable};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Read a table keyed by `Название`. Rows with an empty name are skipped.
pub fn read_reference_table<R: Read>(reader: R) -> Result<ReferenceTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let key = headers
        .iter()
        .position(|h| h == NAME_COLUMN)
        .ok_or_else(|| IngestError::MissingColumn(NAME_COLUMN.to_string()))?;

    let columns: Vec<String> = headers
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != key)
        .map(|(_, h)| h.clone())
        .collect();

    let mut entries = Vec::new();
    for result in rdr.records() {
        let record = result?;
        let name = record.get(key).unwrap_or("");
        if name.is_empty() {
            continue;
        }
        let values = (0..headers.len())
            .filter(|&i| i != key)
            .map(|i| record.get(i).unwrap_or("").to_string())
            .collect();
        entries.push(ReferenceEntry {
            name: name.to_string(),
            values,
        });
    }

    debug!(rows = entries.len(), "loaded reference table");
    Ok(ReferenceTable::new(columns, entries))
}

pub fn load_reference_table(path: impl AsRef<Path>) -> Result<ReferenceTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_reference_table(file)
}
