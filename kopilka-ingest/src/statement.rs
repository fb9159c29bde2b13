//! Statement ingestion: raw rows (or a CSV file) into typed transactions.
//!
//! Expected header (any order, extra columns ignored):
//! Дата,Сумма,Доходы/Расходы,Категория[,Описание]

use std::fs::File;
use std::io::Read;
use std::path::Path;

use kopilka_core::{DateLocale, Direction, Transaction};
use tracing::{debug, info, warn};

use crate::error::{IngestError, Result};
use crate::parsers::{AmountParser, DateParser};
use crate::types::{
    AMOUNT_COLUMN, CATEGORY_COLUMN, DATE_COLUMN, DESCRIPTION_COLUMN, DIRECTION_COLUMN, IngestReport, RawRow,
    REQUIRED_COLUMNS,
};

/// Coerce raw rows into transactions.
///
/// Unparseable dates, amounts and directions become `None` and are counted in the
/// report; the row is kept. A row lacking one of the required columns fails the
/// whole request.
pub fn ingest_rows<I>(rows: I, locale: DateLocale) -> Result<IngestReport>
where
    I: IntoIterator<Item = RawRow>,
{
    let dates = DateParser::new(locale)?;
    let amounts = AmountParser::new()?;
    let mut report = IngestReport::default();

    for (i, row) in rows.into_iter().enumerate() {
        // Header is line 1 of the file
        let line = i + 2;
        report.rows_read += 1;

        let date_raw = required_cell(&row, DATE_COLUMN)?;
        let amount_raw = required_cell(&row, AMOUNT_COLUMN)?;
        let direction_raw = required_cell(&row, DIRECTION_COLUMN)?;
        let category = required_cell(&row, CATEGORY_COLUMN)?;
        let description = row.get(DESCRIPTION_COLUMN).map(String::as_str).unwrap_or("");

        let direction = Direction::from_label(direction_raw);
        if direction.is_none() {
            warn!(line, value = direction_raw, "direction is neither Доходы nor Расходы; row left out of charts");
            report.unknown_direction += 1;
        }

        let date = dates.parse(date_raw);
        if date.is_none() {
            debug!(line, value = date_raw, "date coerced to missing");
            report.missing_date += 1;
        }

        let amount = amounts.parse(amount_raw);
        if amount.is_none() {
            debug!(line, value = amount_raw, "amount coerced to missing");
            report.missing_amount += 1;
        }

        if date.is_none() || amount.is_none() || direction.is_none() {
            report.flagged += 1;
        }

        report.transactions.push(Transaction::new(
            date,
            amount,
            direction,
            category,
            description.trim(),
        ));
    }

    info!(
        rows = report.rows_read,
        kept = report.transactions.len(),
        flagged = report.flagged,
        unknown_direction = report.unknown_direction,
        locale = %dates.locale(),
        "ingested statement"
    );

    Ok(report)
}

fn required_cell<'a>(row: &'a RawRow, column: &str) -> Result<&'a str> {
    row.get(column)
        .map(String::as_str)
        .ok_or_else(|| IngestError::MissingColumn(column.to_string()))
}

/// Read a CSV statement. The header is checked for required columns before any row is read.
pub fn read_transactions<R: Read>(reader: R, locale: DateLocale) -> Result<IngestReport> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(IngestError::NoHeader);
    }

    for required in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == required) {
            return Err(IngestError::MissingColumn(required.to_string()));
        }
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        // Short rows read as empty cells rather than missing columns
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    ingest_rows(rows, locale)
}

pub fn read_transactions_path(path: impl AsRef<Path>, locale: DateLocale) -> Result<IngestReport> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_transactions(file, locale)
}
