//! kopilka-ingest: statement ingestion with per-cell coercion, and reference table loading.

pub mod error;
pub mod parsers;
pub mod reference;
pub mod statement;
pub mod types;

pub use error::IngestError;
pub use reference::{load_reference_table, read_reference_table};
pub use statement::{ingest_rows, read_transactions, read_transactions_path};
pub use types::{IngestReport, RawRow, REQUIRED_COLUMNS};
