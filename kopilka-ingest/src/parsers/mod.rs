//! Cell-level parsers. Both return `None` on failure so callers can coerce to missing.

pub mod amount;
pub mod date;

pub use amount::AmountParser;
pub use date::DateParser;
