//! kopilka-finance: daily and category aggregation, chart palette, and LLM prompt formatting

pub mod analysis;
pub mod categories;
pub mod daily;
pub mod palette;
pub mod prompt;

pub use analysis::{Analysis, Totals};
pub use categories::{DEFAULT_THRESHOLD, build_category_breakdown, collapse_small_categories};
pub use daily::build_daily_series;
pub use prompt::{PromptError, PromptKind, SYSTEM_ROLE, format_prompt, render_statement};
