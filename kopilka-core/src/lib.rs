//! kopilka-core: shared types for the Kopilka budget assistant

pub mod locale;
pub mod profile;
pub mod reference;
pub mod series;
pub mod transaction;

pub use locale::DateLocale;
pub use profile::{City, Country, SocialStatus, offers_student_guides};
pub use reference::{NAME_COLUMN, ReferenceEntry, ReferenceTable};
pub use series::{ByDirection, CategoryBreakdown, CategoryTotal, DailySeries, OTHER_CATEGORY};
pub use transaction::{Direction, Transaction};
