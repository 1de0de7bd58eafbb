//! TabMate core: pure data model and the tab filter.
mod category;
mod filter;
mod record;
mod result;

pub use category::{Category, NO_TITLE_SENTINEL};
pub use filter::{apply, FilterField, FilterRule, FilterRuleError};
pub use record::TabRecord;
pub use result::{FailureStatus, FetchFailure, FetchResult};
