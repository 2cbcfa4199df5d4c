pub mod domain;
pub mod dto;
pub mod error;
pub mod filter;
pub mod rules;

pub use domain::*;
pub use dto::{EntryDraft, SourceImport};
pub use error::CoreError;
pub use filter::{parse_filter, FilterError, FilterExpr, ParsedFilter};
pub use rules::*;
