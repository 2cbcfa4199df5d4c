pub mod entry;
pub mod source;
pub mod tag;

pub use entry::{Entry, EntryId};
pub use source::{BibRef, Source};
pub use tag::{is_valid_tag_name, TagName};
