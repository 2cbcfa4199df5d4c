use crate::domain::{BibRef, TagName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rowid of an entry in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub i64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tagged idea/note entry attached to a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub source: BibRef,
    /// Locator within the source, e.g. a page or section.
    pub at: Option<String>,
    pub info: String,
    /// Anchor label other entries can point at.
    pub label: Option<String>,
    pub tags: Vec<TagName>,
}
