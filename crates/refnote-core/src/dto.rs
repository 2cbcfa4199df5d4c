use crate::domain::{BibRef, Source, TagName};
use serde::{Deserialize, Serialize};

/// One parsed note file, ready to be applied to the store in a single
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceImport {
    pub source: Source,
    /// Sources cited in the file header.
    pub references: Vec<BibRef>,
    /// Tags applied to every entry of this file.
    pub general_tags: Vec<TagName>,
    pub entries: Vec<EntryDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub at: Option<String>,
    pub info: String,
    pub label: Option<String>,
    pub tags: Vec<TagName>,
    /// `[[Ref:...]]` citations found in the entry body.
    pub inline_refs: Vec<BibRef>,
}
