use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Citation key of a bibliographic source, e.g. `Dean04`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BibRef(String);

impl BibRef {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        // `,` separates refs both in REFERENCES: headers and in the
        // aggregated refs column read back from the store.
        if trimmed.is_empty()
            || trimmed.chars().any(|ch| ch.is_whitespace())
            || trimmed.contains('\'')
            || trimmed.contains('"')
            || trimmed.contains(',')
        {
            return Err(CoreError::InvalidBibRef(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BibRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub bib_ref: BibRef,
    pub about: Option<String>,
    pub conclusion: Option<String>,
}
