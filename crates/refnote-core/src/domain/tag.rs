use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated tag label. The accepted charset matches the filter
/// lexer's `TAG` token, so a `TagName` can always appear verbatim in a
/// filter expression and doubles as the allow-list at the SQL boundary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagName(String);

impl TagName {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if !is_valid_tag_name(trimmed) {
            return Err(CoreError::InvalidTagName(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `[A-Za-z_][A-Za-z0-9_-]*`
pub fn is_valid_tag_name(raw: &str) -> bool {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-')
}

#[cfg(test)]
mod tests {
    use super::{is_valid_tag_name, TagName};

    #[test]
    fn accepts_lexer_charset() {
        assert!(is_valid_tag_name("scheduling"));
        assert!(is_valid_tag_name("_draft"));
        assert!(is_valid_tag_name("map-reduce"));
        assert!(is_valid_tag_name("v2_final"));
    }

    #[test]
    fn rejects_other_characters() {
        assert!(!is_valid_tag_name(""));
        assert!(!is_valid_tag_name("2fast"));
        assert!(!is_valid_tag_name("-lead"));
        assert!(!is_valid_tag_name("a b"));
        assert!(!is_valid_tag_name("it's"));
    }

    #[test]
    fn new_trims() {
        let tag = TagName::new(" fpga ").unwrap();
        assert_eq!(tag.as_str(), "fpga");
    }

    #[test]
    fn new_rejects_invalid() {
        assert!(TagName::new("drop table").is_err());
    }
}
