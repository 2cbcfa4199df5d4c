use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid tag name: {0:?}")]
    InvalidTagName(String),
    #[error("invalid bib ref: {0:?}")]
    InvalidBibRef(String),
}
