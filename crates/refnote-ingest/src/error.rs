use refnote_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{path}: {source}")]
    Core {
        path: PathBuf,
        #[source]
        source: CoreError,
    },
    #[error("{path}: first line is not `#!refnote`")]
    MissingMagic { path: PathBuf },
    #[error("{path}: missing `{header}` header")]
    MissingHeader { path: PathBuf, header: &'static str },
    #[error("{path}:{line}: {message}")]
    MalformedEntry {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, IngestError>;
