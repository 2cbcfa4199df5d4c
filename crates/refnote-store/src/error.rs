use refnote_core::filter::FilterError;
use refnote_core::CoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sqlite error: {0}")]
    Sql(#[from] rusqlite::Error),
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("filter error: {0}")]
    Filter(#[from] FilterError),
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("invalid data path: {0}")]
    InvalidDataPath(PathBuf),
    #[error("invalid backup path (matches database): {0}")]
    InvalidBackupPath(PathBuf),
    #[error("invalid column reference: {0:?}")]
    InvalidColumn(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
    Io,
    Sql,
    Core,
    Filter,
    MissingHomeDir,
    NotFound,
    Migration,
    InvalidDataPath,
    InvalidBackupPath,
    InvalidColumn,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            StoreError::Io(_) => StoreErrorKind::Io,
            StoreError::Sql(_) => StoreErrorKind::Sql,
            StoreError::Core(_) => StoreErrorKind::Core,
            StoreError::Filter(_) => StoreErrorKind::Filter,
            StoreError::MissingHomeDir => StoreErrorKind::MissingHomeDir,
            StoreError::NotFound(_) => StoreErrorKind::NotFound,
            StoreError::Migration(_) => StoreErrorKind::Migration,
            StoreError::InvalidDataPath(_) => StoreErrorKind::InvalidDataPath,
            StoreError::InvalidBackupPath(_) => StoreErrorKind::InvalidBackupPath,
            StoreError::InvalidColumn(_) => StoreErrorKind::InvalidColumn,
        }
    }
}
