use anyhow::Error;
use refnote_config::ConfigError;
use refnote_core::filter::FilterError;
use refnote_core::CoreError;
use refnote_ingest::IngestError;
use refnote_store::error::{StoreError, StoreErrorKind};
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            });
        }
        if let Some(store_err) = cause.downcast_ref::<StoreError>() {
            return ExitCode::from(store_exit_code(store_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(ingest_err) = cause.downcast_ref::<IngestError>() {
            return ExitCode::from(ingest_exit_code(ingest_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
        if let Some(_filter_err) = cause.downcast_ref::<FilterError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn store_exit_code(err: &StoreError) -> u8 {
    match err.kind() {
        StoreErrorKind::NotFound => EXIT_NOT_FOUND,
        StoreErrorKind::Core
        | StoreErrorKind::Filter
        | StoreErrorKind::InvalidDataPath
        | StoreErrorKind::InvalidBackupPath
        | StoreErrorKind::InvalidColumn => EXIT_INVALID_INPUT,
        StoreErrorKind::MissingHomeDir
        | StoreErrorKind::Migration
        | StoreErrorKind::Sql
        | StoreErrorKind::Io => EXIT_FAILURE,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidTypoTolerance(_)
        | ConfigError::InvalidMinTagUses(_)
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn ingest_exit_code(err: &IngestError) -> u8 {
    match err {
        IngestError::Io(_) => EXIT_FAILURE,
        IngestError::Core { .. }
        | IngestError::MissingMagic { .. }
        | IngestError::MissingHeader { .. }
        | IngestError::MalformedEntry { .. } => EXIT_INVALID_INPUT,
    }
}
