use anyhow::Result;
use refnote_config::AppConfig;
use refnote_core::filter::{parse_filter, FilterExpr};
use refnote_store::Store;
use serde::Serialize;
use std::io::{self, Write};
use tracing::warn;

pub mod backup;
pub mod check;
pub mod completions;
pub mod dump;
pub mod entries;
pub mod export;
pub mod import;
pub mod sources;
pub mod tags;

pub struct Context<'a> {
    pub store: &'a Store,
    pub json: bool,
    pub config: &'a AppConfig,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// Parses a filter expression argument, surfacing any characters the
/// lexer skipped as warnings.
pub fn parse_filter_arg(text: &str) -> Result<FilterExpr> {
    let parsed = parse_filter(text)?;
    for warning in &parsed.warnings {
        warn!("{}", warning);
    }
    Ok(parsed.expr)
}
