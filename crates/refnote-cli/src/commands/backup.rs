use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct BackupArgs {
    /// Destination file for the backup copy
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
struct BackupReport {
    output: String,
    size_bytes: u64,
}

pub fn backup(ctx: &Context<'_>, args: BackupArgs) -> Result<()> {
    ctx.store
        .backup_to(&args.path)
        .with_context(|| format!("backup database to {}", args.path.display()))?;

    let size = fs::metadata(&args.path)
        .with_context(|| format!("stat backup file {}", args.path.display()))?
        .len();

    if ctx.json {
        return print_json(&BackupReport {
            output: args.path.display().to_string(),
            size_bytes: size,
        });
    }

    println!("backup written to {}", args.path.display());
    Ok(())
}
