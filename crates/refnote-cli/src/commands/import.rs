use crate::commands::{print_json, Context};
use anyhow::{Context as _, Result};
use clap::Args;
use refnote_ingest::{harvest_dir, parse_file, HarvestReport};
use serde::Serialize;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Note file or directory of note files
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
struct ImportReport {
    sources: usize,
    entries: usize,
    references: usize,
    skipped: usize,
}

pub fn import(ctx: &Context<'_>, args: ImportArgs) -> Result<()> {
    let report = if args.path.is_dir() {
        harvest_dir(&args.path)
            .with_context(|| format!("harvest directory {}", args.path.display()))?
    } else {
        let parsed = parse_file(&args.path)
            .with_context(|| format!("parse note file {}", args.path.display()))?;
        HarvestReport {
            sources: vec![parsed],
            skipped: 0,
        }
    };

    let mut totals = ImportReport {
        sources: 0,
        entries: 0,
        references: 0,
        skipped: report.skipped,
    };

    for parsed in &report.sources {
        for warning in &parsed.warnings {
            warn!(file = %parsed.origin.display(), "{}", warning);
        }
        let summary = ctx
            .store
            .sources()
            .import(&parsed.import)
            .with_context(|| format!("import {}", parsed.origin.display()))?;
        totals.sources += 1;
        totals.entries += summary.entries;
        totals.references += summary.references;
    }

    if ctx.json {
        return print_json(&totals);
    }

    println!(
        "imported {} source(s), {} entries, {} reference(s); skipped {} file(s)",
        totals.sources, totals.entries, totals.references, totals.skipped
    );
    Ok(())
}
