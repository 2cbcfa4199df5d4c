use crate::commands::{print_json, Context};
use crate::render::plain;
use anyhow::{Context as _, Result};
use clap::Args;
use refnote_store::query::EntryQuery;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Args)]
pub struct DumpArgs {
    /// Directory to write one note file per source into
    #[arg(long)]
    pub out: PathBuf,
}

#[derive(Debug, Serialize)]
struct DumpReport {
    output: String,
    files: usize,
}

/// Writes the whole database back out as ingestable note files.
pub fn dump(ctx: &Context<'_>, args: DumpArgs) -> Result<()> {
    fs::create_dir_all(&args.out)
        .with_context(|| format!("create dump directory {}", args.out.display()))?;

    let overviews = ctx.store.sources().list()?;
    let mut files = 0;
    for overview in overviews {
        let mut query = EntryQuery::default();
        query.sources.push(overview.source.bib_ref.clone());
        let entries = ctx.store.entries().list(&query)?;

        let path = args.out.join(overview.source.bib_ref.as_str());
        let rendered = plain::render_source(&overview, &entries);
        fs::write(&path, rendered)
            .with_context(|| format!("write dump file {}", path.display()))?;
        debug!(path = %path.display(), entries = entries.len(), "dumped source");
        files += 1;
    }

    if ctx.json {
        return print_json(&DumpReport {
            output: args.out.display().to_string(),
            files,
        });
    }

    println!("dumped {} source(s) to {}", files, args.out.display());
    Ok(())
}
