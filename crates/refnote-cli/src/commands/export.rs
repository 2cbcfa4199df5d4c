use crate::commands::{entries::build_query, print_json, Context};
use crate::render::{latex, plain};
use anyhow::{Context as _, Result};
use clap::{Args, ValueEnum};
use refnote_core::domain::Entry;
use refnote_store::repo::SourceOverview;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output format; defaults to the configured one
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
    /// Tag filter expression applied to entries
    #[arg(long)]
    pub filter: Option<String>,
    /// Restrict to one or more sources
    #[arg(long = "source")]
    pub sources: Vec<String>,
    /// Write to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FormatArg {
    Plain,
    Latex,
}

impl From<refnote_config::ExportFormat> for FormatArg {
    fn from(format: refnote_config::ExportFormat) -> Self {
        match format {
            refnote_config::ExportFormat::Plain => FormatArg::Plain,
            refnote_config::ExportFormat::Latex => FormatArg::Latex,
        }
    }
}

pub fn export(ctx: &Context<'_>, args: ExportArgs) -> Result<()> {
    let format = args
        .format
        .unwrap_or_else(|| ctx.config.export.default_format.into());

    let sections = collect_sections(ctx, args.filter.as_deref(), &args.sources)?;
    let rendered = match format {
        FormatArg::Plain => sections
            .iter()
            .map(|(overview, entries)| plain::render_source(overview, entries))
            .collect::<Vec<_>>()
            .join("\n"),
        FormatArg::Latex => latex::render_document(&sections),
    };

    match args.out {
        Some(path) => {
            fs::write(&path, rendered)
                .with_context(|| format!("write export to {}", path.display()))?;
            if ctx.json {
                print_json(&serde_json::json!({
                    "output": path.display().to_string(),
                    "sources": sections.len(),
                }))?;
            } else {
                println!("exported {} source(s) to {}", sections.len(), path.display());
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
        }
    }
    Ok(())
}

/// Groups the matching entries under their sources, preserving the
/// store's ordering of both.
fn collect_sections(
    ctx: &Context<'_>,
    filter: Option<&str>,
    sources: &[String],
) -> Result<Vec<(SourceOverview, Vec<Entry>)>> {
    let query = build_query(filter, sources)?;
    let entries = ctx.store.entries().list(&query)?;

    let mut grouped: BTreeMap<String, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        grouped
            .entry(entry.source.as_str().to_string())
            .or_default()
            .push(entry);
    }

    let mut sections = Vec::with_capacity(grouped.len());
    for overview in ctx.store.sources().list()? {
        let key = overview.source.bib_ref.as_str();
        if let Some(entries) = grouped.remove(key) {
            sections.push((overview, entries));
        }
    }
    Ok(sections)
}
