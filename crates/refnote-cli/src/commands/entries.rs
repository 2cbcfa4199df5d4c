use crate::commands::{parse_filter_arg, print_json, Context};
use crate::render::console::{render_table, Column};
use anyhow::Result;
use clap::{Args, Subcommand};
use refnote_core::domain::{BibRef, Entry};
use refnote_store::query::EntryQuery;
use serde::Serialize;

#[derive(Debug, Subcommand)]
pub enum EntriesCommand {
    Ls(EntryListArgs),
}

#[derive(Debug, Args)]
pub struct EntryListArgs {
    /// Tag filter expression, e.g. "fpga & /draft*"
    #[arg(long)]
    pub filter: Option<String>,
    /// Restrict to one or more sources
    #[arg(long = "source")]
    pub sources: Vec<String>,
}

#[derive(Debug, Serialize)]
struct EntryDto {
    id: i64,
    source: String,
    at: Option<String>,
    info: String,
    label: Option<String>,
    tags: Vec<String>,
}

impl From<Entry> for EntryDto {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id.0,
            source: entry.source.as_str().to_string(),
            at: entry.at,
            info: entry.info,
            label: entry.label,
            tags: entry.tags.iter().map(|t| t.as_str().to_string()).collect(),
        }
    }
}

const LIST_COLUMNS: [Column; 4] = [
    Column::new("Source", 14),
    Column::new("At", 10),
    Column::new("Info", 46),
    Column::new("Tags", 20),
];

pub fn build_query(filter: Option<&str>, sources: &[String]) -> Result<EntryQuery> {
    let mut query = EntryQuery::default();
    for raw in sources {
        query.sources.push(BibRef::new(raw)?);
    }
    if let Some(text) = filter {
        query.filter = Some(parse_filter_arg(text)?);
    }
    Ok(query)
}

pub fn list_entries(ctx: &Context<'_>, args: EntryListArgs) -> Result<()> {
    let query = build_query(args.filter.as_deref(), &args.sources)?;
    let entries = ctx.store.entries().list(&query)?;
    let items: Vec<EntryDto> = entries.into_iter().map(EntryDto::from).collect();

    if ctx.json {
        return print_json(&items);
    }

    if items.is_empty() {
        println!("no entries");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = items
        .into_iter()
        .map(|item| {
            vec![
                item.source,
                item.at.unwrap_or_default(),
                item.info,
                item.tags.join(", "),
            ]
        })
        .collect();
    print!("{}", render_table(&LIST_COLUMNS, &rows));
    Ok(())
}
