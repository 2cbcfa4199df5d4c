use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::render::console::{render_table, Column};
use anyhow::Result;
use clap::{Args, Subcommand};
use refnote_core::domain::BibRef;
use refnote_store::repo::SourceOverview;
use serde::Serialize;

#[derive(Debug, Subcommand)]
pub enum SourcesCommand {
    Ls(SourceListArgs),
    Show(SourceShowArgs),
}

#[derive(Debug, Args)]
pub struct SourceListArgs {}

#[derive(Debug, Args)]
pub struct SourceShowArgs {
    pub bib_ref: String,
}

#[derive(Debug, Serialize)]
struct SourceDto {
    bib_ref: String,
    about: Option<String>,
    conclusion: Option<String>,
    references: Vec<String>,
    tags: Vec<String>,
}

impl From<SourceOverview> for SourceDto {
    fn from(overview: SourceOverview) -> Self {
        Self {
            bib_ref: overview.source.bib_ref.as_str().to_string(),
            about: overview.source.about,
            conclusion: overview.source.conclusion,
            references: overview.refs.iter().map(|r| r.as_str().to_string()).collect(),
            tags: overview.tags.iter().map(|t| t.as_str().to_string()).collect(),
        }
    }
}

const LIST_COLUMNS: [Column; 3] = [
    Column::new("BibRef", 16),
    Column::new("About", 40),
    Column::new("Tags", 24),
];

pub fn list_sources(ctx: &Context<'_>, _args: SourceListArgs) -> Result<()> {
    let overviews = ctx.store.sources().list()?;
    let items: Vec<SourceDto> = overviews.into_iter().map(SourceDto::from).collect();

    if ctx.json {
        return print_json(&items);
    }

    if items.is_empty() {
        println!("no sources");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = items
        .into_iter()
        .map(|item| {
            vec![
                item.bib_ref,
                item.about.unwrap_or_default(),
                item.tags.join(", "),
            ]
        })
        .collect();
    print!("{}", render_table(&LIST_COLUMNS, &rows));
    Ok(())
}

pub fn show_source(ctx: &Context<'_>, args: SourceShowArgs) -> Result<()> {
    let bib_ref = BibRef::new(&args.bib_ref)?;
    let overview = ctx
        .store
        .sources()
        .get(&bib_ref)?
        .ok_or_else(|| not_found(format!("source {}", bib_ref)))?;
    let dto = SourceDto::from(overview);

    if ctx.json {
        return print_json(&dto);
    }

    println!("bib_ref: {}", dto.bib_ref);
    if let Some(about) = dto.about.as_deref() {
        println!("about: {}", about);
    }
    if let Some(conclusion) = dto.conclusion.as_deref() {
        println!("conclusion: {}", conclusion);
    }
    if !dto.references.is_empty() {
        println!("references: {}", dto.references.join(", "));
    }
    if !dto.tags.is_empty() {
        println!("tags: {}", dto.tags.join(", "));
    }
    Ok(())
}
