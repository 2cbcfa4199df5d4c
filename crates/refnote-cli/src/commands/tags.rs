use crate::commands::{parse_filter_arg, print_json, Context};
use anyhow::Result;
use clap::{Args, Subcommand};
use refnote_core::domain::TagName;
use serde::Serialize;

#[derive(Debug, Subcommand)]
pub enum TagsCommand {
    Ls(TagListArgs),
    Rm(TagRemoveArgs),
    Mv(TagRenameArgs),
}

#[derive(Debug, Args)]
pub struct TagListArgs {}

#[derive(Debug, Args)]
pub struct TagRemoveArgs {
    /// Remove every tag whose name matches this filter expression
    #[arg(long)]
    pub filter: String,
}

#[derive(Debug, Args)]
pub struct TagRenameArgs {
    pub old: String,
    pub new: String,
}

#[derive(Debug, Serialize)]
struct TagCountDto {
    name: String,
    count: i64,
}

pub fn list_tags(ctx: &Context<'_>, _args: TagListArgs) -> Result<()> {
    let tags = ctx.store.tags().list_with_counts()?;
    let items: Vec<TagCountDto> = tags
        .into_iter()
        .map(|(tag, count)| TagCountDto {
            name: tag.as_str().to_string(),
            count,
        })
        .collect();

    if ctx.json {
        return print_json(&items);
    }

    if items.is_empty() {
        println!("no tags");
        return Ok(());
    }

    for item in items {
        println!("{} ({})", item.name, item.count);
    }
    Ok(())
}

pub fn remove_tags(ctx: &Context<'_>, args: TagRemoveArgs) -> Result<()> {
    let expr = parse_filter_arg(&args.filter)?;
    let removed = ctx.store.tags().delete_matching(&expr)?;

    if ctx.json {
        print_json(&serde_json::json!({ "removed": removed }))?;
    } else {
        println!("removed {} tag(s)", removed);
    }
    Ok(())
}

pub fn rename_tag(ctx: &Context<'_>, args: TagRenameArgs) -> Result<()> {
    let old = TagName::new(&args.old)?;
    let new = TagName::new(&args.new)?;
    ctx.store.tags().rename(&old, &new)?;

    if ctx.json {
        print_json(&serde_json::json!({ "old": old.as_str(), "new": new.as_str() }))?;
    } else {
        println!("renamed {} to {}", old, new);
    }
    Ok(())
}
