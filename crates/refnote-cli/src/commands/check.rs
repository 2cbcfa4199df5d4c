use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use anyhow::Result;
use clap::Args;
use refnote_core::rules::{low_use_tags, typo_groups};
use serde::Serialize;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Similarity ratio (0..=1) above which tags count as likely typos
    #[arg(long)]
    pub tolerance: Option<f64>,
    /// Flag tags used fewer times than this
    #[arg(long)]
    pub min_uses: Option<i64>,
}

#[derive(Debug, Serialize)]
struct TagUseDto {
    name: String,
    count: i64,
}

#[derive(Debug, Serialize)]
struct CheckReport {
    typo_groups: Vec<Vec<TagUseDto>>,
    low_use: Vec<TagUseDto>,
}

/// Audits the tag vocabulary for likely typos and rarely used tags.
pub fn check(ctx: &Context<'_>, args: CheckArgs) -> Result<()> {
    let tolerance = args.tolerance.unwrap_or(ctx.config.audit.typo_tolerance);
    if !(0.0..=1.0).contains(&tolerance) {
        return Err(invalid_input(format!(
            "tolerance must be within 0..=1, got {}",
            tolerance
        )));
    }
    let min_uses = args.min_uses.unwrap_or(ctx.config.audit.min_tag_uses);

    let usage = ctx.store.tags().list_with_counts()?;
    let groups = typo_groups(&usage, tolerance);
    let rare = low_use_tags(&usage, min_uses);

    let report = CheckReport {
        typo_groups: groups
            .into_iter()
            .map(|group| group.into_iter().map(to_dto).collect())
            .collect(),
        low_use: rare.into_iter().map(to_dto).collect(),
    };

    if ctx.json {
        return print_json(&report);
    }

    if report.typo_groups.is_empty() {
        println!("no suspicious tag pairs");
    } else {
        println!("possible typos:");
        for group in &report.typo_groups {
            let names: Vec<&str> = group.iter().map(|tag| tag.name.as_str()).collect();
            println!("  {}", names.join(", "));
        }
    }

    if report.low_use.is_empty() {
        println!("no rarely used tags");
    } else {
        println!("rarely used:");
        for tag in &report.low_use {
            println!("  {} ({})", tag.name, tag.count);
        }
    }
    Ok(())
}

fn to_dto(usage: (refnote_core::domain::TagName, i64)) -> TagUseDto {
    TagUseDto {
        name: usage.0.as_str().to_string(),
        count: usage.1,
    }
}
