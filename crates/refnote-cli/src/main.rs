mod commands;
mod error;
mod render;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{
    backup, check, completions, dump, entries, export, import, sources, tags, Context,
};
use crate::error::{exit_code_for, report_error};
use refnote_config as config;
use refnote_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(name = "refnote", version, about = "refnote CLI")]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ingest note files from a file or a directory
    Import(import::ImportArgs),
    #[command(subcommand)]
    Sources(sources::SourcesCommand),
    #[command(subcommand)]
    Entries(entries::EntriesCommand),
    #[command(subcommand)]
    Tags(tags::TagsCommand),
    Export(export::ExportArgs),
    Dump(dump::DumpArgs),
    Check(check::CheckArgs),
    Backup(backup::BackupArgs),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Completions(args) => completions::emit(args),
        command => {
            let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
            if verbose {
                match config::resolve_config_path(config_path.clone()) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }
            let db_path =
                paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;

            if verbose {
                debug!(path = %db_path.display(), "database path resolved");
            }

            let store = Store::open(&db_path)
                .with_context(|| format!("open database {}", db_path.display()))?;
            store.migrate().with_context(|| "run migrations")?;

            let ctx = Context {
                store: &store,
                json,
                config: &app_config,
            };

            match command {
                Command::Import(args) => import::import(&ctx, args),
                Command::Sources(cmd) => match cmd {
                    sources::SourcesCommand::Ls(args) => sources::list_sources(&ctx, args),
                    sources::SourcesCommand::Show(args) => sources::show_source(&ctx, args),
                },
                Command::Entries(cmd) => match cmd {
                    entries::EntriesCommand::Ls(args) => entries::list_entries(&ctx, args),
                },
                Command::Tags(cmd) => match cmd {
                    tags::TagsCommand::Ls(args) => tags::list_tags(&ctx, args),
                    tags::TagsCommand::Rm(args) => tags::remove_tags(&ctx, args),
                    tags::TagsCommand::Mv(args) => tags::rename_tag(&ctx, args),
                },
                Command::Export(args) => export::export(&ctx, args),
                Command::Dump(args) => dump::dump(&ctx, args),
                Command::Check(args) => check::check(&ctx, args),
                Command::Backup(args) => backup::backup(&ctx, args),
                Command::Completions(_) => {
                    unreachable!("completions command handled before store initialization")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
