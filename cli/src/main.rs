//! fieldkit command line
//!
//! Drives the resolution engine against a SQLite database:
//!
//!   fieldkit --db site.db import-schema --title "Post fields" --condition post fields.json
//!   fieldkit --db site.db register --entity 1 --content-type post
//!   fieldkit --db site.db save --entity 1 --kind post form.json
//!   fieldkit --db site.db resolve --entity 1
//!
//! Results are printed to stdout as pretty JSON; logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fieldkit_cli::Workspace;
use fieldkit_engine::EngineConfig;
use fieldkit_model::EntityId;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "fieldkit")]
#[command(about = "Resolve, render and save custom fields")]
struct Args {
    /// Path to the SQLite database
    #[arg(long, global = true, default_value = "fieldkit.db")]
    db: PathBuf,

    /// Path to fieldkit.toml (defaults to the working directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Store a JSON array of field groups as a schema document
    ImportSchema {
        #[arg(long)]
        title: String,
        /// Content type the document applies to (repeatable)
        #[arg(long = "condition", required = true)]
        conditions: Vec<String>,
        #[arg(long, default_value = "0")]
        position: i64,
        file: PathBuf,
    },
    /// Record an entity's content type and publication status
    Register {
        #[arg(long)]
        entity: EntityId,
        #[arg(long)]
        content_type: String,
        #[arg(long, default_value = "publish")]
        status: String,
    },
    /// Save a form given as a JSON array of [name, value] pairs
    Save {
        #[arg(long)]
        entity: EntityId,
        #[arg(long)]
        kind: String,
        file: PathBuf,
    },
    /// Resolve every field of an entity, or one by name
    Resolve {
        #[arg(long)]
        entity: EntityId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        kind: Option<String>,
    },
    /// Expand an entity's schema into form rows
    Rows {
        #[arg(long)]
        entity: EntityId,
        #[arg(long)]
        kind: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    };
    debug!("Opening {:?}", args.db);
    let workspace = Workspace::open(&args.db, config)?;

    match args.command {
        Command::ImportSchema {
            title,
            conditions,
            position,
            file,
        } => {
            let body = read(&file)?;
            let id = workspace.import_schema(&title, &conditions, &body, position)?;
            print_json(&serde_json::json!({ "document": id }))
        }
        Command::Register {
            entity,
            content_type,
            status,
        } => {
            workspace.register(entity, &content_type, &status)?;
            print_json(&serde_json::json!({ "entity": entity, "content_type": content_type, "status": status }))
        }
        Command::Save { entity, kind, file } => {
            let pairs: Vec<(String, String)> =
                serde_json::from_str(&read(&file)?).context("form file must be a JSON array of [name, value] pairs")?;
            let report = workspace.save(entity, &kind, pairs)?;
            print_json(&report)
        }
        Command::Resolve { entity, name, kind } => {
            let value = workspace.resolve(entity, kind.as_deref(), name.as_deref())?;
            print_json(&value)
        }
        Command::Rows { entity, kind } => {
            let rows = workspace.rows(entity, kind.as_deref())?;
            print_json(&rows)
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
