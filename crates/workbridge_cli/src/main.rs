//! Command-line entry point for Workbridge.
//!
//! # Responsibility
//! - Wire configuration, logging, the SQLite store and the HTTP document
//!   client into the core services.
//! - Print each command's report as JSON on stdout.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;
use workbridge_core::repo::user_repo::SqliteUserRepository;
use workbridge_core::repo::work_item_repo::SqliteWorkItemRepository;
use workbridge_core::{
    init_from_config, load_config, open_db, AssignmentService, ExportService, HttpDocumentClient,
    WorkbridgeConfig,
};

#[derive(Debug, Parser)]
#[command(
    name = "workbridge",
    version,
    about = "Assign work and mirror meetings to the team workspace"
)]
struct Cli {
    /// SQLite database file.
    #[arg(long, default_value = "workbridge.sqlite3")]
    db: PathBuf,

    /// TOML configuration file; defaults apply when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Assign every unassigned work item to a qualified user.
    Assign,
    /// Push a meeting's title and body to its description page.
    ExportDescription {
        #[arg(long)]
        meeting: Uuid,
    },
    /// Create or update a meeting's task board.
    ExportBoard {
        #[arg(long)]
        meeting: Uuid,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref()).context("failed to load configuration")?;
    setup_logging(&config)?;

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database {}", cli.db.display()))?;

    match cli.command {
        Command::Assign => {
            let service = AssignmentService::new(
                SqliteWorkItemRepository::try_new(&conn)?,
                SqliteUserRepository::try_new(&conn)?,
            );
            print_json(&service.assign_pending()?)
        }
        Command::ExportDescription { meeting } => {
            let client = HttpDocumentClient::new(&config.document_service)?;
            let service = ExportService::try_new(&conn, client)?;
            print_json(&service.export_description(meeting)?)
        }
        Command::ExportBoard { meeting } => {
            let client = HttpDocumentClient::new(&config.document_service)?;
            let service = ExportService::try_new(&conn, client)?;
            print_json(&service.export_task_board(meeting)?)
        }
    }
}

fn setup_logging(config: &WorkbridgeConfig) -> Result<()> {
    let started = init_from_config(&config.logging).context("failed to initialize logging")?;
    if started {
        log::info!(
            "event=cli_start module=cli status=ok version={}",
            workbridge_core::core_version()
        );
    }
    Ok(())
}

fn print_json(report: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
