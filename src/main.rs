// Entrypoint for the `coda` CLI.
// - Loads `.env`, sets up logging, builds the client and dispatches the verb.
// - A structured error from the store is printed as-is; anything else goes
//   through `anyhow` and ends the process with exit code 1.

use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use coda_cli::api::CodaClient;
use coda_cli::commands;
use coda_cli::config::CodaConfig;
use coda_cli::error::CodaError;
use coda_cli::ui::{with_spinner, SelectChooser};

/// CLI tool for retrieving coda data
#[derive(Parser)]
#[command(name = "coda", version, about = "CLI tool for retrieving coda data")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists rows from the selected table
    #[command(alias = "lp")]
    List {
        /// Table to list from
        table: String,
        /// Limit the amount of rows returned
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// List all tables
    ListTables,
    /// Lists out the columns on a given table
    ListColumns {
        /// The id or name of the table
        table: String,
        /// Limit the amount of columns in the response
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// List all entities
    ListEntities {
        /// Limit the number of returned rows
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Create a new entity
    CreateEntity {
        /// Name of the entity
        name: String,
        /// Type of the entity
        #[arg(value_name = "TYPE")]
        kind: Option<String>,
    },
    /// Create a new building and its entity
    CreateBuilding {
        /// Name of the building
        name: String,
    },
    /// Create a new project on a building entity
    CreateProject {
        /// Project title
        title: String,
        /// Building name, if you know it; you are asked otherwise
        building: Option<String>,
    },
    /// Get a specific column of a given table
    GetColumn {
        /// Table name
        table: String,
        /// Column name
        column: String,
    },
    /// Returns the coda user associated with the access key you have
    Whoami,
    /// Fill rows with an empty _Hash with a fresh uuid. Default tables:
    /// Buildings, Projects, Jobs, Signs, Sign Types, Layers
    FillHashes {
        /// List of tables to check
        #[arg(short, long, num_args = 1..)]
        tables: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = CodaClient::new(&CodaConfig::from_env()).context("failed to build coda client")?;

    if let Err(err) = run(cli.command, &client) {
        if let Some(CodaError::Remote { error, .. }) = err.downcast_ref::<CodaError>() {
            print_json(error)?;
            process::exit(1);
        }
        return Err(err);
    }
    Ok(())
}

fn run(command: Commands, client: &CodaClient) -> anyhow::Result<()> {
    match command {
        Commands::List { table, limit } => {
            let names = with_spinner("Fetching rows...", || {
                commands::list_row_names(client, &table, limit)
            })?;
            print_lines(&names);
        }
        Commands::ListTables => {
            let names = with_spinner("Fetching tables...", || commands::list_table_names(client))?;
            print_lines(&names);
        }
        Commands::ListColumns { table, limit } => {
            let columns = with_spinner("Fetching columns...", || {
                commands::list_columns(client, &table, limit)
            })?;
            print_json(&columns)?;
        }
        Commands::ListEntities { limit } => {
            let names = with_spinner("Fetching entities...", || {
                commands::list_entity_names(client, limit)
            })?;
            print_lines(&names);
        }
        Commands::CreateEntity { name, kind } => {
            let ack = with_spinner("Creating entity...", || {
                commands::create_entity(client, &name, kind.as_deref())
            })?;
            print_json(&ack)?;
        }
        Commands::CreateBuilding { name } => {
            let created = with_spinner("Creating building...", || {
                commands::create_building(client, &name)
            })?;
            println!("entity:");
            print_json(&created.entity)?;
            println!("building:");
            print_json(&created.building)?;
        }
        Commands::CreateProject { title, building } => {
            // No spinner here: the resolver may need the terminal for a prompt.
            let mut chooser = SelectChooser;
            let created =
                commands::create_project(client, &title, building.as_deref(), &mut chooser)?;
            println!("building: {}", created.building);
            print_json(&created.ack)?;
        }
        Commands::GetColumn { table, column } => {
            let column = with_spinner("Fetching column...", || {
                commands::get_column(client, &table, &column)
            })?;
            print_json(&column)?;
        }
        Commands::Whoami => {
            let identity = with_spinner("Fetching identity...", || commands::whoami(client))?;
            if let Some(identity) = identity {
                print_json(&identity)?;
            }
        }
        Commands::FillHashes { tables } => {
            let reports = with_spinner("Filling hashes...", || {
                commands::fill_hashes(client, &tables)
            });
            let mut failed = 0;
            for report in &reports {
                match &report.error {
                    None => println!("table: {}, updated: {} rows", report.table, report.updated),
                    Some(error) => {
                        failed += 1;
                        println!(
                            "table: {}, updated: {} rows, stopped: {}",
                            report.table, report.updated, error
                        );
                    }
                }
            }
            if failed > 0 {
                anyhow::bail!("{} of {} tables could not be fully swept", failed, reports.len());
            }
        }
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
