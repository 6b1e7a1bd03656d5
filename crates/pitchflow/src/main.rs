//! Pitchflow launcher
//!
//! - **schema**: infer a warehouse schema from a CSV events export
//! - **fetch**: pull team statistics from the statistics API
//! - **handle / aggregate**: run the ingestion pipeline against the local
//!   object store and warehouse

use anyhow::Result;
use clap::{Parser, Subcommand};
use pitchflow_logging::{init_logging, LogConfig};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

use cli::context::CliContext;

#[derive(Parser, Debug)]
#[command(name = "pitchflow", about = "Football statistics pipeline and CSV schema inference")]
struct Cli {
    /// Enable verbose logging (debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Pipeline config file (default: $PITCHFLOW_HOME/config.toml)
    #[arg(long, global = true, env = "PITCHFLOW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Infer a warehouse schema from a CSV file
    Schema {
        /// CSV file with a header row
        #[arg(short, long, default_value = "Dinamo_Bucuresti_2024_2025_events.csv")]
        input: PathBuf,

        /// Where to write the schema JSON
        #[arg(short, long, default_value = "bigquery_schema_inferred.json")]
        output: PathBuf,

        /// Print the schema as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Fetch team statistics into a landing file (needs an API key)
    Fetch {
        /// Team id (default from config)
        #[arg(long)]
        team: Option<u32>,

        /// League id (default from config)
        #[arg(long)]
        league: Option<u32>,

        /// Season year (default from config)
        #[arg(long)]
        season: Option<i32>,

        /// Output directory (default: staging directory)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Handle a trigger: land, upload, load and aggregate statistics records
    Handle {
        /// Push envelope JSON file
        #[arg(long, conflicts_with = "message", required_unless_present = "message")]
        envelope: Option<PathBuf>,

        /// Decoded trigger text, e.g. job_started
        #[arg(long)]
        message: Option<String>,

        /// Statistics records (JSON document or one object per line)
        #[arg(long)]
        records: PathBuf,

        /// Print the aggregates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Recompute the per-team averages table from the raw table
    Aggregate {
        /// Print the aggregates as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,
}

fn run_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Schema {
            input,
            output,
            json,
        } => cli::schema::run(cli::schema::SchemaArgs {
            input,
            output,
            json,
        }),

        Commands::Fetch {
            team,
            league,
            season,
            out_dir,
        } => {
            let ctx = CliContext::load(cli.config.as_deref())?;
            cli::fetch::run(
                &ctx,
                cli::fetch::FetchArgs {
                    team,
                    league,
                    season,
                    out_dir,
                },
            )
        }

        Commands::Handle {
            envelope,
            message,
            records,
            json,
        } => {
            let ctx = CliContext::load(cli.config.as_deref())?;
            let trigger = match (envelope, message) {
                (Some(path), _) => cli::handle::TriggerSource::Envelope(path),
                (None, Some(text)) => cli::handle::TriggerSource::Message(text),
                (None, None) => anyhow::bail!("one of --envelope or --message is required"),
            };
            cli::handle::run(
                &ctx,
                cli::handle::HandleArgs {
                    trigger,
                    records,
                    json,
                },
            )
        }

        Commands::Aggregate { json } => {
            let ctx = CliContext::load(cli.config.as_deref())?;
            cli::handle::run_aggregate(&ctx, json)
        }

        Commands::Config => {
            let ctx = CliContext::load(cli.config.as_deref())?;
            cli::config::run(&ctx)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = init_logging(LogConfig {
        app_name: "pitchflow",
        verbose: cli.verbose,
    }) {
        eprintln!("Warning: failed to initialize logging: {:#}", err);
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{:?}", err);
            ExitCode::from(1)
        }
    }
}
