//! `pitchflow handle` and `pitchflow aggregate`: drive the pipeline against
//! the local object store and warehouse.

use crate::cli::context::CliContext;
use crate::cli::error::HelpfulError;
use crate::cli::output::{print_averages, print_json};
use anyhow::{Context, Result};
use pitchflow_pipeline::{
    decode_trigger, read_records, AggregationQuery, Outcome, PipelineHandler, TriggerMessage,
    Warehouse,
};
use std::fs;
use std::path::PathBuf;

/// Where the trigger comes from
#[derive(Debug)]
pub enum TriggerSource {
    /// Push envelope JSON file with a base64 `message.data`
    Envelope(PathBuf),
    /// Already-decoded message text
    Message(String),
}

/// Arguments for the handle command
#[derive(Debug)]
pub struct HandleArgs {
    pub trigger: TriggerSource,
    pub records: PathBuf,
    pub json: bool,
}

pub fn run(ctx: &CliContext, args: HandleArgs) -> Result<()> {
    let trigger = match &args.trigger {
        TriggerSource::Envelope(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read envelope {}", path.display()))?;
            decode_trigger(&text).map_err(HelpfulError::from_pipeline_error)?
        }
        TriggerSource::Message(text) => TriggerMessage::parse(text),
    };

    // An ignored trigger never touches the records file.
    let records = match trigger {
        TriggerMessage::JobStarted => read_records(&args.records).map_err(|e| {
            HelpfulError::new(format!("Failed to read records: {}", e))
                .with_context(format!("Records file: {}", args.records.display()))
                .with_suggestion("TRY: Pass a JSON document or one JSON object per line")
        })?,
        TriggerMessage::Unrecognized(_) => Vec::new(),
    };

    let (store, warehouse) = ctx.collaborators();
    let handler = PipelineHandler::new(&ctx.config, ctx.paths().staging, store, warehouse);
    let now = chrono::Local::now().naive_local();

    match handler
        .handle(&trigger, &records, now)
        .map_err(HelpfulError::from_pipeline_error)?
    {
        Outcome::Ignored { payload } => {
            println!("Invalid pub/sub body: {:?}. Nothing to do.", payload);
        }
        Outcome::Processed(run) => {
            if args.json {
                return print_json(&run.aggregates);
            }
            println!("Landing file: {}", run.landing_file.display());
            println!("Uploaded: {}", run.object.uri());
            println!(
                "Loaded {} row(s) into {} ({} total)",
                run.load.rows_loaded, run.load.table, run.load.total_rows
            );
            println!();
            print_averages(&run.aggregates);
        }
    }
    Ok(())
}

/// Rerun the aggregation over the raw table.
pub fn run_aggregate(ctx: &CliContext, json: bool) -> Result<()> {
    let (_, warehouse) = ctx.collaborators();
    let query = AggregationQuery::new(ctx.config.warehouse.raw_table_ref());
    let destination = ctx.config.warehouse.aggregate_table_ref();

    let averages = warehouse
        .run_aggregation(&query, &destination)
        .map_err(HelpfulError::from_pipeline_error)?;

    if json {
        return print_json(&averages);
    }
    println!("Aggregated into {}", destination);
    print_averages(&averages);
    Ok(())
}
