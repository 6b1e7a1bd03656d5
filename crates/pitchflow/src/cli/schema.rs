//! `pitchflow schema`: infer a warehouse schema from a CSV file.

use crate::cli::error::HelpfulError;
use crate::cli::output::{print_json, print_table, schema_rows};
use anyhow::Result;
use pitchflow_schema::{try_infer_schema, write_schema_json};
use std::path::PathBuf;
use tracing::{error, info};

/// Arguments for the schema command
#[derive(Debug)]
pub struct SchemaArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub json: bool,
}

/// Infer, write the schema file, then print a summary.
///
/// Nothing is written when inference fails or finds no columns.
pub fn run(args: SchemaArgs) -> Result<()> {
    let schema = try_infer_schema(&args.input).map_err(|e| {
        error!(input = %args.input.display(), "Schema inference failed: {}", e);
        HelpfulError::from_schema_error(&args.input, &e)
    })?;

    if schema.is_empty() {
        return Err(HelpfulError::empty_schema(&args.input).into());
    }

    write_schema_json(&schema, &args.output).map_err(|e| {
        HelpfulError::new(format!("Failed to write schema: {}", e))
            .with_context(format!("Output path: {}", args.output.display()))
    })?;
    info!(
        output = %args.output.display(),
        fields = schema.len(),
        "Schema written"
    );

    if args.json {
        return print_json(&schema);
    }

    println!("--- Inferred Schema ---");
    print_table(&["Name", "Type", "Mode", "Description"], schema_rows(&schema));
    println!();
    println!("Inferred schema saved to {}", args.output.display());
    Ok(())
}
