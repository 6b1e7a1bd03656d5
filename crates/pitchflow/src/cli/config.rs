//! `pitchflow config`: print the effective configuration.

use crate::cli::context::CliContext;
use crate::cli::error::HelpfulError;
use anyhow::Result;

pub fn run(ctx: &CliContext) -> Result<()> {
    let rendered = ctx
        .config
        .to_toml()
        .map_err(HelpfulError::from_pipeline_error)?;
    let paths = ctx.paths();

    let source = if ctx.config_path.exists() {
        ctx.config_path.display().to_string()
    } else {
        format!("defaults ({} not found)", ctx.config_path.display())
    };
    println!("# Config: {}", source);
    println!("# Home: {}", ctx.home.display());
    println!("# Staging: {}", paths.staging.display());
    println!("# Objects: {}", paths.objects.display());
    println!("# Warehouse: {}", paths.warehouse.display());
    println!(
        "# API key: {}",
        if ctx.config.api.resolve_api_key().is_some() {
            "set"
        } else {
            "not set"
        }
    );
    println!();
    print!("{}", rendered);
    Ok(())
}
