//! `pitchflow fetch`: download team statistics into a landing file.

use crate::cli::context::CliContext;
use crate::cli::error::HelpfulError;
use anyhow::{Context, Result};
use pitchflow_pipeline::StatsClient;
use std::path::PathBuf;

/// Arguments for the fetch command. Unset values come from the config.
#[derive(Debug, Default)]
pub struct FetchArgs {
    pub team: Option<u32>,
    pub league: Option<u32>,
    pub season: Option<i32>,
    pub out_dir: Option<PathBuf>,
}

pub fn run(ctx: &CliContext, args: FetchArgs) -> Result<()> {
    let mut api = ctx.config.api.clone();
    if let Some(team) = args.team {
        api.team_id = team;
    }
    if let Some(league) = args.league {
        api.league_id = league;
    }
    if let Some(season) = args.season {
        api.season = season;
    }
    let out_dir = args.out_dir.unwrap_or_else(|| ctx.paths().staging);

    let client = StatsClient::new(&api).map_err(HelpfulError::from_pipeline_error)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let now = chrono::Local::now().naive_local();
    let path = runtime
        .block_on(client.fetch_to_file(&api, &out_dir, now))
        .map_err(HelpfulError::from_pipeline_error)?;

    println!("Statistics saved to {}", path.display());
    Ok(())
}
