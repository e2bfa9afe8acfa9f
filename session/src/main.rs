//! Roast Timeline Replay
//!
//! Reconstructs phases, Rate of Rise and the roast summary from recorded event
//! files, and optionally drives a recorded roast through the live ticker.

use std::sync::Arc;

use anyhow::Context;
use roast_timeline_session::{
    build_report, compare, load_replay, run_live, ManualClock, SessionError, TimelineConfig,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = TimelineConfig::load()?;

    // Initialize tracing
    let json = config.logging.json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roastline=debug,roast_timeline_session=debug".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting roast timeline replay");
    tracing::info!("Environment: {}", config.environment);

    let mut paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        let path = config
            .replay
            .path
            .clone()
            .context("no replay file given and replay.path is not set")?;
        paths.push(path);
    }

    if let Err(err) = run(&config, &paths).await {
        let body = serde_json::to_string(&err.to_response())?;
        tracing::error!("Replay failed: {}", body);
        return Err(err.into());
    }

    Ok(())
}

async fn run(config: &TimelineConfig, paths: &[String]) -> Result<(), SessionError> {
    let files = paths
        .iter()
        .map(load_replay)
        .collect::<Result<Vec<_>, _>>()?;

    for file in &files {
        let report = build_report(file, config, file.evaluation_time());
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if files.len() > 1 {
        let grid = compare(&files, config);
        tracing::info!("Comparison grid of {} rows over {} roasts", grid.len(), files.len());
        println!("{}", serde_json::to_string_pretty(&grid)?);
    }

    let ticks = config.replay.live_ticks;
    if ticks > 0 {
        if let Some(file) = files.into_iter().next() {
            let clock = Arc::new(ManualClock::new(file.evaluation_time()));
            tracing::info!("Running {} live ticks for roast {}", ticks, file.roast_id);
            let states = run_live(file, config, clock, ticks).await;
            println!("{}", serde_json::to_string_pretty(&states)?);
        }
    }

    Ok(())
}
