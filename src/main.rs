//! CLI entry point for the titanmxf guide fetcher.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use titanmxf::{Credentials, RetryPolicy, TitanClient, assemble, extract, schedule_start, window_minutes};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");
    info!("titanmxf starting");

    let credentials = Credentials::from_env()?;

    std::fs::create_dir_all(&args.data_dir)
        .with_context(|| format!("failed to create data directory {}", args.data_dir.display()))?;
    let dump_dir = args.save_json.then(|| args.data_dir.clone());

    let client = TitanClient::new(&args.base_url, &credentials.user_id, dump_dir)?;
    client
        .login(&credentials.username, &credentials.password)
        .await?;

    let provider = client.fetch_provider().await?;
    info!(id = %provider.id, name = %provider.name, "provider information fetched");

    let lineup = client.fetch_lineup().await?;
    info!(
        id = lineup.id(),
        name = lineup.name(),
        time_zone = lineup.time_zone(),
        utc_offset = lineup.utc_offset(),
        provider_id = lineup.provider_id(),
        provider_name = lineup.provider_name(),
        observes_dst = lineup.observes_dst(),
        "lineup information fetched"
    );

    let channels = client.fetch_channels(&credentials.lineup_id).await?;

    let start = schedule_start(Local::now());
    let policy = RetryPolicy::with_max_attempts(u32::from(args.max_retries));
    let schedule = client
        .fetch_schedule(&credentials.lineup_id, &start, window_minutes(args.days), &policy)
        .await?;

    let records = extract(&schedule, &channels);
    info!(
        programs = records.programs.len(),
        schedule_entries = records.schedule_entries.len(),
        people = records.people.len(),
        series = records.series.len(),
        images = records.images.len(),
        "guide records extracted"
    );

    let xml = assemble(&provider, &lineup, &channels, &records)?;

    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    std::fs::write(&args.output, &xml)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(
        path = %args.output.display(),
        bytes = xml.len(),
        "MXF file written"
    );

    Ok(())
}
