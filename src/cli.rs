//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;
use url::Url;

use titanmxf::DEFAULT_MAX_RETRIES;

/// Fetch TitanTV guide listings and export a Media Center MXF guide file.
///
/// Logs into the TitanTV API with credentials from the environment
/// (TITANTV_USERNAME, TITANTV_PASSWORD, TITANTV_USER_ID, TITANTV_LINEUP_ID),
/// fetches the lineup, channel list, and schedule, and writes one MXF file.
#[derive(Parser, Debug)]
#[command(name = "titanmxf")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path of the MXF file to write
    #[arg(short, long, default_value = "data/listings.mxf")]
    pub output: PathBuf,

    /// Directory for intermediate JSON dumps (--save-json)
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Guide window in days (1-14)
    #[arg(short = 'd', long, default_value_t = 14, value_parser = clap::value_parser!(u8).range(1..=14))]
    pub days: u8,

    /// Maximum attempts for the schedule fetch (1-10); retries apply to 5xx responses only
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_RETRIES as u8, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub max_retries: u8,

    /// Save each fetched JSON document into the data directory
    #[arg(long)]
    pub save_json: bool,

    /// Base URL of the listings API
    #[arg(long, default_value = "https://titantv.com")]
    pub base_url: Url,
}
