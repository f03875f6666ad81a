use chrono::NaiveDate;
use clap::Parser;
use deep_space_api::ingest::{self, IngestConfig};
use deep_space_api::nasa::{DEFAULT_BASE_URL, NasaClient};
use deep_space_api::server::init_logging;

#[derive(Parser, Debug)]
#[command(about = "Bulk-download APOD images into SQLite and local disk for training")]
struct Args {
    /// NASA open-API key. Supplied externally, never compiled in.
    #[arg(long, env = "NASA_API_KEY")]
    api_key: String,

    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://nasa_apod.db?mode=rwc")]
    database_url: String,

    #[arg(long, default_value = "nasa_dataset")]
    image_dir: std::path::PathBuf,

    #[arg(long, default_value = "1996-01-01")]
    start: NaiveDate,

    #[arg(long, default_value = "2026-02-07")]
    end: NaiveDate,

    #[arg(long, default_value = DEFAULT_BASE_URL)]
    nasa_base_url: String,

    /// Delay between batches, in seconds.
    #[arg(long, default_value_t = 1)]
    pacing_secs: u64,

    /// Wait after an HTTP 429, in seconds.
    #[arg(long, default_value_t = 60)]
    backoff_secs: u64,

    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging();

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(args.timeout_secs))
        .build()?;
    let nasa = NasaClient::new(client, args.nasa_base_url, args.api_key);
    let config = IngestConfig {
        database_url: args.database_url,
        image_dir: args.image_dir,
        start: args.start,
        end: args.end,
        pacing_secs: args.pacing_secs,
        backoff_secs: args.backoff_secs,
    };
    ingest::run(&config, &nasa).await
}
