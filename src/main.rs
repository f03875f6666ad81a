use clap::Parser;
use deep_space_api::app_state::{AppConfig, AppState};
use deep_space_api::server;

#[derive(Parser, Debug)]
#[command(about = "Deep Space Explorer API server")]
struct Args {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8001)]
    port: u16,

    /// Trained classifier artifact (ONNX export of the CNN).
    #[arg(long, default_value = "nasa_model.onnx")]
    model_path: std::path::PathBuf,

    /// NASA open-API key. Supplied externally, never compiled in.
    #[arg(long, env = "NASA_API_KEY")]
    api_key: String,

    #[arg(long, default_value = deep_space_api::nasa::DEFAULT_BASE_URL)]
    nasa_base_url: String,

    /// Timeout for outbound feed requests, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    server::init_logging();

    let config = AppConfig {
        host: args.host,
        port: args.port,
        model_path: args.model_path,
        nasa_base_url: args.nasa_base_url,
        api_key: args.api_key,
        timeout: args.timeout_secs,
    };
    let app_state = AppState::new(&config)?;
    actix_web::rt::System::new().block_on(server::startup(config, app_state))?;
    Ok(())
}
