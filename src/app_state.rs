use crate::classifier::Classifier;
use crate::nasa::NasaClient;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub nasa_base_url: String,
    pub api_key: String,
    pub timeout: u64,
}

/// Read-only per-request state. The classifier is loaded once here and never
/// mutated afterwards; a failed load leaves `None` and `/predict` reports it
/// cleanly instead of crashing the process.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Option<Arc<Classifier>>,
    pub nasa: NasaClient,
}

impl AppState {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        let classifier = match Classifier::load(&config.model_path) {
            Ok(c) => Some(Arc::new(c)),
            Err(e) => {
                log::error!(
                    "failed to load model from {}: {e:#}; /predict will be unavailable",
                    config.model_path.display()
                );
                None
            }
        };
        Ok(Self {
            classifier,
            nasa: NasaClient::new(
                client,
                config.nasa_base_url.clone(),
                config.api_key.clone(),
            ),
        })
    }
}
