use serde_json::{Value, json};

pub const DEFAULT_BASE_URL: &str = "https://api.nasa.gov";

/// Thin client over the NASA open APIs: the NeoWs asteroid feed and the
/// Astronomy Picture of the Day. Responses are relayed verbatim; both proxy
/// paths share one failure policy (see [`error_envelope`]).
#[derive(Debug, Clone)]
pub struct NasaClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NasaClient {
    pub fn new(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }

    /// NeoWs feed for a single day (`YYYY-MM-DD`).
    pub async fn neo_feed(&self, date: &str) -> Result<Value, reqwest::Error> {
        self.client
            .get(format!("{}/neo/rest/v1/feed", self.base_url))
            .query(&[
                ("start_date", date),
                ("end_date", date),
                ("api_key", &self.api_key),
            ])
            .send()
            .await?
            .json()
            .await
    }

    /// Today's Astronomy Picture of the Day.
    pub async fn apod(&self) -> Result<Value, reqwest::Error> {
        self.client
            .get(format!("{}/planetary/apod", self.base_url))
            .query(&[("api_key", &self.api_key)])
            .send()
            .await?
            .json()
            .await
    }

    /// APOD over an inclusive date range. Returns the raw response so the
    /// caller can react to the status code (the ingestion tool backs off
    /// on 429 instead of parsing).
    pub async fn apod_range(
        &self,
        start: &str,
        end: &str,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .get(format!("{}/planetary/apod", self.base_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("start_date", start),
                ("end_date", end),
            ])
            .send()
            .await
    }

    /// Fetches an arbitrary URL as bytes (image downloads during ingestion).
    pub async fn fetch_bytes(&self, url: &str) -> Result<bytes::Bytes, reqwest::Error> {
        self.client.get(url).send().await?.bytes().await
    }
}

/// Uniform degraded-but-available envelope for upstream failures: the error
/// goes in the body, the HTTP status stays 200.
pub fn error_envelope(err: &reqwest::Error) -> Value {
    // reqwest error strings can embed the full request URL; the api_key
    // query parameter must not leak into responses.
    let mut msg = err.to_string();
    if let Some(url) = err.url() {
        let without_query = format!("{}{}", url.origin().ascii_serialization(), url.path());
        msg = msg.replace(url.as_str(), &without_query);
    }
    json!({ "error": msg })
}
