//! Offline bulk download of APOD images for training: walks a historical
//! date range in 30-day batches, records each image entry in a SQLite table
//! (deduplicated by date) and saves the image file to disk.

use crate::io_struct::ApodEntry;
use crate::nasa::NasaClient;
use chrono::{Duration, NaiveDate};
use reqwest::StatusCode;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct IngestConfig {
    pub database_url: String,
    pub image_dir: PathBuf,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Pause between batches, keeps the connection friendly.
    pub pacing_secs: u64,
    /// Backoff after an HTTP 429 from the feed.
    pub backoff_secs: u64,
}

/// Splits `[start, end]` into inclusive windows of at most 31 days
/// (30 days past each window start), clamped to `end`.
pub fn batch_ranges(start: NaiveDate, end: NaiveDate) -> Vec<(NaiveDate, NaiveDate)> {
    let mut ranges = Vec::new();
    let mut current = start;
    while current < end {
        let mut batch_end = current + Duration::days(30);
        if batch_end > end {
            batch_end = end;
        }
        ranges.push((current, batch_end));
        current = batch_end + Duration::days(1);
    }
    ranges
}

pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS nasa_apod (
            date TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            explanation TEXT
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

/// Inserts one feed entry, ignoring duplicates via the date constraint.
/// Returns whether a new row was actually written.
pub async fn store_entry(pool: &SqlitePool, entry: &ApodEntry) -> sqlx::Result<bool> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO nasa_apod (date, title, url, explanation) VALUES (?, ?, ?, ?)",
    )
    .bind(&entry.date)
    .bind(&entry.title)
    .bind(entry.url.as_deref().unwrap_or_default())
    .bind(entry.explanation.as_deref())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Saves the entry's image under `<dir>/<date>.jpg` unless already present.
/// Returns whether a download happened.
async fn save_image(nasa: &NasaClient, dir: &Path, entry: &ApodEntry) -> anyhow::Result<bool> {
    let path = dir.join(format!("{}.jpg", entry.date));
    if path.exists() {
        return Ok(false);
    }
    let url = entry
        .url
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("image entry {} has no url", entry.date))?;
    let bytes = nasa.fetch_bytes(url).await?;
    tokio::fs::write(&path, &bytes).await?;
    Ok(true)
}

enum BatchStatus {
    Done { inserted: usize, downloaded: usize },
    RateLimited,
}

async fn ingest_batch(
    pool: &SqlitePool,
    nasa: &NasaClient,
    image_dir: &Path,
    start: NaiveDate,
    end: NaiveDate,
) -> anyhow::Result<BatchStatus> {
    let resp = nasa
        .apod_range(&start.to_string(), &end.to_string())
        .await?;
    if resp.status() == StatusCode::TOO_MANY_REQUESTS {
        return Ok(BatchStatus::RateLimited);
    }
    let entries: Vec<ApodEntry> = resp.error_for_status()?.json().await?;

    let mut inserted = 0;
    let mut downloaded = 0;
    for entry in entries.iter().filter(|e| e.is_image()) {
        if store_entry(pool, entry).await? {
            inserted += 1;
        }
        if save_image(nasa, image_dir, entry).await? {
            downloaded += 1;
        }
    }
    Ok(BatchStatus::Done {
        inserted,
        downloaded,
    })
}

/// Runs the full ingestion loop. Batch failures are logged and the loop moves
/// on to the next window rather than aborting the run.
pub async fn run(config: &IngestConfig, nasa: &NasaClient) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&config.image_dir).await?;
    let pool = SqlitePool::connect(&config.database_url).await?;
    ensure_schema(&pool).await?;

    for (start, end) in batch_ranges(config.start, config.end) {
        match ingest_batch(&pool, nasa, &config.image_dir, start, end).await {
            Ok(BatchStatus::Done {
                inserted,
                downloaded,
            }) => {
                log::info!(
                    "Batch completed: {} to {} ({} new rows, {} new images)",
                    start,
                    end,
                    inserted,
                    downloaded
                );
            }
            Ok(BatchStatus::RateLimited) => {
                log::warn!(
                    "Rate limit exceeded at {}. Waiting {} seconds...",
                    start,
                    config.backoff_secs
                );
                tokio::time::sleep(std::time::Duration::from_secs(config.backoff_secs)).await;
            }
            Err(e) => log::error!("Error at {}: {e:#}", start),
        }
        tokio::time::sleep(std::time::Duration::from_secs(config.pacing_secs)).await;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn batches_are_contiguous_and_clamped() {
        let ranges = batch_ranges(date("1996-01-01"), date("1996-03-15"));
        assert_eq!(ranges[0], (date("1996-01-01"), date("1996-01-31")));
        assert_eq!(ranges[1], (date("1996-02-01"), date("1996-03-02")));
        // Final window clamps to the overall end date.
        assert_eq!(ranges.last().unwrap().1, date("1996-03-15"));
        for pair in ranges.windows(2) {
            assert_eq!(pair[0].1 + Duration::days(1), pair[1].0);
        }
    }

    #[test]
    fn empty_range_produces_no_batches() {
        let d = date("2020-06-01");
        assert!(batch_ranges(d, d).is_empty());
    }

    #[tokio::test]
    async fn existing_image_on_disk_is_not_redownloaded() {
        let dir = std::env::temp_dir().join(format!(
            "apod-ingest-test-{}-{:?}",
            std::process::id(),
            std::thread::current().id()
        ));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(dir.join("1996-01-01.jpg"), b"already here")
            .await
            .unwrap();

        // Upstream refuses connections, so any fetch attempt would error.
        let nasa = NasaClient::new(
            reqwest::Client::new(),
            "http://127.0.0.1:1".into(),
            "DEMO_KEY".into(),
        );
        let entry = ApodEntry {
            date: "1996-01-01".into(),
            title: "A Soyuz at Sunset".into(),
            url: Some("http://127.0.0.1:1/a.jpg".into()),
            explanation: None,
            media_type: Some("image".into()),
        };
        let downloaded = save_image(&nasa, &dir, &entry).await.unwrap();
        assert!(!downloaded);
        let kept = tokio::fs::read(dir.join("1996-01-01.jpg")).await.unwrap();
        assert_eq!(kept, b"already here");

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn reingesting_inserts_zero_duplicates() {
        // One connection only: every pooled connection to ":memory:" would
        // otherwise open its own database.
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ensure_schema(&pool).await.unwrap();
        let entry = ApodEntry {
            date: "1996-01-01".into(),
            title: "A Soyuz at Sunset".into(),
            url: Some("https://example.com/a.jpg".into()),
            explanation: Some("testing".into()),
            media_type: Some("image".into()),
        };
        assert!(store_entry(&pool, &entry).await.unwrap());
        assert!(!store_entry(&pool, &entry).await.unwrap());

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nasa_apod")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
