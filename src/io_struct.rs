use crate::classifier::CLASS_LABELS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub project: &'static str,
    pub endpoints: Vec<&'static str>,
}

impl StatusResponse {
    pub fn online() -> Self {
        Self {
            status: "online",
            project: "Deep Space Explorer API",
            endpoints: vec!["/predict", "/asteroids", "/apod"],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AsteroidsQuery {
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictSummary {
    pub label: String,
    /// Max score formatted as a percentage, e.g. "87.34%".
    pub confidence: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub summary: PredictSummary,
    pub detailed_scores: BTreeMap<String, f32>,
}

impl PredictResponse {
    /// Shapes a raw probability vector into the response body. Ties on the
    /// maximum score resolve to the lowest label index (argmax semantics).
    pub fn from_scores(scores: &[f32]) -> Self {
        debug_assert_eq!(scores.len(), CLASS_LABELS.len());
        let mut top_idx = 0;
        for (i, &score) in scores.iter().enumerate() {
            if score > scores[top_idx] {
                top_idx = i;
            }
        }
        let detailed_scores = CLASS_LABELS
            .iter()
            .zip(scores)
            .map(|(&label, &score)| (label.to_string(), score))
            .collect();
        Self {
            summary: PredictSummary {
                label: CLASS_LABELS[top_idx].to_string(),
                confidence: format!("{:.2}%", scores[top_idx] * 100.0),
            },
            detailed_scores,
        }
    }
}

/// One entry of the APOD range feed, as consumed by the ingestion tool.
/// Fields beyond these exist upstream but are not stored.
#[derive(Debug, Clone, Deserialize)]
pub struct ApodEntry {
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

impl ApodEntry {
    /// Only image entries are ingested; videos and interactive media have no
    /// downloadable still to train on.
    pub fn is_image(&self) -> bool {
        self.media_type.as_deref() == Some("image") && self.url.is_some()
    }
}
