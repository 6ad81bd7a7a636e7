//! Client for the external sentiment analyzer.
//!
//! The analyzer is a separate HTTP service exposing `POST /analyze` with a
//! `{ "text": ... }` body and answering either a sentiment payload or an
//! `{ "error": ... }` object.

use serde::{Deserialize, Serialize};
use shared::Sentiment;

use crate::utils::AppError;

#[derive(Clone)]
pub struct SentimentClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    score: Option<f64>,
    #[serde(default)]
    stars: Option<i64>,
}

impl SentimentClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Score a review comment. Analyzer failures surface as a validation
    /// error so the review is rejected rather than stored unscored.
    pub async fn analyze(&self, text: &str) -> Result<Sentiment, AppError> {
        let url = format!("{}/analyze", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&AnalyzeRequest { text })
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Sentiment analyzer unreachable");
                AppError::validation("Erreur lors de l'analyse du sentiment")
            })?;

        let payload: AnalyzeResponse = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "Sentiment analyzer returned an invalid payload");
            AppError::validation("Erreur lors de l'analyse du sentiment")
        })?;

        if let Some(error) = payload.error {
            tracing::error!(error = %error, "Sentiment analyzer reported an error");
            return Err(AppError::validation("Erreur lors de l'analyse du sentiment"));
        }

        match (payload.label, payload.score, payload.stars) {
            (Some(label), Some(score), Some(stars)) => Ok(Sentiment { label, score, stars }),
            _ => Err(AppError::validation("Erreur lors de l'analyse du sentiment")),
        }
    }
}
