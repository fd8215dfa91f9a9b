// src/sentiment/huggingface.rs
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Classifier, SentimentScore};
use crate::config::SentimentConfig;

const MAX_ATTEMPTS: u8 = 8;

/// Hosted text-classification endpoint (`POST {endpoint}/{model}`).
#[derive(Clone)]
pub struct HuggingFaceClassifier {
    http: Client,
    url: String,
    api_key: String,
    max_retries: u8,
}

#[derive(Serialize)]
struct Req<'a> {
    inputs: &'a [String],
    parameters: Params,
    options: Options,
}

#[derive(Serialize)]
struct Params {
    truncation: bool,
}

#[derive(Serialize)]
struct Options {
    wait_for_model: bool,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

impl HuggingFaceClassifier {
    pub fn from_config(cfg: &SentimentConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("tweet-sentiment-analyzer/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("building inference http client")?;
        Ok(Self {
            http,
            url: format!("{}/{}", cfg.endpoint, cfg.model),
            api_key: cfg.api_key.clone(),
            max_retries: 3,
        })
    }

    /// Attempts per batch, including the first. Clamped to 1..=8 so the backoff stays short.
    pub fn with_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.clamp(1, MAX_ATTEMPTS);
        self
    }

    async fn post_once(&self, batch: &[String]) -> Result<(StatusCode, String)> {
        let body = Req {
            inputs: batch,
            parameters: Params { truncation: true },
            options: Options {
                wait_for_model: true,
            },
        };
        let mut req = self.http.post(&self.url).json(&body);
        if !self.api_key.is_empty() {
            req = req.bearer_auth(&self.api_key);
        }
        let rsp = req.send().await?;
        let status = rsp.status();
        let text = rsp.text().await?;
        Ok((status, text))
    }
}

#[async_trait]
impl Classifier for HuggingFaceClassifier {
    async fn classify(&self, batch: &[String]) -> Result<Vec<SentimentScore>> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let mut attempt: u8 = 0;
        loop {
            attempt += 1;
            let res = self.post_once(batch).await;

            // 503 while the model loads and transport errors are worth another try.
            let retryable = match &res {
                Ok((status, _)) => *status == StatusCode::SERVICE_UNAVAILABLE,
                Err(_) => true,
            };
            if retryable && attempt < self.max_retries {
                tracing::warn!(target: "sentiment", attempt, "inference call failed, retrying");
                tokio::time::sleep(Duration::from_millis(500u64 << (attempt - 1))).await;
                continue;
            }

            let (status, text) = res.context("inference request failed")?;
            if !status.is_success() {
                bail!("inference endpoint returned {status}: {}", text.trim());
            }
            return parse_response(&text, batch.len());
        }
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}

/// Pick the highest-scoring label for every input. The endpoint answers with one list of
/// label scores per input, in input order.
pub fn parse_response(body: &str, expected: usize) -> Result<Vec<SentimentScore>> {
    let per_input: Vec<Vec<LabelScore>> =
        serde_json::from_str(body).context("parsing inference response")?;
    if per_input.len() != expected {
        bail!(
            "inference returned {} results for {} inputs",
            per_input.len(),
            expected
        );
    }

    per_input
        .into_iter()
        .enumerate()
        .map(|(i, labels)| {
            labels
                .into_iter()
                .max_by(|a, b| a.score.total_cmp(&b.score))
                .map(|best| SentimentScore {
                    label: best.label.to_lowercase(),
                    score: best.score.clamp(0.0, 1.0),
                })
                .ok_or_else(|| anyhow!("no labels returned for input {i}"))
        })
        .collect()
}
