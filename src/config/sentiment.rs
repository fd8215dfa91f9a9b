// src/config/sentiment.rs
use serde::{Deserialize, Serialize};
use std::{env, fs, path::Path};

pub const DEFAULT_SENTIMENT_CONFIG_PATH: &str = "config/sentiment.toml";
pub const DEFAULT_MODEL: &str = "cardiffnlp/twitter-roberta-base-sentiment-latest";
pub const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

fn default_provider() -> String {
    "lexicon".to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}
fn default_batch_size() -> usize {
    32
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentConfig {
    /// "huggingface" | "lexicon" (case-insensitive)
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// "ENV" means: read from HF_API_TOKEN
    #[serde(default)]
    pub api_key: String,
}

impl Default for SentimentConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            endpoint: default_endpoint(),
            batch_size: default_batch_size(),
            timeout_secs: default_timeout_secs(),
            api_key: String::new(),
        }
    }
}

impl SentimentConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)?;
        let cfg: SentimentConfig = toml::from_str(&data)?;
        cfg.resolve()
    }

    /// Like `load_from_file`, but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!(
                target: "sentiment",
                path = %path.as_ref().display(),
                "sentiment config not found, using defaults"
            );
            Self::default().resolve()
        }
    }

    fn resolve(mut self) -> anyhow::Result<Self> {
        self.provider = self.provider.to_lowercase();

        if self.api_key.trim().eq_ignore_ascii_case("env") {
            self.api_key = match self.provider.as_str() {
                "huggingface" => env::var("HF_API_TOKEN")
                    .map_err(|_| anyhow::anyhow!("Missing HF_API_TOKEN env var"))?,
                other => anyhow::bail!("provider {other} takes no api key"),
            };
        }

        if !matches!(self.provider.as_str(), "huggingface" | "lexicon") {
            anyhow::bail!("Unsupported provider in config: {}", self.provider);
        }

        if self.batch_size == 0 {
            self.batch_size = default_batch_size();
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = default_timeout_secs();
        }
        self.endpoint = self.endpoint.trim_end_matches('/').to_string();

        Ok(self)
    }
}
