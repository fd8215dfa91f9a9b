// src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CollectError>;

/// Failures of the collection stage. Every variant is fatal for the run.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error(
        "Twitter API credentials are not fully set in environment variables \
         (missing: {}); cannot complete the session handshake",
        missing.join(", ")
    )]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("search source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("malformed record {id}: carries neither retweeted nor own full text")]
    MalformedRecord { id: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl From<reqwest::Error> for CollectError {
    fn from(err: reqwest::Error) -> Self {
        CollectError::SourceUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for CollectError {
    fn from(err: serde_json::Error) -> Self {
        CollectError::SourceUnavailable(format!("unexpected response body: {err}"))
    }
}
