// src/config/mod.rs
pub mod credentials;
pub mod sentiment;

pub use credentials::Credentials;
pub use sentiment::SentimentConfig;
