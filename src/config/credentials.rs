// src/config/credentials.rs
use std::fmt;

use crate::error::{CollectError, Result};

pub const ENV_CONSUMER_KEY: &str = "TWITTER_CONSUMER_KEY";
pub const ENV_CONSUMER_SECRET: &str = "TWITTER_CONSUMER_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";

/// OAuth 1.0a user-context secrets. Built once at startup and moved into the session.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    /// Resolve all four secrets from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve through an arbitrary lookup. A value that is absent or blank counts as missing;
    /// present values are returned untouched.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut take = |name: &'static str| match lookup(name) {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let consumer_key = take(ENV_CONSUMER_KEY);
        let consumer_secret = take(ENV_CONSUMER_SECRET);
        let access_token = take(ENV_ACCESS_TOKEN);
        let access_token_secret = take(ENV_ACCESS_TOKEN_SECRET);

        if !missing.is_empty() {
            return Err(CollectError::MissingCredentials { missing });
        }

        Ok(Self {
            consumer_key,
            consumer_secret,
            access_token,
            access_token_secret,
        })
    }
}

// Secrets must never reach logs; only lengths are shown.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key_len", &self.consumer_key.len())
            .field("consumer_secret_len", &self.consumer_secret.len())
            .field("access_token_len", &self.access_token.len())
            .field("access_token_secret_len", &self.access_token_secret.len())
            .finish()
    }
}
