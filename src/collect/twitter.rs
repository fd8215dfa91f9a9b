// src/collect/twitter.rs
//! Standard v1.1 search session over a blocking HTTP client.

use chrono::{DateTime, TimeZone, Utc};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::collect::oauth;
use crate::collect::types::{
    Author, Content, Cursor, Page, PageOutcome, PageRequest, RawRecord, SearchSession,
};
use crate::config::Credentials;
use crate::error::{CollectError, Result};

pub const SEARCH_URL: &str = "https://api.twitter.com/1.1/search/tweets.json";
const RATE_LIMIT_RESET_HEADER: &str = "x-rate-limit-reset";

/// Fallback when a 429 arrives without a reset header (one standard window).
fn default_window() -> chrono::Duration {
    chrono::Duration::minutes(15)
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    statuses: Vec<Status>,
    search_metadata: Option<SearchMetadata>,
}

#[derive(Debug, Deserialize)]
struct SearchMetadata {
    next_results: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Status {
    id: u64,
    full_text: Option<String>,
    user: User,
    #[serde(default)]
    retweet_count: u64,
    #[serde(default)]
    entities: Entities,
    retweeted_status: Option<Box<Status>>,
}

#[derive(Debug, Deserialize)]
struct User {
    screen_name: String,
    description: Option<String>,
    location: Option<String>,
    #[serde(default)]
    friends_count: u64,
    #[serde(default)]
    followers_count: u64,
    #[serde(default)]
    statuses_count: u64,
}

#[derive(Debug, Default, Deserialize)]
struct Entities {
    #[serde(default)]
    hashtags: Vec<Hashtag>,
}

#[derive(Debug, Deserialize)]
struct Hashtag {
    text: String,
}

impl From<Status> for RawRecord {
    fn from(status: Status) -> Self {
        let content = match status.retweeted_status.and_then(|rt| rt.full_text) {
            Some(original_text) => Some(Content::Repost {
                original_text,
                text: status.full_text,
            }),
            None => status.full_text.map(|text| Content::Original { text }),
        };

        RawRecord {
            id: status.id,
            author: Author {
                handle: status.user.screen_name,
                bio: status.user.description.unwrap_or_default(),
                location: status.user.location.unwrap_or_default(),
                following: status.user.friends_count,
                followers: status.user.followers_count,
                post_count: status.user.statuses_count,
            },
            reshare_count: status.retweet_count,
            content,
            tags: status.entities.hashtags.into_iter().map(|h| h.text).collect(),
        }
    }
}

/// Decode one search response body into a page. The next cursor sits just below the
/// smallest id on the page; a missing `next_results` marks the last page.
pub fn parse_search_page(body: &str) -> Result<Page> {
    let resp: SearchResponse = serde_json::from_str(body)?;

    let has_more = resp
        .search_metadata
        .as_ref()
        .map(|m| m.next_results.is_some())
        .unwrap_or(true);
    let next_cursor = resp
        .statuses
        .iter()
        .map(|s| s.id)
        .min()
        .filter(|_| has_more)
        .and_then(|min_id| min_id.checked_sub(1))
        .map(|max_id| Cursor { max_id });

    Ok(Page {
        records: resp.statuses.into_iter().map(RawRecord::from).collect(),
        next_cursor,
    })
}

/// Reset instant advertised by the source, if any.
pub fn rate_limit_reset(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    headers
        .get(RATE_LIMIT_RESET_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
}

pub struct TwitterSession {
    client: Client,
    credentials: Credentials,
    search_url: String,
}

impl TwitterSession {
    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("tweet-sentiment-analyzer/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            credentials,
            search_url: SEARCH_URL.to_string(),
        })
    }

    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }
}

impl SearchSession for TwitterSession {
    fn search_page(&mut self, request: &PageRequest) -> Result<PageOutcome> {
        let count = request.count.to_string();
        let max_id = request.cursor.map(|c| c.max_id.to_string());

        let mut query: Vec<(&str, &str)> = vec![
            ("q", request.query.as_str()),
            ("lang", request.language),
            ("count", count.as_str()),
        ];
        if request.full_text {
            query.push(("tweet_mode", "extended"));
        }
        if let Some(max_id) = max_id.as_deref() {
            query.push(("max_id", max_id));
        }

        let auth = oauth::authorization_header(
            "GET",
            &self.search_url,
            &query,
            &self.credentials,
            &oauth::generate_nonce(),
            Utc::now().timestamp(),
        );

        let resp = self
            .client
            .get(&self.search_url)
            .query(&query)
            .header(AUTHORIZATION, auth)
            .send()?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let reset_at =
                rate_limit_reset(resp.headers()).unwrap_or_else(|| Utc::now() + default_window());
            return Ok(PageOutcome::RateLimited { reset_at });
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(CollectError::SourceUnavailable(format!(
                "authentication failed ({status})"
            )));
        }
        if !status.is_success() {
            return Err(CollectError::SourceUnavailable(format!(
                "search request failed: {status}"
            )));
        }

        let body = resp.text()?;
        parse_search_page(&body).map(PageOutcome::Page)
    }

    fn name(&self) -> &'static str {
        "twitter-search"
    }
}
