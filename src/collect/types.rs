// src/collect/types.rs
use chrono::{DateTime, Utc};

use crate::error::Result;

/// Body content, decided once when a status is decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Original {
        text: String,
    },
    /// `text` is the retweet wrapper's own (often truncated) text.
    Repost {
        original_text: String,
        text: Option<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    pub handle: String,
    pub bio: String,
    pub location: String,
    pub following: u64,
    pub followers: u64,
    pub post_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub id: u64,
    pub author: Author,
    pub reshare_count: u64,
    /// `None` when the source sent neither a retweeted status text nor own text.
    pub content: Option<Content>,
    pub tags: Vec<String>,
}

/// Max-id cursor: request records with id <= `max_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub max_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: String,
    pub language: &'static str,
    pub full_text: bool,
    pub count: u32,
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub records: Vec<RawRecord>,
    /// `None` when the source reports no further results.
    pub next_cursor: Option<Cursor>,
}

#[derive(Debug, Clone)]
pub enum PageOutcome {
    Page(Page),
    RateLimited { reset_at: DateTime<Utc> },
}

/// Paged search capability of the external source.
pub trait SearchSession {
    fn search_page(&mut self, request: &PageRequest) -> Result<PageOutcome>;
    fn name(&self) -> &'static str;
}
