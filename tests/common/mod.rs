// tests/common/mod.rs
#![allow(dead_code)]

pub mod http;

use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::rc::Rc;

use tweet_sentiment_analyzer::collect::types::{
    Author, Content, Cursor, Page, PageOutcome, PageRequest, RawRecord, SearchSession,
};
use tweet_sentiment_analyzer::error::{CollectError, Result};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2021, 3, 1, 9, 0, 0).unwrap()
}

pub fn author(handle: &str) -> Author {
    Author {
        handle: handle.to_string(),
        bio: format!("{handle} bio"),
        location: "Earth".to_string(),
        following: 1,
        followers: 2,
        post_count: 3,
    }
}

pub fn original(id: u64, text: &str, tags: &[&str]) -> RawRecord {
    RawRecord {
        id,
        author: author(&format!("user{id}")),
        reshare_count: id * 10,
        content: Some(Content::Original {
            text: text.to_string(),
        }),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn repost(id: u64, original_text: &str, own_text: &str) -> RawRecord {
    RawRecord {
        content: Some(Content::Repost {
            original_text: original_text.to_string(),
            text: Some(own_text.to_string()),
        }),
        ..original(id, own_text, &[])
    }
}

/// `count` original records with strictly descending ids, as the source ranks them.
pub fn corpus(count: u64) -> Vec<RawRecord> {
    (1..=count)
        .rev()
        .map(|id| original(id, &format!("tweet number {id}"), &["covid", "news"]))
        .collect()
}

/// In-memory search source with max-id paging and scriptable rate limits / failures.
pub struct MockSource {
    corpus: Vec<RawRecord>,
    rate_limited_calls: Vec<usize>,
    failing_call: Option<usize>,
    reset_at: DateTime<Utc>,
    calls: usize,
    pub log: Rc<RefCell<Vec<PageRequest>>>,
}

impl MockSource {
    pub fn new(corpus: Vec<RawRecord>) -> Self {
        Self {
            corpus,
            rate_limited_calls: Vec::new(),
            failing_call: None,
            reset_at: t0(),
            calls: 0,
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Answer the given (0-based) calls with a rate-limit signal resetting at `reset_at`.
    pub fn rate_limit_on(mut self, calls: &[usize], reset_at: DateTime<Utc>) -> Self {
        self.rate_limited_calls = calls.to_vec();
        self.reset_at = reset_at;
        self
    }

    pub fn fail_on(mut self, call: usize) -> Self {
        self.failing_call = Some(call);
        self
    }

    pub fn log_handle(&self) -> Rc<RefCell<Vec<PageRequest>>> {
        Rc::clone(&self.log)
    }
}

impl SearchSession for MockSource {
    fn search_page(&mut self, request: &PageRequest) -> Result<PageOutcome> {
        let call = self.calls;
        self.calls += 1;
        self.log.borrow_mut().push(request.clone());

        if self.rate_limited_calls.contains(&call) {
            return Ok(PageOutcome::RateLimited {
                reset_at: self.reset_at,
            });
        }
        if self.failing_call == Some(call) {
            return Err(CollectError::SourceUnavailable("connection reset".into()));
        }

        let start = match request.cursor {
            None => 0,
            Some(Cursor { max_id }) => self
                .corpus
                .iter()
                .position(|r| r.id <= max_id)
                .unwrap_or(self.corpus.len()),
        };
        let end = (start + request.count as usize).min(self.corpus.len());
        let records = self.corpus[start..end].to_vec();
        let next_cursor = if end < self.corpus.len() {
            records.last().map(|r| Cursor { max_id: r.id - 1 })
        } else {
            None
        };

        Ok(PageOutcome::Page(Page {
            records,
            next_cursor,
        }))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
