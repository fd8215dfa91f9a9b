// src/collect/mod.rs
//! Paginated collection of search results.
//!
//! [`Collector`] is a lazy iterator over raw records. It keeps at most one page in memory,
//! asks the session for the next page only when that buffer runs dry, and transparently
//! waits out rate limits through the injected [`Clock`].

pub mod clock;
pub mod oauth;
pub mod twitter;
pub mod types;

use chrono::{DateTime, Utc};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::collect::clock::{Clock, SystemClock};
use crate::collect::types::{Cursor, PageOutcome, PageRequest, RawRecord, SearchSession};
use crate::error::Result;

/// Content language requested from the source. Not configurable.
pub const LANGUAGE: &str = "en";
/// Largest page the search endpoint serves.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Added on top of the advertised reset time before retrying.
pub const RESET_MARGIN: Duration = Duration::from_secs(1);

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("collect_pages_total", "Search pages received from the source.");
        describe_counter!("collect_records_total", "Raw records yielded to the caller.");
        describe_counter!(
            "collect_rate_limit_waits_total",
            "Times collection paused for a rate-limit window."
        );
        describe_counter!(
            "collect_source_errors_total",
            "Terminal session errors during collection."
        );
        describe_histogram!("collect_page_ms", "Page fetch time in milliseconds.");
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Active,
    Exhausted,
    Failed,
}

pub struct Collector<S, C = SystemClock> {
    session: S,
    clock: C,
    query: String,
    limit: usize,
    emitted: usize,
    buffer: VecDeque<RawRecord>,
    cursor: Option<Cursor>,
    state: State,
}

/// Start a collection over `session` using the wall clock.
pub fn collect<S: SearchSession>(query: &str, limit: usize, session: S) -> Collector<S> {
    Collector::with_clock(query, limit, session, SystemClock)
}

impl<S: SearchSession, C: Clock> Collector<S, C> {
    pub fn with_clock(query: &str, limit: usize, session: S, clock: C) -> Self {
        ensure_metrics_described();
        Self {
            session,
            clock,
            query: query.to_string(),
            limit,
            emitted: 0,
            buffer: VecDeque::new(),
            cursor: None,
            state: State::Active,
        }
    }

    pub fn emitted(&self) -> usize {
        self.emitted
    }

    fn next_request(&self) -> PageRequest {
        let remaining = self.limit.saturating_sub(self.emitted);
        PageRequest {
            query: self.query.clone(),
            language: LANGUAGE,
            full_text: true,
            count: remaining.min(MAX_PAGE_SIZE as usize) as u32,
            cursor: self.cursor,
        }
    }

    /// Fill the buffer with the next page. The same request is re-issued after a rate-limit
    /// wait, so nothing is skipped or fetched twice.
    fn fetch_next_page(&mut self) -> Result<()> {
        let request = self.next_request();
        loop {
            let t0 = std::time::Instant::now();
            let outcome = match self.session.search_page(&request) {
                Ok(o) => o,
                Err(e) => {
                    tracing::warn!(
                        target: "collect",
                        error = %e,
                        session = self.session.name(),
                        "search page failed"
                    );
                    counter!("collect_source_errors_total").increment(1);
                    return Err(e);
                }
            };
            histogram!("collect_page_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

            match outcome {
                PageOutcome::Page(page) => {
                    counter!("collect_pages_total").increment(1);
                    tracing::debug!(
                        target: "collect",
                        records = page.records.len(),
                        cursor = ?request.cursor,
                        "page received"
                    );
                    if page.records.is_empty() {
                        self.state = State::Exhausted;
                        return Ok(());
                    }
                    self.cursor = page.next_cursor;
                    if self.cursor.is_none() {
                        self.state = State::Exhausted;
                    }
                    self.buffer.extend(page.records);
                    return Ok(());
                }
                PageOutcome::RateLimited { reset_at } => {
                    let wait = wait_until(self.clock.now(), reset_at);
                    counter!("collect_rate_limit_waits_total").increment(1);
                    tracing::info!(
                        target: "collect",
                        wait_secs = wait.as_secs(),
                        reset_at = %reset_at,
                        "rate limited, sleeping until window resets"
                    );
                    self.clock.sleep(wait);
                }
            }
        }
    }
}

impl<S: SearchSession, C: Clock> Iterator for Collector<S, C> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.emitted >= self.limit {
                return None;
            }
            if let Some(record) = self.buffer.pop_front() {
                self.emitted += 1;
                counter!("collect_records_total").increment(1);
                return Some(Ok(record));
            }
            if self.state != State::Active {
                return None;
            }
            if let Err(e) = self.fetch_next_page() {
                self.state = State::Failed;
                return Some(Err(e));
            }
        }
    }
}

/// Time to sleep before retrying; never less than the margin.
pub fn wait_until(now: DateTime<Utc>, reset_at: DateTime<Utc>) -> Duration {
    (reset_at - now).to_std().unwrap_or(Duration::ZERO) + RESET_MARGIN
}
