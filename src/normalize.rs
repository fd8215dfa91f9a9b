// src/normalize.rs
use crate::collect::types::{Content, RawRecord};
use crate::error::{CollectError, Result};

/// One output row; field order matches `table::COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRow {
    pub username: String,
    pub description: String,
    pub location: String,
    pub following: u64,
    pub followers: u64,
    pub totaltweets: u64,
    pub retweetcount: u64,
    pub text: String,
    pub hashtags: Vec<String>,
}

/// Flatten a raw record. Retweets always resolve to the original's full text.
pub fn normalize(record: &RawRecord) -> Result<NormalizedRow> {
    let text = match &record.content {
        Some(Content::Repost { original_text, .. }) => original_text.clone(),
        Some(Content::Original { text }) => text.clone(),
        None => return Err(CollectError::MalformedRecord { id: record.id }),
    };

    Ok(NormalizedRow {
        username: record.author.handle.clone(),
        description: record.author.bio.clone(),
        location: record.author.location.clone(),
        following: record.author.following,
        followers: record.author.followers,
        totaltweets: record.author.post_count,
        retweetcount: record.reshare_count,
        text,
        hashtags: record.tags.clone(),
    })
}
