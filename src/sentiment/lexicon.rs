// src/sentiment/lexicon.rs
//! Offline lexicon scorer, used when no inference endpoint is configured.

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::{Classifier, SentimentScore};

static LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

#[derive(Debug, Clone, Default)]
pub struct LexiconClassifier;

impl LexiconClassifier {
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *LEXICON.get(w).unwrap_or(&0)
    }

    /// Returns (score, token count).
    /// A negator within the previous 1..=3 tokens flips the sign of a word's score.
    pub fn score_text(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score: i32 = 0;

        for i in 0..tokens.len() {
            let w = tokens[i].as_str();
            let negated = (1..=3).any(|k| i >= k && is_negator(tokens[i - k].as_str()));

            let base = self.word_score(w);
            if base != 0 {
                score += if negated { -base } else { base };
            }
        }

        (score, tokens.len())
    }

    /// Label plus a confidence in [0.5, 1): 0.5 for neutral, growing with |score|.
    pub fn label_text(&self, text: &str) -> SentimentScore {
        let (score, _) = self.score_text(text);
        let label = match score {
            s if s > 0 => "positive",
            s if s < 0 => "negative",
            _ => "neutral",
        };
        let magnitude = score.unsigned_abs() as f32;
        SentimentScore {
            label: label.to_string(),
            score: 0.5 + 0.5 * magnitude / (magnitude + 2.0),
        }
    }
}

#[async_trait]
impl Classifier for LexiconClassifier {
    async fn classify(&self, batch: &[String]) -> Result<Vec<SentimentScore>> {
        Ok(batch.iter().map(|t| self.label_text(t)).collect())
    }

    fn name(&self) -> &'static str {
        "lexicon"
    }
}

/// Alphanumeric (plus apostrophe) tokens, lower-cased.
fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not"
            | "no"
            | "never"
            | "isn't"
            | "wasn't"
            | "aren't"
            | "won't"
            | "can't"
            | "cannot"
            | "don't"
            | "doesn't"
            | "without"
    )
}
