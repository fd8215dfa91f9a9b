// src/sentiment/mod.rs
//! Batched sentiment labelling of collected text.

pub mod huggingface;
pub mod lexicon;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;

use crate::config::SentimentConfig;
pub use huggingface::HuggingFaceClassifier;
pub use lexicon::LexiconClassifier;

/// Column the classifier reads from the collection output.
pub const TEXT_COLUMN: &str = "text";

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentScore {
    pub label: String,
    /// Confidence in [0, 1].
    pub score: f32,
}

/// Batch text classifier. Returns exactly one score per input, in input order.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, batch: &[String]) -> Result<Vec<SentimentScore>>;
    fn name(&self) -> &'static str;
}

pub type DynClassifier = Arc<dyn Classifier>;

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("sentiment_batches_total", "Classifier batches sent.");
        describe_counter!("sentiment_texts_total", "Texts labelled by the classifier.");
    });
}

pub fn build_classifier(cfg: &SentimentConfig) -> Result<DynClassifier> {
    match cfg.provider.as_str() {
        "huggingface" => Ok(Arc::new(HuggingFaceClassifier::from_config(cfg)?)),
        "lexicon" => Ok(Arc::new(LexiconClassifier::new())),
        other => bail!("Unsupported provider in config: {other}"),
    }
}

/// Read the `text` column of a CSV file.
pub fn load_texts(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let idx = reader
        .headers()?
        .iter()
        .position(|h| h == TEXT_COLUMN);
    let Some(idx) = idx else {
        bail!("Input CSV must contain a '{TEXT_COLUMN}' column");
    };

    let mut texts = Vec::new();
    for record in reader.records() {
        let record = record?;
        texts.push(record.get(idx).unwrap_or_default().to_string());
    }
    Ok(texts)
}

/// Classify `texts` in chunks of `batch_size`, keeping input order.
pub async fn analyze_texts(
    classifier: &dyn Classifier,
    texts: &[String],
    batch_size: usize,
) -> Result<Vec<SentimentScore>> {
    ensure_metrics_described();

    let mut out = Vec::with_capacity(texts.len());
    for chunk in texts.chunks(batch_size.max(1)) {
        let scores = classifier.classify(chunk).await?;
        if scores.len() != chunk.len() {
            bail!(
                "classifier {} returned {} scores for {} texts",
                classifier.name(),
                scores.len(),
                chunk.len()
            );
        }
        counter!("sentiment_batches_total").increment(1);
        counter!("sentiment_texts_total").increment(chunk.len() as u64);
        out.extend(scores);
    }
    tracing::debug!(
        target: "sentiment",
        texts = texts.len(),
        classifier = classifier.name(),
        "batch run done"
    );
    Ok(out)
}

/// Write `text,label,score` rows, overwriting `output`.
pub fn save_results(texts: &[String], scores: &[SentimentScore], output: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("creating {}", output.display()))?;
    writer.write_record([TEXT_COLUMN, "label", "score"])?;
    for (text, s) in texts.iter().zip(scores) {
        let score = s.score.to_string();
        writer.write_record([text.as_str(), s.label.as_str(), score.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Whole stage: read `input`, classify, write `output`. Returns the number of rows.
pub async fn analyze_file(
    classifier: &dyn Classifier,
    input: &Path,
    output: &Path,
    batch_size: usize,
) -> Result<usize> {
    let texts = load_texts(input)?;
    let scores = analyze_texts(classifier, &texts, batch_size).await?;
    save_results(&texts, &scores, output)?;
    tracing::info!(
        target: "sentiment",
        rows = texts.len(),
        output = %output.display(),
        "sentiment results written"
    );
    Ok(texts.len())
}
