//! Labels the `text` column of a collected CSV with sentiment and confidence.

use clap::Parser;
use std::path::PathBuf;

use tweet_sentiment_analyzer::config::sentiment::DEFAULT_SENTIMENT_CONFIG_PATH;
use tweet_sentiment_analyzer::config::SentimentConfig;
use tweet_sentiment_analyzer::{sentiment, telemetry};

#[derive(Parser, Debug)]
#[command(name = "analyze_sentiment")]
#[command(about = "Label tweet sentiment with the classifier named in --config \
    (offline lexicon by default, or a hosted transformer model).")]
struct Args {
    /// CSV file containing tweets in a 'text' column
    input: PathBuf,

    /// Filename for the CSV with sentiment labels
    #[arg(long, default_value = "sentiment_results.csv")]
    output: PathBuf,

    /// Classifier configuration (TOML)
    #[arg(long, default_value = DEFAULT_SENTIMENT_CONFIG_PATH)]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let args = Args::parse();
    let cfg = SentimentConfig::load_or_default(&args.config)?;
    // Safe diagnostics: provider + model + key length only
    tracing::info!(
        provider = %cfg.provider,
        model = %cfg.model,
        batch_size = cfg.batch_size,
        key_len = cfg.api_key.len(),
        "sentiment config loaded"
    );

    let classifier = sentiment::build_classifier(&cfg)?;
    sentiment::analyze_file(
        classifier.as_ref(),
        &args.input,
        &args.output,
        cfg.batch_size,
    )
    .await?;

    println!("Sentiment analysis complete: {}", args.output.display());
    Ok(())
}
