//! Tweet collector: binary entrypoint.
//! Searches for a query, flattens each tweet into a row, and writes the rows to CSV.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use tweet_sentiment_analyzer::{pipeline, telemetry, Credentials};

#[derive(Parser, Debug)]
#[command(name = "tweet-sentiment-analyzer")]
#[command(about = "Scrape tweets for a given search query.")]
struct Args {
    /// Twitter search query, e.g. '#SayNoToVaccines -filter:retweets'
    query: String,

    /// Maximum number of tweets to collect
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
    limit: u64,

    /// Filename for the resulting CSV
    #[arg(long, default_value = "scraped_tweets.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let args = Args::parse();

    let credentials = Credentials::from_env()?;
    let rows =
        pipeline::scrape_to_csv(credentials, &args.query, args.limit as usize, &args.output)
            .with_context(|| format!("collecting tweets into {}", args.output.display()))?;

    tracing::info!(rows, output = %args.output.display(), "collection finished");
    println!("Scraping has completed!");
    Ok(())
}
