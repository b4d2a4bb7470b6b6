//! # Article Scraper
//!
//! Extracts structured article data (title, publication date, author, body
//! text) from news pages with divergent layouts and writes one normalized
//! JSON record per article.
//!
//! ## Usage
//!
//! ```sh
//! article_scraper -o ./articles https://www.kompas.id/artikel/some-story
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: download each page in turn, with a fixed delay between requests
//! 2. **Extraction**: locate title, date, author, and the article body container,
//!    then strip ad/boilerplate fragments from the body
//! 3. **Output**: write the record as JSON (optionally as text, plus raw HTML)

use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod extractors;
mod fetcher;
mod models;
mod outputs;
mod pipeline;
mod utils;

use cli::Cli;
use extractors::rules::ExtractionRules;
use fetcher::HttpFetcher;
use outputs::ArticleWriter;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("article_scraper starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let urls = args.collect_urls()?;
    info!(count = urls.len(), "URLs to scrape");

    let rules = match &args.rules {
        Some(path) => ExtractionRules::from_yaml_file(path)?,
        None => ExtractionRules::default(),
    };

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let fetcher = HttpFetcher::new(&args.user_agent, args.timeout())?;
    let mut writer = ArticleWriter::new(&args.output_dir, args.text, args.save_html);

    let summary = pipeline::scrape_all(&fetcher, &urls, &rules, &mut writer, args.delay()).await;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        output_dir = %writer.output_dir().display(),
        saved = summary.saved,
        failed = summary.transport_failures + summary.write_failures,
        "Execution complete"
    );

    if summary.saved == 0 {
        return Err("no articles were saved".into());
    }
    Ok(())
}
