//! Command-line interface definitions.
//!
//! Every option can also be supplied through an environment variable.

use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::fetcher::DEFAULT_USER_AGENT;

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Scrape a single article into ./articles
/// article_scraper https://www.kompas.id/artikel/some-story
///
/// # Scrape a list, also writing .txt renditions, two seconds apart
/// article_scraper --url-file urls.txt -o out --text --delay-ms 2000
///
/// # Use a custom rule table
/// article_scraper --rules rules.yaml https://example.com/news/story
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Article URLs to scrape
    pub urls: Vec<String>,

    /// File with one URL per line; blank lines and `#` comments are ignored
    #[arg(short = 'f', long, env = "ARTICLE_SCRAPER_URL_FILE")]
    pub url_file: Option<PathBuf>,

    /// Output directory for article files
    #[arg(short, long, env = "ARTICLE_SCRAPER_OUTPUT_DIR", default_value = "articles")]
    pub output_dir: String,

    /// Delay between consecutive requests, in milliseconds
    #[arg(long, env = "ARTICLE_SCRAPER_DELAY_MS", default_value_t = 1000)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long, env = "ARTICLE_SCRAPER_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long, env = "ARTICLE_SCRAPER_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// YAML file replacing the built-in extraction rules
    #[arg(short, long, env = "ARTICLE_SCRAPER_RULES")]
    pub rules: Option<PathBuf>,

    /// Also write a plain-text rendition of each article
    #[arg(long)]
    pub text: bool,

    /// Also keep the raw HTML of each fetched page
    #[arg(long)]
    pub save_html: bool,
}

impl Cli {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Positional URLs followed by those from `--url-file`, duplicates removed.
    #[instrument(level = "debug", skip_all)]
    pub fn collect_urls(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let mut urls = self.urls.clone();
        if let Some(path) = &self.url_file {
            let raw = std::fs::read_to_string(path)?;
            let from_file = parse_url_list(&raw);
            debug!(path = %path.display(), count = from_file.len(), "Read URL file");
            urls.extend(from_file);
        }

        let mut seen = std::collections::HashSet::new();
        urls.retain(|u| seen.insert(u.clone()));

        if urls.is_empty() {
            return Err("no URLs given; pass them as arguments or with --url-file".into());
        }
        Ok(urls)
    }
}

/// Non-empty, non-comment lines of a URL list, trimmed.
pub fn parse_url_list(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
