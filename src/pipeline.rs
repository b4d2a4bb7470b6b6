//! Sequential fetch → extract → save loop over a URL list.
//!
//! One page is fully processed before the next request goes out, with a
//! fixed politeness delay between requests. A [`TransportError`] aborts only
//! its own URL: it is logged, counted, and nothing is written for it.
//!
//! [`TransportError`]: crate::fetcher::TransportError

use crate::extractors::{self, rules::ExtractionRules};
use crate::fetcher::Fetch;
use crate::outputs::ArticleWriter;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// URLs a fetch was attempted for.
    pub attempted: usize,
    /// Records written to disk.
    pub saved: usize,
    /// URLs dropped because of a transport failure.
    pub transport_failures: usize,
    /// Saved records whose `content` is null.
    pub missing_content: usize,
    /// Records extracted but not written because of an I/O error.
    pub write_failures: usize,
    /// JSON paths written, in input order.
    pub written: Vec<PathBuf>,
}

/// Scrape every URL in order, pausing `delay` between requests.
#[instrument(level = "info", skip_all, fields(urls = urls.len(), delay_ms = delay.as_millis() as u64))]
pub async fn scrape_all<F: Fetch>(
    fetcher: &F,
    urls: &[String],
    rules: &ExtractionRules,
    writer: &mut ArticleWriter,
    delay: Duration,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for (i, url) in urls.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            debug!(?delay, "Waiting before next request");
            sleep(delay).await;
        }
        summary.attempted += 1;

        let html = match fetcher.fetch(url).await {
            Ok(html) => html,
            Err(e) => {
                error!(index = i, %url, error = %e, "Fetch failed; skipping URL");
                summary.transport_failures += 1;
                continue;
            }
        };

        let record = extractors::scrape(&html, url, rules);
        if record.content.is_none() {
            warn!(index = i, %url, "No article content found");
            summary.missing_content += 1;
        }

        match writer.save(&record, Some(html.as_str())).await {
            Ok(path) => {
                info!(index = i, %url, path = %path.display(), "Saved article");
                summary.saved += 1;
                summary.written.push(path);
            }
            Err(e) => {
                error!(index = i, %url, error = %e, "Failed to write article");
                summary.write_failures += 1;
            }
        }
    }

    info!(
        attempted = summary.attempted,
        saved = summary.saved,
        transport_failures = summary.transport_failures,
        missing_content = summary.missing_content,
        write_failures = summary.write_failures,
        "Scrape run finished"
    );
    summary
}
