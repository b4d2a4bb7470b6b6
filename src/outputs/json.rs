//! JSON output for extracted articles.
//!
//! Records are written as pretty-printed UTF-8 JSON with non-ASCII text kept
//! as-is. Field order follows [`ArticleRecord`]:
//! `url, title, date, author, content, scraped_at`.

use crate::models::ArticleRecord;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `record` to `path`, creating the parent directory if needed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_article(record: &ArticleRecord, path: &Path) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(record)?;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent).await {
            error!(dir = %parent.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(path, json).await?;
    info!(paragraphs = record.content.as_ref().map_or(0, Vec::len), "Wrote article JSON");
    Ok(())
}
