//! Plain-text rendition of an article record.
//!
//! ```text
//! Title: <title>
//! Publication Date: <date or "Date not found">
//! Author: <author or "Author not found">
//!
//! Article Content:
//! <one paragraph per line, or "Content not found">
//! ```

use crate::models::ArticleRecord;
use std::error::Error;
use std::fmt::Write;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

pub fn render_article(record: &ArticleRecord) -> String {
    let mut out = String::new();
    let title = if record.title.is_empty() { "Title not found" } else { record.title.as_str() };
    let date = record.date.published_date.as_deref().unwrap_or("Date not found");
    let author = record.author.as_deref().unwrap_or("Author not found");

    writeln!(out, "Title: {title}").unwrap();
    writeln!(out, "Publication Date: {date}").unwrap();
    writeln!(out, "Author: {author}").unwrap();
    writeln!(out).unwrap();
    writeln!(out, "Article Content:").unwrap();
    match &record.content {
        Some(paragraphs) => {
            for p in paragraphs {
                writeln!(out, "{p}").unwrap();
            }
        }
        None => {
            writeln!(out, "Content not found").unwrap();
        }
    }
    out
}

#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_article(record: &ArticleRecord, path: &Path) -> Result<(), Box<dyn Error>> {
    fs::write(path, render_article(record)).await?;
    info!("Wrote article text");
    Ok(())
}
