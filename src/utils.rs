//! Utility functions for text cleanup, naming, and file system checks.
//!
//! - Text normalization applied to every extracted paragraph
//! - String truncation and slugification for logging and output file names
//! - File system validation for the output directory

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};
use url::Url;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

// Word characters, whitespace, and . , ! ? " -
static DISALLOWED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[^\w\s.,!?"\-]"#).unwrap());

/// Collapse every whitespace run to a single space and trim both ends.
pub fn collapse_whitespace(raw: &str) -> String {
    WHITESPACE_RE.replace_all(raw, " ").trim().to_string()
}

/// Normalize raw extracted text.
///
/// Removes characters outside word characters, whitespace, and
/// `. , ! ? " -`, then collapses whitespace runs to one space and trims.
/// Stripping runs before collapsing so that a removed symbol between two
/// spaces cannot leave a double space behind, which keeps the function
/// idempotent.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(normalize("  Hello,\n\n world!  "), "Hello, world!");
/// assert_eq!(normalize("a & b"), "a b");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let kept = DISALLOWED_RE.replace_all(raw, "");
    collapse_whitespace(&kept)
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` bytes (moved back to a char boundary) with
/// an ellipsis and byte count indicator appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Convert a string to a file-name-friendly slug.
///
/// Lowercases, drops everything but alphanumerics, spaces, and hyphens, and
/// replaces spaces with hyphens.
pub fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Derive an output file stem from an article URL.
///
/// Uses the last non-empty path segment, falling back to the host, and then
/// to `"article"` when the URL yields nothing usable.
pub fn slug_from_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        let slug = slugify(url);
        return if slug.is_empty() { "article".to_string() } else { slug };
    };

    let from_path = parsed
        .path_segments()
        .and_then(|mut segments| segments.rfind(|s| !s.is_empty()))
        .map(|s| slugify(s.trim_end_matches(".html").trim_end_matches(".htm")))
        .filter(|s| !s.is_empty());

    from_path
        .or_else(|| parsed.host_str().map(|h| slugify(&h.replace('.', "-"))))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "article".to_string())
}

/// Create the output directory if needed and confirm files can be written there.
///
/// # Errors
///
/// Returns an error if the directory cannot be created, is not a directory,
/// or rejects a test write.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    let dir = Path::new(path);
    fs::create_dir_all(dir).await?;
    if !fs::metadata(dir).await?.is_dir() {
        return Err(format!("{path} is not a directory").into());
    }

    let check_file = dir.join(format!(".article_scraper_write_check_{}", std::process::id()));
    fs::write(&check_file, b"").await?;
    if let Err(e) = fs::remove_file(&check_file).await {
        warn!(file = %check_file.display(), error = %e, "Could not remove write check file");
    }
    info!("Output directory is writable");
    Ok(())
}
