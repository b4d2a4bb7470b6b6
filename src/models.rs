//! Data models for extracted articles.
//!
//! - [`ArticleRecord`]: the normalized output for one scraped page
//! - [`DateInfo`]: the publication timestamp and where it was found
//! - [`DateSource`]: which heuristic produced the date
//!
//! Field declaration order is the JSON field order written to disk.

use serde::{Deserialize, Serialize};

/// Where a publication date was found in the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum DateSource {
    /// An OpenGraph/article `<meta property=...>` entry.
    #[serde(rename = "meta tag")]
    MetaTag,
    /// Text of a date-like element matched by one of the date patterns.
    #[serde(rename = "date element")]
    DateElement,
}

/// Publication date as found in the page, kept verbatim.
///
/// The raw matched string is never parsed into a calendar type; downstream
/// consumers deal with the format variance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct DateInfo {
    /// The raw date string, if any was found.
    pub published_date: Option<String>,
    /// Which heuristic produced `published_date`.
    pub extracted_from: Option<DateSource>,
}

impl DateInfo {
    pub fn found(value: impl Into<String>, source: DateSource) -> Self {
        Self {
            published_date: Some(value.into()),
            extracted_from: Some(source),
        }
    }

    pub fn missing() -> Self {
        Self::default()
    }
}

/// A single extracted article.
///
/// `content` is either `None` (no article container was located) or a
/// non-empty list of deduplicated paragraphs longer than 20 characters,
/// in document order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// The URL the page was fetched from.
    pub url: String,
    /// The headline, or an empty string when none was found.
    pub title: String,
    /// Publication date information.
    pub date: DateInfo,
    /// Byline, if one could be located.
    pub author: Option<String>,
    /// Cleaned body paragraphs.
    pub content: Option<Vec<String>>,
    /// RFC 3339 timestamp of when the record was assembled.
    pub scraped_at: String,
}
