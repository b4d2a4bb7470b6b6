//! Article extraction from raw HTML.
//!
//! [`scrape`] parses a page and runs every extractor over it to assemble an
//! [`ArticleRecord`]. Each piece is independent:
//!
//! | Field | Module | Strategy |
//! |-------|--------|----------|
//! | title | this module | first `<h1>`, then `og:title` |
//! | date | [`date`] | date meta tags, then date-classed element text |
//! | author | [`author`] | author meta tags, then author-classed element text |
//! | content | [`content`] | ranked container rules, ad filtering, paragraph cleanup |
//!
//! Nothing here fails: a missing field is recorded as `None` (or an empty
//! title) and extraction carries on.

pub mod author;
pub mod content;
pub mod date;
pub mod rules;

use crate::models::ArticleRecord;
use crate::utils::collapse_whitespace;
use chrono::{SecondsFormat, Utc};
use rules::ExtractionRules;
use scraper::{Html, Selector};
use tracing::{info, instrument};

/// Parse `raw_html` fetched from `url` and assemble its article record.
#[instrument(level = "info", skip_all, fields(%url, bytes = raw_html.len()))]
pub fn scrape(raw_html: &str, url: &str, rules: &ExtractionRules) -> ArticleRecord {
    let document = Html::parse_document(raw_html);

    let title = extract_title(&document);
    let date = date::extract_date(&document, rules);
    let author = author::extract_author(&document, rules);
    let content = content::extract_content(&document, url, rules);

    info!(
        title_found = !title.is_empty(),
        date_found = date.published_date.is_some(),
        author_found = author.is_some(),
        paragraphs = content.as_ref().map_or(0, Vec::len),
        "Extracted article"
    );

    ArticleRecord {
        url: url.to_string(),
        title,
        date,
        author,
        content,
        scraped_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

/// Headline text: first non-empty `<h1>`, else `og:title`, else empty.
pub fn extract_title(document: &Html) -> String {
    if let Ok(selector) = Selector::parse("h1") {
        if let Some(h1) = document.select(&selector).next() {
            let title = collapse_whitespace(&h1.text().collect::<String>());
            if !title.is_empty() {
                return title;
            }
        }
    }

    meta_content(document, "property", "og:title")
        .map(|t| collapse_whitespace(&t))
        .unwrap_or_default()
}

/// `content` of the first `<meta>` whose `key_attr` equals `key`
/// (ASCII case-insensitive), skipping entries with a blank `content`.
pub fn meta_content(document: &Html, key_attr: &str, key: &str) -> Option<String> {
    meta_contents(document, key_attr, key)
        .into_iter()
        .find(|c| !c.trim().is_empty())
}

/// Like [`meta_content`], but a present-but-blank `content` is returned as is.
pub fn meta_content_raw(document: &Html, key_attr: &str, key: &str) -> Option<String> {
    meta_contents(document, key_attr, key).into_iter().next()
}

fn meta_contents(document: &Html, key_attr: &str, key: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse("meta") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter(|m| m.value().attr(key_attr).is_some_and(|v| v.eq_ignore_ascii_case(key)))
        .filter_map(|m| m.value().attr("content"))
        .map(str::to_string)
        .collect()
}
