//! Publication date lookup.
//!
//! Tries `<meta property>` entries first, then scans date-looking elements
//! for text matching one of [`DATE_PATTERNS`]. The matched substring is
//! returned verbatim.

use crate::extractors::meta_content_raw;
use crate::extractors::rules::{ExtractionRules, contains_any_token};
use crate::models::{DateInfo, DateSource};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::debug;

const MONTHS: &str = "January|February|March|April|May|June|July|August|September|October|November|December";

/// Date shapes recognised in element text, tried in order.
///
/// Group 1 is the date itself. The trailing `(?:\D|$)` only rejects a longer
/// digit run, so a date glued to a time suffix (`2024-01-01T10:00`) or to
/// letters still matches.
static DATE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // 2024-01-31
        Regex::new(r"(?:^|\D)(\d{4}-\d{2}-\d{2})(?:\D|$)").unwrap(),
        // 31/01/2024
        Regex::new(r"(?:^|\D)(\d{1,2}/\d{1,2}/\d{4})(?:\D|$)").unwrap(),
        // 31 January 2024
        Regex::new(&format!(r"(?i)(?:^|\D)(\d{{1,2}}\s+(?:{MONTHS})\s+\d{{4}})(?:\D|$)")).unwrap(),
        // January 31, 2024
        Regex::new(&format!(r"(?i)\b((?:{MONTHS})\s+\d{{1,2}},?\s+\d{{4}})(?:\D|$)")).unwrap(),
    ]
});

/// Locate the publication date of a document.
pub fn extract_date(document: &Html, rules: &ExtractionRules) -> DateInfo {
    for property in &rules.date_meta_properties {
        if let Some(value) = meta_content_raw(document, "property", property) {
            debug!(%property, %value, "Date found in meta tag");
            return DateInfo::found(value, DateSource::MetaTag);
        }
    }

    let candidates = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| {
            rules
                .date_element_tags
                .iter()
                .any(|t| el.value().name().eq_ignore_ascii_case(t))
        })
        .filter(|el| {
            el.value()
                .attr("class")
                .is_some_and(|c| contains_any_token(c, &rules.date_class_tokens))
        });

    for element in candidates {
        let text = element.text().collect::<String>();
        if let Some(found) = match_date(&text) {
            debug!(tag = element.value().name(), value = %found, "Date found in element text");
            return DateInfo::found(found, DateSource::DateElement);
        }
    }

    DateInfo::missing()
}

/// First date-shaped substring of `text`, trying patterns in priority order.
pub fn match_date(text: &str) -> Option<String> {
    DATE_PATTERNS
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
