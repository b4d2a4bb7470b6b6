//! Byline lookup: author meta tags, then elements with an `author` class.

use crate::extractors::meta_content;
use crate::extractors::rules::{ExtractionRules, contains_any_token};
use crate::utils::collapse_whitespace;
use scraper::{ElementRef, Html};
use tracing::debug;

/// Locate the article author.
///
/// Meta entries (`name` or `property`) are consulted first. Otherwise the
/// first element whose class mentions an author token is used, provided its
/// text is non-empty and shorter than `max_author_chars`.
pub fn extract_author(document: &Html, rules: &ExtractionRules) -> Option<String> {
    for name in &rules.author_meta_names {
        let found = meta_content(document, "name", name).or_else(|| meta_content(document, "property", name));
        if let Some(value) = found {
            debug!(meta = %name, author = %value, "Author found in meta tag");
            return Some(value.trim().to_string());
        }
    }

    let element = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| {
            rules
                .author_element_tags
                .iter()
                .any(|t| el.value().name().eq_ignore_ascii_case(t))
        })
        .find(|el| {
            el.value()
                .attr("class")
                .is_some_and(|c| contains_any_token(c, &rules.author_class_tokens))
        })?;

    let text = collapse_whitespace(&element.text().collect::<String>());
    let chars = text.chars().count();
    if text.is_empty() || chars >= rules.max_author_chars {
        debug!(chars, "Author element text rejected");
        return None;
    }
    Some(text)
}
