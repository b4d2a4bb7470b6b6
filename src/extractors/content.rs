//! Article body location and cleanup.
//!
//! # Pipeline
//!
//! 1. **Candidates**: the first container rule (see [`ExtractionRules::rules_for_url`])
//!    matching any element supplies the candidate set
//! 2. **Ad filter**: candidates whose class carries an ad token are dropped
//! 3. **Selection**: the candidate with the most `<p>` text wins; ties go to
//!    the earliest in document order
//! 4. **Pruning**: ad-classed `div`/`aside`/`iframe`/`script`/`style`
//!    descendants of the winner are skipped
//! 5. **Paragraphs**: normalized `p`/`h2`/`h3` text, length-filtered,
//!    deduplicated, and screened for boilerplate phrases
//!
//! The parsed document is never mutated; pruning is done by not descending
//! into rejected subtrees.

use crate::extractors::rules::{ContainerRule, ElementMatch, ExtractionRules};
use crate::utils::{collapse_whitespace, normalize, truncate_for_log};
use itertools::Itertools;
use scraper::{ElementRef, Html};
use tracing::{debug, instrument};

/// A possible article-body container.
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub element: ElementRef<'a>,
    /// Total characters of `<p>` text inside the element.
    pub text_len: usize,
}

impl<'a> Candidate<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self {
            element,
            text_len: paragraph_text_len(element),
        }
    }

    pub fn tag(&self) -> &str {
        self.element.value().name()
    }

    pub fn class(&self) -> Option<&str> {
        self.element.value().attr("class")
    }
}

/// Extract the cleaned body paragraphs of the article at `url`.
///
/// Returns `None` when no container rule matches, when every candidate is an
/// ad container, or when no paragraph survives filtering.
#[instrument(level = "debug", skip_all, fields(%url))]
pub fn extract_content(document: &Html, url: &str, rules: &ExtractionRules) -> Option<Vec<String>> {
    let (rule, matched) = find_candidates(document, url, rules)?;
    debug!(rule = %rule.name, matched = matched.len(), "Container rule matched");

    let candidates: Vec<Candidate<'_>> = matched
        .into_iter()
        .filter(|el| {
            let is_ad = el.value().attr("class").is_some_and(|c| rules.is_ad_class(c));
            if is_ad {
                debug!(class = ?el.value().attr("class"), "Dropping ad-classed candidate");
            }
            !is_ad
        })
        .map(Candidate::new)
        .collect();

    let Some(main) = select_main(&candidates) else {
        debug!(rule = %rule.name, "All candidates were ad containers");
        return None;
    };
    debug!(tag = main.tag(), class = ?main.class(), text_len = main.text_len, "Selected main container");

    let paragraphs = extract_paragraphs(main.element, rules);
    if paragraphs.is_empty() {
        debug!("Main container produced no usable paragraphs");
        None
    } else {
        Some(paragraphs)
    }
}

/// Elements matched by the first rule that matches anything, with that rule.
pub fn find_candidates<'a, 'r>(
    document: &'a Html,
    url: &str,
    rules: &'r ExtractionRules,
) -> Option<(&'r ContainerRule, Vec<ElementRef<'a>>)> {
    rules.rules_for_url(url).find_map(|rule| {
        let matched: Vec<ElementRef<'a>> = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| rule.matches(el))
            .collect();
        if matched.is_empty() { None } else { Some((rule, matched)) }
    })
}

/// The candidate with the largest paragraph text total, earliest on ties.
pub fn select_main<'c, 'a>(candidates: &'c [Candidate<'a>]) -> Option<&'c Candidate<'a>> {
    candidates.iter().fold(None, |best: Option<&Candidate<'a>>, c| match best {
        Some(b) if b.text_len >= c.text_len => Some(b),
        _ => Some(c),
    })
}

fn paragraph_text_len(element: ElementRef<'_>) -> usize {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == "p")
        .map(|el| collapse_whitespace(&el.text().collect::<String>()).chars().count())
        .sum()
}

/// Cleaned paragraphs of `container` in document order.
pub fn extract_paragraphs(container: ElementRef<'_>, rules: &ExtractionRules) -> Vec<String> {
    let mut raw = Vec::new();
    collect_paragraph_text(container, rules, &mut raw);

    raw.into_iter()
        .map(|text| normalize(&text))
        .filter(|text| {
            let keep = text.chars().count() > rules.min_paragraph_chars;
            if !keep && !text.is_empty() {
                debug!(paragraph = %text, "Dropping short paragraph");
            }
            keep
        })
        .filter(|text| {
            let boilerplate = rules.is_boilerplate(text);
            if boilerplate {
                debug!(paragraph = %truncate_for_log(text, 80), "Dropping boilerplate paragraph");
            }
            !boilerplate
        })
        .unique()
        .collect()
}

fn collect_paragraph_text(element: ElementRef<'_>, rules: &ExtractionRules, out: &mut Vec<String>) {
    for child in element.children().filter_map(ElementRef::wrap) {
        let tag = child.value().name();
        if is_prunable(child, rules) {
            debug!(%tag, class = ?child.value().attr("class"), "Pruning ad subtree");
            continue;
        }
        if rules.paragraph_tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            out.push(child.text().collect::<String>());
        }
        collect_paragraph_text(child, rules, out);
    }
}

fn is_prunable(element: ElementRef<'_>, rules: &ExtractionRules) -> bool {
    let tag = element.value().name();
    rules.prunable_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
        && element.value().attr("class").is_some_and(|c| rules.is_ad_class(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://news.example.com/2024/01/01/story";

    fn content_of(html: &str) -> Option<Vec<String>> {
        extract_content(&Html::parse_document(html), URL, &ExtractionRules::default())
    }

    fn para(len: usize, ch: char) -> String {
        std::iter::repeat_n(ch, len).collect()
    }

    #[test]
    fn test_basic_article_content() {
        let content = content_of(
            r#"<div class="article-content">
                 <p>This is a sufficiently long first paragraph text.</p>
                 <p>Ad</p>
               </div>"#,
        );
        assert_eq!(
            content,
            Some(vec!["This is a sufficiently long first paragraph text.".to_string()])
        );
    }

    #[test]
    fn test_no_container_yields_none() {
        let content = content_of(
            r#"<div class="sidebar"><p>Some long sidebar paragraph about other things.</p></div>"#,
        );
        assert_eq!(content, None);
    }

    #[test]
    fn test_article_tag_preferred_over_class_rule() {
        let content = content_of(
            r#"<div class="content"><p>Paragraph inside the generic content wrapper.</p></div>
               <article><p>Paragraph inside the semantic article element.</p></article>"#,
        );
        assert_eq!(
            content,
            Some(vec!["Paragraph inside the semantic article element.".to_string()])
        );
    }

    #[test]
    fn test_site_specific_rule_for_known_domain() {
        let html = r#"
            <article><p>Teaser text that is not the real article body.</p></article>
            <div class="read__content"><p>Isi berita yang sebenarnya dan cukup panjang.</p></div>"#;
        let doc = Html::parse_document(html);
        let rules = ExtractionRules::default();

        let site = extract_content(&doc, "https://nasional.kompas.com/read/2024/01/01/x", &rules);
        assert_eq!(site, Some(vec!["Isi berita yang sebenarnya dan cukup panjang.".to_string()]));

        let generic = extract_content(&doc, URL, &rules);
        assert_eq!(
            generic,
            Some(vec!["Teaser text that is not the real article body.".to_string()])
        );
    }

    #[test]
    fn test_larger_container_selected_regardless_of_order() {
        let small = para(300, 's');
        let large = para(500, 'l');
        for html in [
            format!(r#"<article><p>{small}</p></article><article><p>{large}</p></article>"#),
            format!(r#"<article><p>{large}</p></article><article><p>{small}</p></article>"#),
        ] {
            assert_eq!(content_of(&html), Some(vec![large.clone()]));
        }
    }

    #[test]
    fn test_tie_goes_to_first_candidate() {
        let first = format!("First {}", para(40, 'a'));
        let second = format!("Other {}", para(40, 'b'));
        let html = format!(r#"<article><p>{first}</p></article><article><p>{second}</p></article>"#);
        assert_eq!(content_of(&html), Some(vec![first]));
    }

    #[test]
    fn test_select_main_on_empty_slice() {
        assert!(select_main(&[]).is_none());
    }

    #[test]
    fn test_ad_candidates_dropped() {
        let content = content_of(
            r#"<div class="content promo-box"><p>Promotional copy that is quite long indeed and more.</p><p>Even more promotional copy to inflate the size a lot.</p></div>
               <div class="content"><p>The genuine article paragraph lives here.</p></div>"#,
        );
        assert_eq!(content, Some(vec!["The genuine article paragraph lives here.".to_string()]));
    }

    #[test]
    fn test_all_candidates_ads_yields_none() {
        let content = content_of(r#"<article class="sponsored-ads"><p>A sponsored story that is long enough.</p></article>"#);
        assert_eq!(content, None);
    }

    #[test]
    fn test_ad_subtrees_pruned() {
        let content = content_of(
            r#"<article>
                 <p>Opening paragraph of the real story text.</p>
                 <div class="inline-banner"><p>Inline banner paragraph that should vanish.</p></div>
                 <aside class="related-links"><h3>Related coverage heading that is long</h3></aside>
                 <section class="newsletter"><p>Section elements are not pruned by class.</p></section>
                 <div class="body"><p>Closing paragraph of the real story text.</p></div>
               </article>"#,
        );
        assert_eq!(
            content,
            Some(vec![
                "Opening paragraph of the real story text.".to_string(),
                "Section elements are not pruned by class.".to_string(),
                "Closing paragraph of the real story text.".to_string(),
            ])
        );
    }

    #[test]
    fn test_duplicates_emitted_once_at_first_position() {
        let content = content_of(
            r#"<article>
                 <p>Repeated paragraph about the flood response.</p>
                 <h2>A subheading that is long enough to keep</h2>
                 <p>Repeated   paragraph about the flood response.</p>
                 <h3>Another subheading that is long enough</h3>
               </article>"#,
        );
        assert_eq!(
            content,
            Some(vec![
                "Repeated paragraph about the flood response.".to_string(),
                "A subheading that is long enough to keep".to_string(),
                "Another subheading that is long enough".to_string(),
            ])
        );
    }

    #[test]
    fn test_boilerplate_paragraphs_dropped() {
        let content = content_of(
            r#"<article>
                 <p>Officials confirmed the findings on Tuesday morning.</p>
                 <p>Please SUBSCRIBE now to keep reading this story.</p>
                 <p>Click here to download our app for more news.</p>
                 <p>Nikmati akses tanpa batas dengan berlangganan.</p>
               </article>"#,
        )
        .unwrap();
        assert_eq!(content, vec!["Officials confirmed the findings on Tuesday morning.".to_string()]);
        assert!(content.iter().all(|p| !p.to_lowercase().contains("subscribe")));
    }

    #[test]
    fn test_length_filter_is_strict() {
        let exactly = para(20, 'x');
        let longer = para(21, 'y');
        let html = format!(r#"<article><p>{exactly}</p><p>{longer}</p></article>"#);
        assert_eq!(content_of(&html), Some(vec![longer]));
    }

    #[test]
    fn test_only_short_paragraphs_yields_none() {
        assert_eq!(content_of(r#"<article><p>Too short.</p></article>"#), None);
    }

    #[test]
    fn test_paragraph_text_normalized() {
        let content = content_of(
            r#"<article><p>Menteri  <b>Kesehatan</b> berkata:
               “kami akan mengusut” (kata dia).</p></article>"#,
        );
        assert_eq!(
            content,
            Some(vec!["Menteri Kesehatan berkata kami akan mengusut kata dia.".to_string()])
        );
    }

    #[test]
    fn test_repeated_calls_are_independent() {
        let doc = Html::parse_document(
            r#"<article><p>The same paragraph appears in both calls.</p></article>"#,
        );
        let rules = ExtractionRules::default();
        let first = extract_content(&doc, URL, &rules);
        let second = extract_content(&doc, URL, &rules);
        assert_eq!(first, second);
        assert!(first.is_some());
    }

    #[test]
    fn test_candidate_text_len_counts_paragraphs_only() {
        let doc = Html::parse_document(
            r#"<article><h2>Heading text is not counted</h2><p>12345</p><div><p>678</p></div></article>"#,
        );
        let rules = ExtractionRules::default();
        let (_, matched) = find_candidates(&doc, URL, &rules).unwrap();
        let candidate = Candidate::new(matched[0]);
        assert_eq!(candidate.text_len, 8);
        assert_eq!(candidate.tag(), "article");
    }
}
