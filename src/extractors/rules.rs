//! Ranked rule table and token lists driving the extraction heuristics.
//!
//! Every list the extractors consult lives in [`ExtractionRules`], which is
//! plain `serde` data. The built-in defaults cover the generic case plus a
//! handful of known Indonesian news domains; a YAML file passed with
//! `--rules` replaces them wholesale.
//!
//! # Rule evaluation
//!
//! Container rules are tried in table order. Site-specific rules (those with
//! a `domain`) only apply when the article URL's host is that domain or one
//! of its subdomains. The first rule that matches at least one element
//! supplies the candidate set.

use scraper::ElementRef;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

/// A predicate over a single element.
pub trait ElementMatch {
    fn matches(&self, element: &ElementRef<'_>) -> bool;
}

/// Closed set of element predicates usable from rule data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Matcher {
    /// Element has exactly this (lowercase) tag name.
    Tag { name: String },
    /// Attribute is present and equal to `value`.
    AttrEquals { attr: String, value: String },
    /// Attribute value contains any token, ASCII case-insensitively.
    AttrContainsAny { attr: String, tokens: Vec<String> },
}

impl Matcher {
    pub fn tag(name: &str) -> Self {
        Self::Tag { name: name.to_string() }
    }

    pub fn attr_equals(attr: &str, value: &str) -> Self {
        Self::AttrEquals {
            attr: attr.to_string(),
            value: value.to_string(),
        }
    }

    pub fn attr_contains_any(attr: &str, tokens: &[&str]) -> Self {
        Self::AttrContainsAny {
            attr: attr.to_string(),
            tokens: to_strings(tokens),
        }
    }
}

impl ElementMatch for Matcher {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        match self {
            Matcher::Tag { name } => element.value().name().eq_ignore_ascii_case(name),
            Matcher::AttrEquals { attr, value } => element.value().attr(attr) == Some(value.as_str()),
            Matcher::AttrContainsAny { attr, tokens } => element
                .value()
                .attr(attr)
                .is_some_and(|v| contains_any_token(v, tokens)),
        }
    }
}

/// One entry of the container rule table; all matchers must hold.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContainerRule {
    /// Label used in logs.
    pub name: String,
    /// Restrict the rule to this host and its subdomains.
    #[serde(default)]
    pub domain: Option<String>,
    pub matchers: Vec<Matcher>,
}

impl ContainerRule {
    fn generic(name: &str, matchers: Vec<Matcher>) -> Self {
        Self {
            name: name.to_string(),
            domain: None,
            matchers,
        }
    }

    fn site(name: &str, domain: &str, matchers: Vec<Matcher>) -> Self {
        Self {
            name: name.to_string(),
            domain: Some(domain.to_string()),
            matchers,
        }
    }

    /// Whether this rule may be used for a page served from `host`.
    pub fn applies_to(&self, host: Option<&str>) -> bool {
        match (&self.domain, host) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(domain), Some(host)) => {
                let host = host.to_ascii_lowercase();
                let domain = domain.to_ascii_lowercase();
                host == domain || host.ends_with(&format!(".{domain}"))
            }
        }
    }
}

impl ElementMatch for ContainerRule {
    fn matches(&self, element: &ElementRef<'_>) -> bool {
        !self.matchers.is_empty() && self.matchers.iter().all(|m| m.matches(element))
    }
}

/// All tunable lists used by the date, author, and content extractors.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ExtractionRules {
    /// Ranked container rules, site-specific first.
    pub container_rules: Vec<ContainerRule>,
    /// Class tokens marking advertisement/boilerplate subtrees.
    pub ad_tokens: Vec<String>,
    /// Tags pruned from the chosen container when their class carries an ad token.
    pub prunable_tags: Vec<String>,
    /// Tags whose text becomes paragraphs.
    pub paragraph_tags: Vec<String>,
    /// Phrases that reject a paragraph outright.
    pub boilerplate_phrases: Vec<String>,
    /// Paragraphs must be strictly longer than this many characters.
    pub min_paragraph_chars: usize,
    /// `<meta property>` names consulted for the publication date, in order.
    pub date_meta_properties: Vec<String>,
    /// Tags scanned for date text.
    pub date_element_tags: Vec<String>,
    /// Class tokens marking a date element.
    pub date_class_tokens: Vec<String>,
    /// `<meta name|property>` names consulted for the author.
    pub author_meta_names: Vec<String>,
    /// Tags scanned for a byline.
    pub author_element_tags: Vec<String>,
    /// Class tokens marking a byline element.
    pub author_class_tokens: Vec<String>,
    /// Bylines must be shorter than this many characters.
    pub max_author_chars: usize,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            container_rules: default_container_rules(),
            ad_tokens: to_strings(&[
                "ads",
                "advertisement",
                "banner",
                "promo",
                "sponsor",
                "widget",
                "subscription",
                "subscribe",
                "premium",
                "recommended",
                "related",
                "social-share",
                "newsletter",
                "popup",
                "modal",
            ]),
            prunable_tags: to_strings(&["div", "aside", "iframe", "script", "style"]),
            paragraph_tags: to_strings(&["p", "h2", "h3"]),
            boilerplate_phrases: to_strings(&[
                "subscribe",
                "premium",
                "download",
                "install",
                "click here",
                "sign up",
                "advertisement",
                "sponsored",
                "recommended",
                "pre-order",
                "bonus",
                "kompas.id",
                "akses",
                "langganan",
                "edisi khusus",
            ]),
            min_paragraph_chars: 20,
            date_meta_properties: to_strings(&[
                "article:published_time",
                "article:modified_time",
                "og:published_time",
            ]),
            date_element_tags: to_strings(&["time", "span", "div"]),
            date_class_tokens: to_strings(&["date", "time", "published", "modified"]),
            author_meta_names: to_strings(&["author", "article:author"]),
            author_element_tags: to_strings(&["a", "span", "div"]),
            author_class_tokens: to_strings(&["author"]),
            max_author_chars: 100,
        }
    }
}

impl ExtractionRules {
    /// Load a rule set from a YAML file; omitted keys keep their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let rules = Self::from_yaml_str(&raw)?;
        info!(
            container_rules = rules.container_rules.len(),
            ad_tokens = rules.ad_tokens.len(),
            boilerplate_phrases = rules.boilerplate_phrases.len(),
            "Loaded extraction rules"
        );
        Ok(rules)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Container rules usable for `url`, in priority order.
    pub fn rules_for_url<'a>(&'a self, url: &str) -> impl Iterator<Item = &'a ContainerRule> + 'a {
        let host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string));
        self.container_rules
            .iter()
            .filter(move |rule| rule.applies_to(host.as_deref()))
    }

    /// Whether a class attribute value carries any ad token.
    pub fn is_ad_class(&self, class: &str) -> bool {
        contains_any_token(class, &self.ad_tokens)
    }

    /// Whether a paragraph contains any boilerplate phrase.
    pub fn is_boilerplate(&self, paragraph: &str) -> bool {
        contains_any_token(paragraph, &self.boilerplate_phrases)
    }
}

fn default_container_rules() -> Vec<ContainerRule> {
    vec![
        ContainerRule::site(
            "kompas.id body",
            "kompas.id",
            vec![Matcher::attr_contains_any("class", &["article-content", "ksm-article"])],
        ),
        ContainerRule::site(
            "kompas.com read__content",
            "kompas.com",
            vec![Matcher::attr_contains_any("class", &["read__content"])],
        ),
        ContainerRule::site(
            "detik detail__body-text",
            "detik.com",
            vec![Matcher::attr_contains_any("class", &["detail__body-text"])],
        ),
        ContainerRule::site(
            "tempo detail-konten",
            "tempo.co",
            vec![Matcher::attr_contains_any("class", &["detail-konten", "detail-in"])],
        ),
        ContainerRule::generic("article tag", vec![Matcher::tag("article")]),
        ContainerRule::generic(
            "itemprop articleBody",
            vec![Matcher::attr_equals("itemprop", "articleBody")],
        ),
        ContainerRule::generic("role main", vec![Matcher::attr_equals("role", "main")]),
        ContainerRule::generic(
            "content class",
            vec![
                Matcher::tag("div"),
                Matcher::attr_contains_any(
                    "class",
                    &["article", "content", "story-body", "post-body", "entry", "body-text"],
                ),
            ],
        ),
    ]
}

/// ASCII case-insensitive substring test against a token list.
pub fn contains_any_token(haystack: &str, tokens: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    tokens
        .iter()
        .any(|token| !token.is_empty() && haystack.contains(&token.to_lowercase()))
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        doc.select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    #[test]
    fn test_matcher_variants() {
        let doc = Html::parse_document(
            r#"<div id="x" class="Main-ARTICLE-Body" itemprop="articleBody">t</div>"#,
        );
        let el = first(&doc, "#x");

        assert!(Matcher::tag("div").matches(&el));
        assert!(!Matcher::tag("article").matches(&el));
        assert!(Matcher::attr_equals("itemprop", "articleBody").matches(&el));
        assert!(!Matcher::attr_equals("itemprop", "articlebody").matches(&el));
        assert!(Matcher::attr_contains_any("class", &["article"]).matches(&el));
        assert!(!Matcher::attr_contains_any("class", &["sidebar"]).matches(&el));
        assert!(!Matcher::attr_contains_any("role", &["main"]).matches(&el));
    }

    #[test]
    fn test_rule_requires_all_matchers() {
        let doc = Html::parse_document(r#"<section id="s" class="content">t</section>"#);
        let el = first(&doc, "#s");
        let rule = ContainerRule::generic(
            "div content",
            vec![Matcher::tag("div"), Matcher::attr_contains_any("class", &["content"])],
        );
        assert!(!rule.matches(&el));
        assert!(!ContainerRule::generic("empty", vec![]).matches(&el));
    }

    #[test]
    fn test_site_rules_apply_to_domain_and_subdomains() {
        let rule = ContainerRule::site("k", "kompas.id", vec![Matcher::tag("div")]);
        assert!(rule.applies_to(Some("kompas.id")));
        assert!(rule.applies_to(Some("www.KOMPAS.id")));
        assert!(!rule.applies_to(Some("notkompas.id")));
        assert!(!rule.applies_to(None));
        assert!(ContainerRule::generic("g", vec![]).applies_to(None));
    }

    #[test]
    fn test_rules_for_url_orders_site_rules_first() {
        let rules = ExtractionRules::default();
        let names: Vec<&str> = rules
            .rules_for_url("https://www.kompas.id/artikel/x")
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(names.first(), Some(&"kompas.id body"));
        assert_eq!(names.last(), Some(&"content class"));
        assert!(!names.contains(&"detik detail__body-text"));

        let generic: Vec<&str> = rules
            .rules_for_url("not a url")
            .map(|r| r.name.as_str())
            .collect();
        assert_eq!(generic.first(), Some(&"article tag"));
    }

    #[test]
    fn test_token_checks_are_case_insensitive() {
        let rules = ExtractionRules::default();
        assert!(rules.is_ad_class("Inline-ADVERTISEMENT box"));
        assert!(!rules.is_ad_class("article-body"));
        assert!(rules.is_boilerplate("Please SUBSCRIBE to continue reading today"));
        assert!(rules.is_boilerplate("Baca selengkapnya di Kompas.id sekarang"));
        assert!(!rules.is_boilerplate("The minister spoke to reporters on Monday."));
    }

    #[test]
    fn test_yaml_overrides_keep_defaults() {
        let yaml = r#"
container_rules:
  - name: custom body
    domain: example.com
    matchers:
      - kind: attr_equals
        attr: id
        value: story
  - name: any article
    matchers:
      - kind: tag
        name: article
boilerplate_phrases: ["baca juga"]
"#;
        let rules = ExtractionRules::from_yaml_str(yaml).unwrap();
        assert_eq!(rules.container_rules.len(), 2);
        assert_eq!(rules.container_rules[0].domain.as_deref(), Some("example.com"));
        assert_eq!(rules.container_rules[0].matchers[0], Matcher::attr_equals("id", "story"));
        assert_eq!(rules.boilerplate_phrases, vec!["baca juga".to_string()]);
        assert_eq!(rules.ad_tokens, ExtractionRules::default().ad_tokens);
        assert_eq!(rules.min_paragraph_chars, 20);
    }

    #[test]
    fn test_default_rules_serialize_to_yaml() {
        let yaml = serde_yaml::to_string(&ExtractionRules::default()).unwrap();
        let back = ExtractionRules::from_yaml_str(&yaml).unwrap();
        assert_eq!(back, ExtractionRules::default());
    }
}
