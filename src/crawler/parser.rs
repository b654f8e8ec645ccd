//! HTML parser for extracting links and the page title
//!
//! Two strategies share one signature so the crawl job does not care which
//! one is active:
//! - `ParseMode::Regex`: a tolerant byte scanner; never fails, may produce
//!   false positives or miss links on malformed markup
//! - `ParseMode::Structural`: a full HTML parse with `scraper` over the
//!   lower-cased document
//!
//! Both decode the body leniently: bytes that are not valid UTF-8 (Latin-1 or
//! windows-1252 pages) become U+FFFD and the rest of the page is still used.

use crate::ParseError;
use regex::bytes::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static TITLE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is-u)<title[^>]*>(.*?)</title>").expect("hardcoded regex pattern is valid")
});

static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is-u)<a\s(?:[^>]*?\s)?href\s*=\s*["']([^"']+)["']"#)
        .expect("hardcoded regex pattern is valid")
});

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("head > title").expect("hardcoded selector is valid"));

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("hardcoded selector is valid"));

/// Parser strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Regex,
    Structural,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title, trimmed; empty if the page has none
    pub title: String,

    /// Raw href values in document order, not yet resolved
    pub links: Vec<String>,
}

/// Parses a fetched document and extracts its title and hrefs
///
/// # Arguments
///
/// * `body` - The raw response body
/// * `mode` - Which parser strategy to use
///
/// # Returns
///
/// * `Ok(ParsedPage)` - Title and raw hrefs
/// * `Err(ParseError)` - Not produced by the current strategies; undecodable
///   bytes are replaced instead of rejected
///
/// # Example
///
/// ```
/// use link_ripple::crawler::{parse, ParseMode};
///
/// let html = br#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse(html, ParseMode::Regex).unwrap();
/// assert_eq!(parsed.title, "Test");
/// assert_eq!(parsed.links, vec!["/page".to_string()]);
/// ```
pub fn parse(body: &[u8], mode: ParseMode) -> Result<ParsedPage, ParseError> {
    match mode {
        ParseMode::Regex => Ok(parse_with_regex(body)),
        ParseMode::Structural => parse_structural(body),
    }
}

fn parse_with_regex(body: &[u8]) -> ParsedPage {
    let title = TITLE_REGEX
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).trim().to_string())
        .unwrap_or_default();

    let links = LINK_REGEX
        .captures_iter(body)
        .filter_map(|caps| caps.get(1))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).into_owned())
        .collect();

    ParsedPage { title, links }
}

fn parse_structural(body: &[u8]) -> Result<ParsedPage, ParseError> {
    let text = String::from_utf8_lossy(body).to_lowercase();
    let document = Html::parse_document(&text);

    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let links = document
        .select(&LINK_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
        .collect();

    Ok(ParsedPage { title, links })
}
