//! URL handling module for Link-Ripple
//!
//! This module classifies hrefs by scheme, resolves them to absolute URLs
//! against the current page and the crawl origin, and decides whether a URL is
//! inner (same host as the origin) or external.

mod domain;
mod resolve;
mod scheme;

// Re-export main functions
pub use domain::{extract_host, host_with_port, is_inner, strip_www, Origin};
pub use resolve::resolve;
pub use scheme::{is_crawlable_scheme, scheme_of};

/// Classification of an href found on a crawled page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    /// Absolute URL on the origin host - candidate for crawling
    Inner(String),
    /// Absolute URL on another host - recorded, never fetched
    External(String),
    /// Non-HTTP scheme, empty or fragment-only href - dropped
    Rejected,
    /// Relative href that could not be resolved - dropped
    Unresolvable,
}

/// Classifies a raw href found on `current_page`
///
/// This combines the scheme check, resolution and the inner/external
/// decision in the order the crawler applies them.
///
/// # Examples
///
/// ```
/// use link_ripple::url::{classify, LinkClass, Origin};
///
/// let origin = Origin::parse("https://example.com/").unwrap();
/// let page = "https://example.com/";
///
/// assert_eq!(
///     classify("/about", page, &origin),
///     LinkClass::Inner("https://example.com/about".to_string())
/// );
/// assert_eq!(
///     classify("https://other.com/", page, &origin),
///     LinkClass::External("https://other.com/".to_string())
/// );
/// assert_eq!(classify("mailto:x@y.com", page, &origin), LinkClass::Rejected);
/// ```
pub fn classify(href: &str, current_page: &str, origin: &Origin) -> LinkClass {
    let href = href.trim();

    // Same-page anchors point back at a page we already have
    if href.is_empty() || href.starts_with('#') {
        return LinkClass::Rejected;
    }

    if !is_crawlable_scheme(scheme_of(href)) {
        return LinkClass::Rejected;
    }

    match resolve(href, current_page, origin) {
        Ok(absolute) if is_inner(&absolute, origin) => LinkClass::Inner(absolute),
        Ok(absolute) => LinkClass::External(absolute),
        Err(e) => {
            tracing::debug!("Dropping href '{}' found on {}: {}", href, current_page, e);
            LinkClass::Unresolvable
        }
    }
}
