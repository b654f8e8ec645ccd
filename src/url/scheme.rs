/// Returns the scheme token of an href, or an empty string if it has none
///
/// The scheme is the text before the first `:` when that text is non-empty
/// and consists only of ASCII letters, digits, `-`, `_` and `.`.
///
/// # Examples
///
/// ```
/// use link_ripple::url::scheme_of;
///
/// assert_eq!(scheme_of("https://example.com/"), "https");
/// assert_eq!(scheme_of("mailto:someone@example.com"), "mailto");
/// assert_eq!(scheme_of("/about"), "");
/// assert_eq!(scheme_of("page.html"), "");
/// ```
pub fn scheme_of(href: &str) -> &str {
    let href = href.trim_start();
    match href.split_once(':') {
        Some((scheme, _))
            if !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) =>
        {
            scheme
        }
        _ => "",
    }
}

/// Returns true for schemes the crawler follows: `http`, `https`, or none at all
pub fn is_crawlable_scheme(scheme: &str) -> bool {
    matches!(scheme, "http" | "https" | "")
}
