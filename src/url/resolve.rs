use crate::url::domain::{host_with_port, Origin};
use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves an href to an absolute URL
///
/// # Resolution Rules
///
/// | Href shape | Result |
/// |------------|--------|
/// | `http://…`, `https://…` | unchanged |
/// | `//host/path` | origin scheme + `:` + href |
/// | `/path` | `scheme://origin-host/path` |
/// | `path` | appended to the current page's directory |
///
/// For document-relative hrefs the last segment of the current page's path is
/// dropped when it contains a `.` (it looks like a file, not a directory), and
/// empty segments are removed. The current page's query and fragment are not
/// carried over.
///
/// # Arguments
///
/// * `href` - The raw href as found in the document
/// * `current_page` - The absolute URL of the page the href was found on
/// * `origin` - The crawl job's origin
///
/// # Errors
///
/// Returns `UrlError` when a document-relative href is found on a page whose
/// own URL cannot be parsed. The caller drops the href.
///
/// # Examples
///
/// ```
/// use link_ripple::url::{resolve, Origin};
///
/// let origin = Origin::parse("https://example.com/").unwrap();
/// let page = "https://example.com/dir/a.html";
///
/// assert_eq!(resolve("/page", page, &origin).unwrap(), "https://example.com/page");
/// assert_eq!(resolve("b", page, &origin).unwrap(), "https://example.com/dir/b");
/// ```
pub fn resolve(href: &str, current_page: &str, origin: &Origin) -> UrlResult<String> {
    let href = href.trim();

    if href.starts_with("http://") || href.starts_with("https://") {
        return Ok(href.to_string());
    }

    if href.starts_with("//") {
        return Ok(format!("{}:{}", origin.scheme(), href));
    }

    if let Some(path) = href.strip_prefix('/') {
        return Ok(format!("{}://{}/{}", origin.scheme(), origin.host(), path));
    }

    let current =
        Url::parse(current_page).map_err(|e| UrlError::Parse(format!("{}: {}", current_page, e)))?;
    let host =
        host_with_port(&current).ok_or_else(|| UrlError::MissingHost(current_page.to_string()))?;

    let mut segments: Vec<&str> = current.path().split('/').collect();
    if segments.last().is_some_and(|last| last.contains('.')) {
        segments.pop();
    }

    let mut parts = Vec::with_capacity(segments.len() + 2);
    parts.push(host.as_str());
    parts.extend(segments.into_iter().filter(|s| !s.is_empty()));
    parts.push(href);

    Ok(format!("{}://{}", current.scheme(), parts.join("/")))
}
