use crate::{UrlError, UrlResult};
use url::Url;

/// The scheme and host a crawl job is anchored to
///
/// The host keeps a non-default port (`127.0.0.1:8080`) and has a leading
/// `www.` removed, so that `www.example.com` and `example.com` compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    scheme: String,
    host: String,
}

impl Origin {
    /// Parses a seed URL into an origin
    ///
    /// # Errors
    ///
    /// * `UrlError::Parse` - The seed is not a valid absolute URL
    /// * `UrlError::UnsupportedScheme` - The seed is not HTTP(S)
    /// * `UrlError::MissingHost` - The seed has no host
    ///
    /// # Examples
    ///
    /// ```
    /// use link_ripple::url::Origin;
    ///
    /// let origin = Origin::parse("https://www.example.com/start").unwrap();
    /// assert_eq!(origin.scheme(), "https");
    /// assert_eq!(origin.host(), "example.com");
    /// ```
    pub fn parse(raw: &str) -> UrlResult<Self> {
        let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;
        Self::from_url(&url)
    }

    /// Builds an origin from an already parsed URL
    pub fn from_url(url: &Url) -> UrlResult<Self> {
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
        }

        let authority =
            host_with_port(url).ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            host: strip_www(&authority).to_string(),
        })
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Returns the host of a parsed URL with its port, if the port is not the default
pub fn host_with_port(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Removes one leading `www.` from a host
///
/// This is an exact prefix match: `wwwx.com` is returned unchanged.
pub fn strip_www(host: &str) -> &str {
    match host.get(..4) {
        Some(prefix) if prefix.eq_ignore_ascii_case("www.") => &host[4..],
        _ => host,
    }
}

/// Extracts the host portion of an absolute `http(s)://` URL string
///
/// The host runs up to the first `/`, `?` or `#` and has `www.` stripped.
/// Returns `None` for anything that does not start with an HTTP(S) scheme.
pub fn extract_host(absolute: &str) -> Option<&str> {
    let rest = absolute
        .strip_prefix("http://")
        .or_else(|| absolute.strip_prefix("https://"))?;

    let end = rest
        .find(|c: char| matches!(c, '/' | '?' | '#'))
        .unwrap_or(rest.len());
    let host = &rest[..end];

    if host.is_empty() {
        None
    } else {
        Some(strip_www(host))
    }
}

/// Returns true if an absolute URL belongs to the origin's host
///
/// # Examples
///
/// ```
/// use link_ripple::url::{is_inner, Origin};
///
/// let origin = Origin::parse("https://example.com/").unwrap();
/// assert!(is_inner("https://www.example.com/a", &origin));
/// assert!(!is_inner("https://other.com/a", &origin));
/// ```
pub fn is_inner(absolute: &str, origin: &Origin) -> bool {
    extract_host(absolute).is_some_and(|host| host.eq_ignore_ascii_case(origin.host()))
}
