//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the shared HTTP client
//! - GET requests returning the raw body
//! - Combining fetch and parse into one page-level step

use crate::config::CrawlerConfig;
use crate::crawler::parser::{parse, ParseMode, ParsedPage};
use crate::CrawlError;
use reqwest::Client;
use std::time::Duration;

/// Upper bound on connection setup, applied below the overall fetch timeout
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds the HTTP client shared by every crawl job of a coordinator
///
/// The client skips TLS certificate verification: crawl targets may present
/// self-signed or mismatched certificates. Every request is bounded by
/// `fetch-timeout-secs`.
///
/// # Example
///
/// ```no_run
/// use link_ripple::config::CrawlerConfig;
/// use link_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    let timeout = config.fetch_timeout();

    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(timeout)
        .connect_timeout(timeout.min(CONNECT_TIMEOUT))
        .danger_accept_invalid_certs(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and returns the response body
///
/// # Errors
///
/// * `CrawlError::Fetch` - Transport failure, timeout, or body read failure
/// * `CrawlError::HttpStatus` - The server answered with a non-success status
pub async fn fetch_url(client: &Client, url: &str) -> Result<Vec<u8>, CrawlError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| CrawlError::Fetch {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(CrawlError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().await.map_err(|source| CrawlError::Fetch {
        url: url.to_string(),
        source,
    })?;

    Ok(body.to_vec())
}

/// Fetches a page and extracts its title and raw hrefs
pub async fn fetch_page(
    client: &Client,
    url: &str,
    mode: ParseMode,
) -> Result<ParsedPage, CrawlError> {
    let body = fetch_url(client, url).await?;

    parse(&body, mode).map_err(|source| CrawlError::Parse {
        url: url.to_string(),
        source,
    })
}
