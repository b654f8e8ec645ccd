//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching through one shared client
//! - HTML parsing and link extraction
//! - The per-origin worker pool and its termination detection
//! - Overall crawl coordination and result aggregation

mod coordinator;
mod fetcher;
mod job;
mod parser;
mod result;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, fetch_page, fetch_url};
pub use job::CrawlJob;
pub use parser::{parse, ParseMode, ParsedPage};
pub use result::{get_result, requests_per_sec, CrawlResult};

/// Splits the contents of a seed file into seed URLs
///
/// Every non-empty line, trimmed, is one seed.
///
/// # Example
///
/// ```
/// use link_ripple::crawler::seed_lines;
///
/// let seeds = seed_lines("https://a.com\n\n  https://b.com  \n");
/// assert_eq!(seeds, vec!["https://a.com", "https://b.com"]);
/// ```
pub fn seed_lines(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
