//! Human-readable crawl summaries
//!
//! Lines are emitted through `tracing` so `-q` silences them together with the
//! rest of the informational output.

use crate::crawler::CrawlResult;

/// Formats the one-line summary of a job
///
/// # Example
///
/// ```
/// # use link_ripple::output::result_line;
/// # use link_ripple::CrawlResult;
/// # use std::collections::BTreeMap;
/// let result = CrawlResult {
///     domain: "example.com".to_string(),
///     sitemap: BTreeMap::new(),
///     inner_links_count: 3,
///     external_links: vec![],
///     external_links_count: 1,
///     requests_per_sec: 2.5,
///     failed_links_count: 0,
///     started_at: chrono::Utc::now(),
/// };
/// assert_eq!(
///     result_line(&result),
///     "Domain: example.com, Links count: 3, External links count: 1, req/sec: 2.50"
/// );
/// ```
pub fn result_line(result: &CrawlResult) -> String {
    format!(
        "Domain: {}, Links count: {}, External links count: {}, req/sec: {:.2}",
        result.domain,
        result.inner_links_count,
        result.external_links_count,
        result.requests_per_sec
    )
}

/// Logs the summary line of a job, plus its failure count if any page failed
pub fn log_result(result: &CrawlResult) {
    tracing::info!("{}", result_line(result));

    if result.failed_links_count > 0 {
        tracing::warn!(
            "{}: {} pages could not be fetched or parsed",
            result.domain,
            result.failed_links_count
        );
    }
}

/// Mean of the per-job throughput; 0.0 for no jobs
pub fn average_requests_per_sec(results: &[CrawlResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }

    let total: f64 = results.iter().map(|r| r.requests_per_sec).sum();
    total / results.len() as f64
}

/// Logs the average throughput over all jobs
pub fn log_summary(results: &[CrawlResult]) {
    tracing::info!("requests/sec: {:.2}", average_requests_per_sec(results));
}
