//! Result aggregation for finished crawl jobs

use crate::crawler::job::CrawlJob;
use crate::state::PageData;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Summary of one crawl job
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    /// Origin host the job was anchored to
    pub domain: String,

    /// Inner URL -> page title, for every successfully fetched page
    pub sitemap: BTreeMap<String, String>,

    pub inner_links_count: usize,

    /// Distinct external URLs, sorted
    pub external_links: Vec<String>,

    pub external_links_count: usize,

    /// Pages fetched per second of wall-clock crawl time
    pub requests_per_sec: f64,

    /// Work items whose fetch or parse failed
    pub failed_links_count: usize,

    pub started_at: DateTime<Utc>,
}

/// Computes throughput over the span of all fetch windows
///
/// The span runs from the earliest fetch start to the latest fetch end.
/// Returns 0.0 when there are no pages or the span has zero length.
pub fn requests_per_sec<'a, I>(pages: I) -> f64
where
    I: IntoIterator<Item = &'a PageData>,
{
    let mut count = 0usize;
    let mut window = None;

    for page in pages {
        count += 1;
        let (start, end) = (page.fetch_start, page.fetch_end());
        window = Some(match window {
            None => (start, end),
            Some((earliest, latest)) => (start.min(earliest), end.max(latest)),
        });
    }

    let Some((earliest, latest)) = window else {
        return 0.0;
    };

    let secs = latest.duration_since(earliest).as_secs_f64();
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

impl CrawlJob {
    /// Waits for every worker to stop and summarizes the job
    ///
    /// A worker that panicked is logged and otherwise ignored; whatever it
    /// recorded before panicking is still part of the result.
    pub async fn result(self) -> CrawlResult {
        for (id, handle) in self.workers.into_iter().enumerate() {
            if let Err(e) = handle.await {
                tracing::error!("Worker {} of {} ended abnormally: {}", id, self.shared.seed, e);
            }
        }

        let shared = self.shared;
        let state = shared.lock_state();

        let sitemap: BTreeMap<String, String> = state
            .page_data()
            .iter()
            .map(|(url, data)| (url.clone(), data.title.clone()))
            .collect();

        let mut external_links: Vec<String> = state.external().iter().cloned().collect();
        external_links.sort();

        CrawlResult {
            domain: shared.origin.host().to_string(),
            inner_links_count: sitemap.len(),
            sitemap,
            external_links_count: external_links.len(),
            external_links,
            requests_per_sec: requests_per_sec(state.page_data().values()),
            failed_links_count: state.failed(),
            started_at: shared.started_at,
        }
    }
}

/// Waits for a job to finish and returns its result
pub async fn get_result(job: CrawlJob) -> CrawlResult {
    job.result().await
}
