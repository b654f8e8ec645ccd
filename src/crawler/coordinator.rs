//! Crawler coordinator - owns the resources shared by crawl jobs
//!
//! The coordinator holds:
//! - The immutable crawler settings
//! - One HTTP client reused by every job
//! - The root cancellation token, so `close()` stops every job at once
//!
//! It is a plain value: clone it and hand it to whatever starts jobs.

use crate::config::{validate_crawler_config, Config, CrawlerConfig};
use crate::crawler::fetcher::build_http_client;
use crate::crawler::job::CrawlJob;
use crate::crawler::result::CrawlResult;
use crate::CrawlError;
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Factory for crawl jobs and owner of global cancellation
#[derive(Clone)]
pub struct Coordinator {
    settings: Arc<CrawlerConfig>,
    client: Client,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `settings` - The crawler configuration shared by all jobs
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - The settings are invalid or the HTTP client could not be built
    pub fn new(settings: CrawlerConfig) -> Result<Self, CrawlError> {
        validate_crawler_config(&settings)?;
        let client = build_http_client(&settings)?;

        tracing::debug!(
            "Coordinator ready: {} workers per job, depth {}, {:?} parser",
            settings.workers,
            settings.depth,
            settings.parse_mode()
        );

        Ok(Self {
            settings: Arc::new(settings),
            client,
            cancel: CancellationToken::new(),
        })
    }

    pub fn settings(&self) -> &CrawlerConfig {
        &self.settings
    }

    /// Starts crawling `seed` in the background
    ///
    /// Must be called from within a tokio runtime. Jobs started after
    /// `close()` stop before fetching anything.
    pub fn start(&self, seed: &str) -> Result<CrawlJob, CrawlError> {
        CrawlJob::start(
            seed,
            Arc::clone(&self.settings),
            self.client.clone(),
            self.cancel.clone(),
        )
    }

    /// Cancels every job started by this coordinator
    ///
    /// Waiting workers stop immediately. Workers in the middle of a page
    /// finish it without enqueuing new links, then stop.
    pub fn close(&self) {
        if !self.cancel.is_cancelled() {
            tracing::info!("Cancelling all crawl jobs");
        }
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Crawls every seed concurrently and returns the results of the jobs that started
///
/// Seeds that fail to start are logged and skipped. `on_result` sees each
/// result as soon as its job has finished, in seed order. The coordinator is
/// closed once every job has finished.
pub async fn run_crawl<F>(
    config: Config,
    seeds: &[String],
    mut on_result: F,
) -> Result<Vec<CrawlResult>, CrawlError>
where
    F: FnMut(&CrawlResult),
{
    let coordinator = Coordinator::new(config.crawler)?;

    let jobs: Vec<CrawlJob> = seeds
        .iter()
        .filter_map(|seed| match coordinator.start(seed) {
            Ok(job) => Some(job),
            Err(e) => {
                tracing::error!("Could not start crawl of '{}': {}", seed, e);
                None
            }
        })
        .collect();

    let mut results = Vec::with_capacity(jobs.len());
    for job in jobs {
        let result = job.result().await;
        on_result(&result);
        results.push(result);
    }

    coordinator.close();
    Ok(results)
}
