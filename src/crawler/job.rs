//! Crawl job - worker pool and termination detection for one origin
//!
//! A job owns a self-feeding work queue. Workers pull `(url, depth)` items,
//! fetch and parse the page, and push newly discovered inner links back onto
//! the queue. The job is done when its pending count drops to zero, at which
//! point the queue is closed and every idle worker stops.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::fetch_page;
use crate::state::{JobState, PageData, WorkItem, WorkerState};
use crate::url::{classify, LinkClass, Origin};
use crate::CrawlError;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

/// State shared between a job handle and its workers
pub(crate) struct JobShared {
    pub(crate) origin: Origin,
    pub(crate) seed: String,
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) settings: Arc<CrawlerConfig>,
    client: Client,
    cancel: CancellationToken,
    state: Mutex<JobState>,
    receiver: tokio::sync::Mutex<UnboundedReceiver<WorkItem>>,
    active_workers: AtomicUsize,
}

impl JobShared {
    /// Locks the traversal state
    ///
    /// The guard must be dropped before the next `.await`. A worker that
    /// panicked while holding the lock leaves the state consistent (every
    /// mutation is a single insert or counter step), so poisoning is ignored.
    pub(crate) fn lock_state(&self) -> MutexGuard<'_, JobState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Waits for the next queued item; `None` once the queue is closed and drained
    async fn next_item(&self) -> Option<WorkItem> {
        self.receiver.lock().await.recv().await
    }
}

/// Handle to a running crawl job
///
/// Created by `Coordinator::start`. Consume it with `CrawlJob::result` (or
/// `get_result`) to wait for the workers and collect the outcome.
pub struct CrawlJob {
    pub(crate) shared: Arc<JobShared>,
    pub(crate) workers: Vec<JoinHandle<()>>,
}

impl CrawlJob {
    /// Parses the seed, seeds the queue and spawns the worker pool
    ///
    /// # Errors
    ///
    /// * `CrawlError::UrlParse` - The seed is not a valid absolute URL
    /// * `CrawlError::Url` - The seed is not HTTP(S) or has no host
    pub(crate) fn start(
        seed: &str,
        settings: Arc<CrawlerConfig>,
        client: Client,
        cancel: CancellationToken,
    ) -> Result<Self, CrawlError> {
        let seed = seed.trim();
        let seed_url = Url::parse(seed).map_err(|source| CrawlError::UrlParse {
            url: seed.to_string(),
            source,
        })?;
        let origin = Origin::from_url(&seed_url)?;
        let seed = seed_url.to_string();

        let (tx, rx) = mpsc::unbounded_channel();
        let state = JobState::seeded(seed.clone(), tx);

        let shared = Arc::new(JobShared {
            origin,
            seed,
            started_at: Utc::now(),
            settings,
            client,
            cancel,
            state: Mutex::new(state),
            receiver: tokio::sync::Mutex::new(rx),
            active_workers: AtomicUsize::new(0),
        });

        let worker_count = shared.settings.workers as usize;
        let workers = (0..worker_count)
            .map(|id| tokio::spawn(run_worker(id, Arc::clone(&shared))))
            .collect();

        tracing::info!(
            "Started crawl of {} with {} workers (max depth {})",
            shared.seed,
            worker_count,
            shared.settings.depth
        );

        Ok(Self { shared, workers })
    }

    pub fn origin(&self) -> &Origin {
        &self.shared.origin
    }

    /// The seed URL as it was enqueued
    pub fn seed(&self) -> &str {
        &self.shared.seed
    }

    /// Work items queued or in flight
    pub fn pending(&self) -> usize {
        self.shared.lock_state().pending()
    }

    /// Workers currently processing an item
    pub fn active_workers(&self) -> usize {
        self.shared.active_workers.load(Ordering::SeqCst)
    }

    /// Returns true once every worker task has returned
    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(JoinHandle::is_finished)
    }
}

fn transition(id: usize, current: &mut WorkerState, next: WorkerState) {
    debug_assert!(
        current.can_transition_to(next),
        "illegal worker transition {} -> {}",
        current,
        next
    );
    tracing::trace!("Worker {}: {} -> {}", id, current, next);
    *current = next;
}

/// Accounts for one work item taken off the queue
///
/// `finish` applies the outcome and calls `JobState::complete` under one lock.
/// If the guard is dropped without `finish` (the processing future panicked or
/// was dropped), the item is counted as failed and still completed, so the
/// pending count can reach zero and the other workers stop.
struct InFlight<'a> {
    shared: &'a JobShared,
    url: &'a str,
    finished: bool,
}

impl<'a> InFlight<'a> {
    fn begin(shared: &'a JobShared, url: &'a str) -> Self {
        shared.active_workers.fetch_add(1, Ordering::SeqCst);
        Self {
            shared,
            url,
            finished: false,
        }
    }

    /// Applies `outcome` to the job state and completes the item
    ///
    /// Returns true if this completion closed the queue.
    fn finish(mut self, outcome: impl FnOnce(&mut JobState)) -> bool {
        let mut state = self.shared.lock_state();
        outcome(&mut state);
        let closed = state.complete();
        self.finished = true;
        closed
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.shared.active_workers.fetch_sub(1, Ordering::SeqCst);

        if self.finished {
            return;
        }

        tracing::error!("Processing of {} was aborted", self.url);
        let mut state = self.shared.lock_state();
        state.record_failure();
        if state.complete() {
            tracing::debug!("No pending work left for {}, closing queue", self.shared.seed);
        }
    }
}

async fn run_worker(id: usize, shared: Arc<JobShared>) {
    let mut state = WorkerState::Waiting;

    while !state.is_terminal() {
        let next = tokio::select! {
            biased;
            _ = shared.cancel.cancelled() => {
                tracing::debug!("Worker {} observed cancellation", id);
                None
            }
            item = shared.next_item() => item,
        };

        match next {
            Some(item) => {
                transition(id, &mut state, WorkerState::Processing);
                process(id, &shared, item).await;
                transition(id, &mut state, WorkerState::Waiting);
            }
            None => transition(id, &mut state, WorkerState::Stopped),
        }
    }

    tracing::debug!("Worker {} for {} stopped", id, shared.seed);
}

async fn process(id: usize, shared: &JobShared, item: WorkItem) {
    tracing::debug!("Worker {} fetching {} (depth {})", id, item.url, item.depth);

    let in_flight = InFlight::begin(shared, &item.url);

    let fetch_start = Instant::now();
    let outcome = fetch_page(&shared.client, &item.url, shared.settings.parse_mode()).await;
    let fetch_duration = fetch_start.elapsed();

    let closed = match outcome {
        Ok(page) => {
            let mut inner = Vec::new();
            let mut external = Vec::new();
            for href in &page.links {
                match classify(href, &item.url, &shared.origin) {
                    LinkClass::Inner(url) => inner.push(url),
                    LinkClass::External(url) => external.push(url),
                    LinkClass::Rejected | LinkClass::Unresolvable => {}
                }
            }

            let child_depth = item.depth + 1;
            let follow = child_depth < shared.settings.depth;
            let mut enqueued = 0;

            let closed = in_flight.finish(|state| {
                if follow && !shared.cancel.is_cancelled() {
                    for url in inner {
                        if state.discover(url, child_depth) {
                            enqueued += 1;
                        }
                    }
                }
                for url in external {
                    state.record_external(url);
                }
                state.record_page(
                    item.url.clone(),
                    PageData {
                        title: page.title,
                        fetch_start,
                        fetch_duration,
                    },
                );
            });

            tracing::trace!("{} enqueued {} new links", item.url, enqueued);
            closed
        }
        Err(e) => {
            tracing::warn!("Failed to crawl {}: {}", item.url, e);
            in_flight.finish(JobState::record_failure)
        }
    };

    if closed {
        tracing::debug!("No pending work left for {}, closing queue", shared.seed);
    }
}
