use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedSender;

/// A URL queued for fetching together with its link depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Absolute inner URL
    pub url: String,

    /// Number of link hops from the seed (the seed is 0)
    pub depth: u32,
}

/// What was recorded for a successfully fetched page
#[derive(Debug, Clone)]
pub struct PageData {
    /// Page title, empty if the page has none
    pub title: String,

    /// When the request was issued
    pub fetch_start: Instant,

    /// Time spent fetching and parsing
    pub fetch_duration: Duration,
}

impl PageData {
    /// Returns the instant the fetch window closed
    pub fn fetch_end(&self) -> Instant {
        self.fetch_start + self.fetch_duration
    }
}

/// Traversal state of one crawl job
///
/// All fields are mutated under the job's single lock. The two critical
/// sections that matter for termination are `discover` (dedup insert, pending
/// increment and enqueue) and `complete` (pending decrement and queue close).
/// Because both run under the same lock, a worker can never observe
/// `pending == 0` while another worker has recorded a new link that is not
/// yet counted.
#[derive(Debug)]
pub struct JobState {
    /// Inner URL -> depth at which it was first discovered
    visited: HashMap<String, u32>,

    /// Inner URL -> page record, written once after a successful fetch
    page_data: HashMap<String, PageData>,

    /// External URLs seen on any page
    external: HashSet<String>,

    /// Work items created but not yet completed (queued + in flight)
    pending: usize,

    /// Work items whose fetch or parse failed
    failed: usize,

    /// Producer end of the work queue; `None` once the queue is closed
    queue: Option<UnboundedSender<WorkItem>>,
}

impl JobState {
    /// Creates the state of a fresh job and enqueues the seed at depth 0
    ///
    /// The seed is marked visited, so links back to it are not fetched again.
    /// `pending` starts at 1 for the seed.
    pub fn seeded(seed: String, queue: UnboundedSender<WorkItem>) -> Self {
        let mut state = Self {
            visited: HashMap::new(),
            page_data: HashMap::new(),
            external: HashSet::new(),
            pending: 0,
            failed: 0,
            queue: Some(queue),
        };
        state.discover(seed, 0);
        state
    }

    /// Records a newly found inner URL and enqueues it
    ///
    /// Check-and-insert into the visited map, the pending increment and the
    /// enqueue happen together. Returns true if a work item was enqueued, false
    /// if the URL was already visited or the queue is closed.
    pub fn discover(&mut self, url: String, depth: u32) -> bool {
        let Some(queue) = self.queue.as_ref() else {
            return false;
        };

        match self.visited.entry(url) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                let item = WorkItem {
                    url: slot.key().clone(),
                    depth,
                };
                slot.insert(depth);

                if queue.send(item).is_err() {
                    tracing::warn!("Work queue receiver dropped, link not enqueued");
                    return false;
                }

                self.pending += 1;
                true
            }
        }
    }

    /// Marks one work item as finished, successfully or not
    ///
    /// Returns true exactly once: for the call that brings `pending` to zero.
    /// That call also drops the queue's sender, which closes the queue and lets
    /// idle workers drain and stop.
    pub fn complete(&mut self) -> bool {
        debug_assert!(self.pending > 0, "complete() without pending work");
        self.pending = self.pending.saturating_sub(1);

        if self.pending == 0 {
            self.queue.take().is_some()
        } else {
            false
        }
    }

    /// Records an external URL; returns false if it was already known
    pub fn record_external(&mut self, url: String) -> bool {
        self.external.insert(url)
    }

    /// Records a fetched page; an existing record is never overwritten
    pub fn record_page(&mut self, url: String, data: PageData) -> bool {
        match self.page_data.entry(url) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(data);
                true
            }
        }
    }

    /// Counts a work item whose fetch or parse failed
    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Returns true once the pending count has reached zero
    pub fn is_closed(&self) -> bool {
        self.queue.is_none()
    }

    /// Returns the depth a URL was first discovered at, if it was
    pub fn visited_depth(&self, url: &str) -> Option<u32> {
        self.visited.get(url).copied()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn page_data(&self) -> &HashMap<String, PageData> {
        &self.page_data
    }

    pub fn external(&self) -> &HashSet<String> {
        &self.external
    }
}
