/// Worker state definitions for the crawl worker pool
///
/// Every worker of a crawl job runs the same loop and moves through these states.
use std::fmt;

/// Represents the current state of a crawl worker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkerState {
    /// Blocked on the work queue or the cancellation signal
    Waiting,

    /// Fetching and processing one work item
    Processing,

    /// Terminal: the queue was closed or the crawl was cancelled
    Stopped,
}

impl WorkerState {
    /// Returns true if the worker has exited its loop
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns true if moving from this state to `next` is a legal step
    ///
    /// ```text
    /// Waiting ──item──▶ Processing ──done──▶ Waiting
    ///    │                  │
    ///    └──closed/cancel───┴──▶ Stopped
    /// ```
    pub fn can_transition_to(&self, next: WorkerState) -> bool {
        matches!(
            (self, next),
            (Self::Waiting, Self::Processing)
                | (Self::Processing, Self::Waiting)
                | (Self::Waiting, Self::Stopped)
                | (Self::Processing, Self::Stopped)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Processing => "processing",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
