//! State module for tracking crawl progress
//!
//! This module provides the state a crawl job shares between its workers and
//! the state machine each worker runs through.
//!
//! # Components
//!
//! - `JobState`: visited set, page data, external links and the pending-work counter
//! - `WorkerState`: Waiting / Processing / Stopped
//! - `WorkItem`, `PageData`: the queue payload and the per-page record

mod job_state;
mod worker_state;

// Re-export main types
pub use job_state::{JobState, PageData, WorkItem};
pub use worker_state::WorkerState;
