//! Output module for reporting crawl results
//!
//! This module handles:
//! - Logging one summary line per crawl job
//! - Averaging throughput across jobs
//! - Rendering results as JSON

mod json;
mod summary;

pub use json::{render_json, write_json};
pub use summary::{average_requests_per_sec, log_result, log_summary, result_line};
