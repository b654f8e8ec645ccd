//! JSON rendering of crawl results

use crate::crawler::CrawlResult;
use std::io::Write;

/// Renders one result as pretty-printed JSON
pub fn render_json(result: &CrawlResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Writes every result to `out`, one JSON document per result
pub fn write_json<W: Write>(out: &mut W, results: &[CrawlResult]) -> std::io::Result<()> {
    for result in results {
        let rendered = render_json(result)?;
        writeln!(out, "{}", rendered)?;
    }
    Ok(())
}
