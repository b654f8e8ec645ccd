use crate::crawler::ParseMode;
use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Link-Ripple
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
}

/// Crawler behavior configuration
///
/// Every key is optional in the TOML file; missing keys take the values from
/// `CrawlerConfig::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Exclusive upper bound on link depth; the seed is depth 0
    pub depth: u32,

    /// Number of concurrent workers per crawl job
    pub workers: u32,

    /// Use the regex scanner instead of the structural HTML parser
    #[serde(rename = "use-regex-for-parsing")]
    pub use_regex_for_parsing: bool,

    /// Per-request timeout (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            workers: 4,
            use_regex_for_parsing: false,
            fetch_timeout_secs: 30,
            user_agent: format!("link-ripple/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl CrawlerConfig {
    /// Returns the parser strategy selected by `use-regex-for-parsing`
    pub fn parse_mode(&self) -> ParseMode {
        if self.use_regex_for_parsing {
            ParseMode::Regex
        } else {
            ParseMode::Structural
        }
    }

    /// Returns the per-fetch deadline
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}
