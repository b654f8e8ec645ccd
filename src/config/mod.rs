//! Configuration module for Link-Ripple
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use link_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config/link-ripple.toml")).unwrap();
//! println!("Crawler will use {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig};

// Re-export parser functions
pub use parser::{load_config, load_config_or_default, parse_config, DEFAULT_CONFIG_PATH};
pub use validation::{validate, validate_crawler_config};
