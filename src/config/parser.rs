use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Configuration file looked up when no path is given on the command line
pub const DEFAULT_CONFIG_PATH: &str = "./config/link-ripple.toml";

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use link_ripple::config::load_config;
///
/// let config = load_config(Path::new("config/link-ripple.toml")).unwrap();
/// println!("Max depth: {}", config.crawler.depth);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration the binary should run with
///
/// An explicit path must exist. Without one, `DEFAULT_CONFIG_PATH` is used if
/// present and built-in defaults otherwise.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = path {
        return load_config(path);
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        load_config(default_path)
    } else {
        tracing::debug!(
            "No configuration at {}, using built-in defaults",
            DEFAULT_CONFIG_PATH
        );
        let config = Config::default();
        validate(&config)?;
        Ok(config)
    }
}
