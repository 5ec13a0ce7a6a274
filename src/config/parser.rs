use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Environment variable holding the `li_at` session cookie
pub const SESSION_COOKIE_ENV: &str = "LINKEDIN_LI_AT";

/// Loads and parses a configuration file from the given path
///
/// The session cookie from `LINKEDIN_LI_AT` takes precedence over the file.
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
/// use candidate_sourcer::config::load_config;
///
/// let config = load_config(Path::new("sourcer.toml")).unwrap();
/// println!("Search engine: {}", config.search_engine.search_url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut config = parse_config(&content)?;
    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Parses TOML content without touching the environment or validating
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Builds the default configuration with environment overrides applied
pub fn default_config() -> Result<Config, ConfigError> {
    let mut config = Config::default();
    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Applies environment overrides to a configuration
pub fn apply_env_overrides(config: &mut Config) {
    if let Ok(cookie) = std::env::var(SESSION_COOKIE_ENV) {
        if !cookie.trim().is_empty() {
            tracing::debug!("Using session cookie from {}", SESSION_COOKIE_ENV);
            config.linkedin.session_cookie = Some(cookie);
        }
    }
}
