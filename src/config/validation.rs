use crate::config::types::{
    Config, HttpConfig, LinkedInConfig, PacingEntry, SearchEngineConfig, UserAgentConfig,
};
use crate::ConfigError;
use url::Url;

/// Largest page the structured search API will return
pub const MAX_PAGE_SIZE: usize = 25;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_user_agent_config(&config.user_agent)?;
    validate_linkedin_config(&config.linkedin)?;
    validate_search_engine_config(&config.search_engine)?;
    validate_pacing_entry("authenticated", &config.pacing.authenticated)?;
    validate_pacing_entry("fallback", &config.pacing.fallback)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.user_agent.chars().any(|c| c.is_control())
        || config.accept_language.chars().any(|c| c.is_control())
    {
        return Err(ConfigError::Validation(
            "user agent headers must not contain control characters".to_string(),
        ));
    }

    Ok(())
}

/// Validates professional-network configuration
fn validate_linkedin_config(config: &LinkedInConfig) -> Result<(), ConfigError> {
    validate_http_url("site_url", &config.site_url)?;
    validate_http_url("api_base_url", &config.api_base_url)?;

    if config.page_size < 1 || config.page_size > MAX_PAGE_SIZE {
        return Err(ConfigError::Validation(format!(
            "page_size must be between 1 and {}, got {}",
            MAX_PAGE_SIZE, config.page_size
        )));
    }

    if config.decoration_id.trim().is_empty() || config.origin.trim().is_empty() {
        return Err(ConfigError::Validation(
            "decoration_id and origin cannot be empty".to_string(),
        ));
    }

    if let Some(cookie) = config.credential() {
        validate_cookie_value(cookie)?;
    }

    Ok(())
}

/// Validates search engine configuration
fn validate_search_engine_config(config: &SearchEngineConfig) -> Result<(), ConfigError> {
    validate_http_url("search_url", &config.search_url)?;

    if config.results_per_query < 1 {
        return Err(ConfigError::Validation(format!(
            "results_per_query must be >= 1, got {}",
            config.results_per_query
        )));
    }

    Ok(())
}

/// Validates one pacing window
fn validate_pacing_entry(name: &str, entry: &PacingEntry) -> Result<(), ConfigError> {
    if entry.min_delay_ms > entry.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "pacing.{}: min_delay_ms ({}) exceeds max_delay_ms ({})",
            name, entry.min_delay_ms, entry.max_delay_ms
        )));
    }
    Ok(())
}

/// Validates HTTP timeouts
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.request_timeout_ms == 0 || config.connect_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request and connect timeouts must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Validates that a configured endpoint is an absolute HTTP(S) URL with a host
fn validate_http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use HTTP or HTTPS",
            field, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(())
}

/// The cookie is pasted into a `Cookie` header verbatim
fn validate_cookie_value(cookie: &str) -> Result<(), ConfigError> {
    if cookie
        .chars()
        .any(|c| c == ';' || c == ',' || c.is_whitespace() || c.is_control())
    {
        return Err(ConfigError::Validation(
            "session_cookie contains characters not allowed in a cookie value".to_string(),
        ));
    }
    Ok(())
}
