use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Candidate-Sourcer
///
/// Every section is optional in the TOML file; missing sections take the defaults
/// below, which target the public production endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub linkedin: LinkedInConfig,
    #[serde(rename = "search-engine")]
    pub search_engine: SearchEngineConfig,
    pub pacing: PacingConfig,
    pub http: HttpConfig,
}

/// Browser identification sent with every request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Full User-Agent header value
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept-Language header value
    #[serde(rename = "accept-language")]
    pub accept_language: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
        }
    }
}

/// Professional-network endpoints and session credential
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LinkedInConfig {
    /// Base used for canonical profile URLs (`<site-url>/in/<id>`)
    #[serde(rename = "site-url")]
    pub site_url: String,

    /// Base for the structured API and the token-harvest page
    #[serde(rename = "api-base-url")]
    pub api_base_url: String,

    /// Value of the `li_at` session cookie; authenticated search is off without it
    #[serde(rename = "session-cookie")]
    pub session_cookie: Option<String>,

    /// Search response decoration identifier
    #[serde(rename = "decoration-id")]
    pub decoration_id: String,

    /// `origin` tag sent with search requests
    pub origin: String,

    /// Results requested per search call (capped at 25 by the API)
    #[serde(rename = "page-size")]
    pub page_size: usize,
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            site_url: "https://www.linkedin.com".to_string(),
            api_base_url: "https://www.linkedin.com".to_string(),
            session_cookie: None,
            decoration_id: "com.linkedin.voyager.dash.deco.search.SearchClusterCollection-175"
                .to_string(),
            origin: "GLOBAL_SEARCH_HEADER".to_string(),
            page_size: 25,
        }
    }
}

impl LinkedInConfig {
    /// The session cookie, treating an empty value as absent
    pub fn credential(&self) -> Option<&str> {
        self.session_cookie
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Public search engine used by the fallback strategy
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchEngineConfig {
    /// Web search endpoint receiving `q` and `num` parameters
    #[serde(rename = "search-url")]
    pub search_url: String,

    /// Results requested per query
    #[serde(rename = "results-per-query")]
    pub results_per_query: u32,
}

impl Default for SearchEngineConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.com/search".to_string(),
            results_per_query: 10,
        }
    }
}

/// Per-strategy pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub authenticated: PacingEntry,
    pub fallback: PacingEntry,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            authenticated: PacingEntry {
                min_delay_ms: 2_000,
                max_delay_ms: 5_000,
                rate_limit_cooldown_ms: 60_000,
            },
            fallback: PacingEntry {
                min_delay_ms: 3_000,
                max_delay_ms: 7_000,
                rate_limit_cooldown_ms: 30_000,
            },
        }
    }
}

/// Delay window between queries and the cooldown after a 429 (milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PacingEntry {
    #[serde(rename = "min-delay-ms")]
    pub min_delay_ms: u64,

    #[serde(rename = "max-delay-ms")]
    pub max_delay_ms: u64,

    #[serde(rename = "rate-limit-cooldown-ms")]
    pub rate_limit_cooldown_ms: u64,
}

impl PacingEntry {
    /// No waiting at all; used by tests and dry runs
    pub fn immediate() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
            rate_limit_cooldown_ms: 0,
        }
    }
}

/// HTTP client timeouts (milliseconds)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout; an expired request fails only its own query
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    #[serde(rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
