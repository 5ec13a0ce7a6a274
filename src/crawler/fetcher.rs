//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the search clients, including:
//! - Building HTTP clients with browser-like identification and timeouts
//! - Sending prepared requests
//! - Classifying responses into the outcomes the query loops act on

use crate::config::{HttpConfig, UserAgentConfig};
use crate::CrawlError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client, RequestBuilder, StatusCode};

/// Maximum redirect hops followed per request
const MAX_REDIRECTS: usize = 10;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// HTTP 200 with a readable body
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Response body
        body: String,
    },

    /// HTTP 429; the provider wants us to slow down
    RateLimited,

    /// HTTP 401/403; the session credential or token was refused
    Unauthorized {
        /// The HTTP status code
        status_code: u16,
    },

    /// Any other non-200 status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Transport failure (connection refused, timeout, unreadable body)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the per-request timeout expired
        timed_out: bool,
    },
}

impl FetchResult {
    /// Converts a failed outcome into an error describing it
    ///
    /// Returns `None` for `Success`.
    pub fn into_error(self, url: &str) -> Option<CrawlError> {
        let url = url.to_string();
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::RateLimited => Some(CrawlError::RateLimited { url }),
            FetchResult::Unauthorized { status_code } => Some(CrawlError::Unauthorized(format!(
                "{} returned {}",
                url, status_code
            ))),
            FetchResult::HttpError { status_code } => Some(CrawlError::Status {
                url,
                status: status_code,
            }),
            FetchResult::NetworkError {
                timed_out: true, ..
            } => Some(CrawlError::Timeout { url }),
            FetchResult::NetworkError { error, .. } => Some(CrawlError::Network {
                url,
                message: error,
            }),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - Browser identification headers
/// * `http` - Request and connect timeouts
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(CrawlError)` - Failed to build client or invalid header values
///
/// # Example
///
/// ```no_run
/// use candidate_sourcer::config::{HttpConfig, UserAgentConfig};
/// use candidate_sourcer::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), &HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    http: &HttpConfig,
) -> Result<Client, CrawlError> {
    let mut headers = HeaderMap::new();
    if !user_agent.accept_language.is_empty() {
        let value = HeaderValue::from_str(&user_agent.accept_language).map_err(|e| {
            CrawlError::Config(crate::ConfigError::Validation(format!(
                "accept_language is not a valid header value: {}",
                e
            )))
        })?;
        headers.insert(ACCEPT_LANGUAGE, value);
    }

    let client = Client::builder()
        .user_agent(user_agent.user_agent.as_str())
        .default_headers(headers)
        .timeout(http.request_timeout())
        .connect_timeout(http.connect_timeout())
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Sends a prepared request and classifies the response
///
/// # Classification
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 | Success |
/// | HTTP 429 | RateLimited |
/// | HTTP 401 / 403 | Unauthorized |
/// | Other status | HttpError |
/// | Timeout | NetworkError (timed out) |
/// | Connection error / unreadable body | NetworkError |
///
/// Nothing is retried here; the query loops decide what to do next.
pub async fn fetch(request: RequestBuilder) -> FetchResult {
    match request.send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if status == StatusCode::TOO_MANY_REQUESTS {
                return FetchResult::RateLimited;
            }

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                return FetchResult::Unauthorized {
                    status_code: status.as_u16(),
                };
            }

            if status != StatusCode::OK {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success { final_url, body },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                    timed_out: e.is_timeout(),
                },
            }
        }
        Err(e) => {
            // Classify error
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                    timed_out: true,
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: "Connection refused".to_string(),
                    timed_out: false,
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                    timed_out: false,
                }
            }
        }
    }
}
