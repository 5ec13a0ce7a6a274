//! Authenticated structured-API search
//!
//! Uses a member session cookie (`li_at`) to call the network's internal people-search
//! and profile endpoints. A CSRF token is harvested from the `JSESSIONID` cookie on
//! first use, cached, and dropped whenever the API answers 401/403.

use super::fetcher::{build_http_client, fetch, FetchResult};
use super::pacing::Pacer;
use super::query::build_queries;
use super::ProfileSource;
use crate::config::Config;
use crate::model::{CandidateProfile, SearchCriteria};
use crate::normalize::{dedup_profiles, parse_full_profile, parse_search_response};
use crate::CrawlError;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::collections::HashSet;
use tokio::sync::RwLock;

const SEARCH_PATH: &str = "/voyager/api/search/dash/clusters";
const PROFILE_PATH: &str = "/voyager/api/identity/profiles";
const TOKEN_PAGE_PATH: &str = "/feed/";

const SESSION_COOKIE_NAME: &str = "li_at";
const CSRF_COOKIE_NAME: &str = "JSESSIONID";
const CSRF_HEADER: &str = "csrf-token";

const VOYAGER_ACCEPT: &str = "application/vnd.linkedin.normalized+json+2.1";
const RESTLI_VERSION: &str = "2.0.0";
const API_LANG: &str = "en_US";

/// People search through the authenticated structured API
pub struct AuthenticatedSearchClient {
    client: Client,
    session_cookie: String,
    csrf_token: RwLock<Option<String>>,
    api_base_url: String,
    site_url: String,
    decoration_id: String,
    origin: String,
    page_size: usize,
    pacer: Pacer,
}

impl AuthenticatedSearchClient {
    /// Creates a client for the given session cookie
    ///
    /// No network traffic happens here; the CSRF token is fetched lazily.
    pub fn new(config: &Config, session_cookie: impl Into<String>) -> Result<Self, CrawlError> {
        let client = build_http_client(&config.user_agent, &config.http)?;

        Ok(Self {
            client,
            session_cookie: session_cookie.into(),
            csrf_token: RwLock::new(None),
            api_base_url: config.linkedin.api_base_url.trim_end_matches('/').to_string(),
            site_url: config.linkedin.site_url.clone(),
            decoration_id: config.linkedin.decoration_id.clone(),
            origin: config.linkedin.origin.clone(),
            page_size: config.linkedin.page_size,
            pacer: Pacer::new(&config.pacing.authenticated),
        })
    }

    /// Builds a client when the configuration carries a session cookie
    pub fn from_config(config: &Config) -> Result<Option<Self>, CrawlError> {
        match config.linkedin.credential() {
            Some(cookie) => Self::new(config, cookie).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the cached CSRF token, harvesting one if none is cached
    ///
    /// A failed harvest is not fatal: requests then go out without the token.
    pub async fn csrf_token(&self) -> Option<String> {
        if let Some(token) = self.csrf_token.read().await.clone() {
            return Some(token);
        }

        let token = self.harvest_token().await?;
        *self.csrf_token.write().await = Some(token.clone());
        Some(token)
    }

    /// Forgets the cached token so the next request harvests a fresh one
    pub async fn invalidate_token(&self) {
        *self.csrf_token.write().await = None;
    }

    async fn harvest_token(&self) -> Option<String> {
        let url = format!("{}{}", self.api_base_url, TOKEN_PAGE_PATH);
        tracing::debug!("Harvesting CSRF token from {}", url);

        let response = match self
            .client
            .get(&url)
            .header(COOKIE, format!("{}={}", SESSION_COOKIE_NAME, self.session_cookie))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to fetch CSRF token: {}", e);
                return None;
            }
        };

        let token = response
            .cookies()
            .find(|cookie| cookie.name() == CSRF_COOKIE_NAME)
            .map(|cookie| cookie.value().trim_matches('"').to_string())
            .filter(|token| !token.is_empty());

        match &token {
            Some(_) => tracing::debug!("CSRF token acquired"),
            None => tracing::warn!(
                "No {} cookie in token response (status {})",
                CSRF_COOKIE_NAME,
                response.status()
            ),
        }

        token
    }

    /// Prepares a GET request carrying the session cookie and API headers
    fn api_request(&self, url: &str, token: Option<&str>) -> RequestBuilder {
        let mut cookie = format!("{}={}", SESSION_COOKIE_NAME, self.session_cookie);
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, VOYAGER_ACCEPT)
            .header("x-li-lang", API_LANG)
            .header("x-restli-protocol-version", RESTLI_VERSION);

        if let Some(token) = token {
            cookie.push_str(&format!("; {}=\"{}\"", CSRF_COOKIE_NAME, token));
            request = request.header(CSRF_HEADER, token);
        }

        request.header(COOKIE, cookie)
    }

    /// Query parameters for one people-search call
    fn search_params(&self, query: &str, count: usize) -> Vec<(&'static str, String)> {
        vec![
            ("decorationId", self.decoration_id.clone()),
            ("origin", self.origin.clone()),
            ("q", "all".to_string()),
            (
                "query",
                format!(
                    "(keywords:{},filters:List((key:resultType,value:List(PEOPLE))))",
                    urlencoding::encode(query)
                ),
            ),
            ("start", "0".to_string()),
            ("count", count.to_string()),
        ]
    }

    /// Runs every planned query until `max_results` unique profiles are collected
    ///
    /// Failed queries are logged and skipped. A 401/403 drops the cached token, so the
    /// next query runs with a freshly harvested one. Returns `Unauthorized` only when
    /// every attempted query was rejected.
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        max_results: usize,
    ) -> Result<Vec<CandidateProfile>, CrawlError> {
        let queries = build_queries(criteria);
        if queries.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}{}", self.api_base_url, SEARCH_PATH);

        let mut candidates = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut attempted = 0usize;
        let mut rejected = 0usize;

        for (index, query) in queries.iter().enumerate() {
            if seen.len() >= max_results {
                break;
            }
            if index > 0 {
                self.pacer.polite_delay().await;
            }

            // Re-harvested here when a previous query dropped a rejected token
            let token = self.csrf_token().await;

            attempted += 1;
            let count = self.page_size.min(max_results - seen.len());
            tracing::info!("Authenticated search: {:?} (count {})", query, count);

            let request = self
                .api_request(&url, token.as_deref())
                .query(&self.search_params(query, count));

            match fetch(request).await {
                FetchResult::Success { body, .. } => match serde_json::from_str::<Value>(&body) {
                    Ok(data) => {
                        let found = parse_search_response(&data, &self.site_url);
                        tracing::info!("  {} profiles for {:?}", found.len(), query);
                        for profile in found {
                            seen.insert(profile.profile_url.clone());
                            candidates.push(profile);
                        }
                    }
                    Err(e) => tracing::warn!("Unreadable search response for {:?}: {}", query, e),
                },
                FetchResult::RateLimited => {
                    tracing::warn!("Rate limited on {:?}", query);
                    self.pacer.cool_down().await;
                }
                FetchResult::Unauthorized { status_code } => {
                    rejected += 1;
                    tracing::warn!(
                        "Search rejected with {} for {:?}; dropping CSRF token",
                        status_code,
                        query
                    );
                    self.invalidate_token().await;
                }
                FetchResult::NetworkError { error, .. } => {
                    tracing::error!("Search request failed for {:?}: {}", query, error);
                }
                other => {
                    if let Some(error) = other.into_error(&url) {
                        tracing::warn!("Search failed for {:?}: {}", query, error);
                    }
                }
            }
        }

        if attempted > 0 && rejected == attempted {
            return Err(CrawlError::Unauthorized(format!(
                "all {} search queries were rejected",
                attempted
            )));
        }

        Ok(dedup_profiles(candidates, max_results))
    }

    /// Fetches and aggregates the full profile for a public identifier
    ///
    /// Every failure (HTTP, decode, no matching record) yields `None`.
    pub async fn fetch_profile(&self, public_id: &str) -> Option<CandidateProfile> {
        let public_id = public_id.trim().trim_matches('/');
        if public_id.is_empty() || public_id.contains('/') {
            tracing::warn!("Refusing to enrich invalid public id {:?}", public_id);
            return None;
        }

        let token = self.csrf_token().await;
        let url = format!(
            "{}{}/{}",
            self.api_base_url,
            PROFILE_PATH,
            urlencoding::encode(public_id)
        );
        tracing::info!("Enriching profile {}", public_id);

        match fetch(self.api_request(&url, token.as_deref())).await {
            FetchResult::Success { body, .. } => {
                let data: Value = match serde_json::from_str(&body) {
                    Ok(data) => data,
                    Err(e) => {
                        tracing::warn!("Unreadable profile response for {}: {}", public_id, e);
                        return None;
                    }
                };
                let profile = parse_full_profile(&data, public_id, &self.site_url);
                if profile.is_none() {
                    tracing::warn!("No usable profile record for {}", public_id);
                }
                profile
            }
            FetchResult::Unauthorized { status_code } => {
                tracing::warn!("Profile fetch rejected with {}; dropping CSRF token", status_code);
                self.invalidate_token().await;
                None
            }
            other => {
                if let Some(error) = other.into_error(&url) {
                    tracing::warn!("Profile fetch failed for {}: {}", public_id, error);
                }
                None
            }
        }
    }
}

#[async_trait]
impl ProfileSource for AuthenticatedSearchClient {
    fn name(&self) -> &'static str {
        "authenticated"
    }

    async fn search_people(
        &self,
        criteria: &SearchCriteria,
        max_results: usize,
    ) -> Result<Vec<CandidateProfile>, CrawlError> {
        self.search(criteria, max_results).await
    }

    async fn enrich(&self, public_id: &str) -> Option<CandidateProfile> {
        self.fetch_profile(public_id).await
    }
}
