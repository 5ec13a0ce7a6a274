//! Search-engine fallback
//!
//! Finds public profiles without credentials by running `site:` restricted queries
//! against a web search engine and scraping profile links from the result pages.

use super::fetcher::{build_http_client, fetch, FetchResult};
use super::pacing::Pacer;
use super::query::build_queries;
use super::ProfileSource;
use crate::config::Config;
use crate::model::{CandidateProfile, SearchCriteria};
use crate::normalize::{dedup_profiles, parse_search_results};
use crate::url::{site_domain, PROFILE_PATH_MARKER};
use crate::{ConfigError, CrawlError};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

const HTML_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// People search by scraping a public search engine
pub struct FallbackSearchClient {
    client: Client,
    search_url: Url,
    site_url: String,
    site_domain: String,
    results_per_query: u32,
    pacer: Pacer,
}

impl FallbackSearchClient {
    /// Creates a client for the configured search engine
    ///
    /// Fails when the search URL does not parse or the site URL has no host.
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        let search_url = Url::parse(&config.search_engine.search_url)?;
        let site_domain = site_domain(&config.linkedin.site_url)
            .ok_or_else(|| ConfigError::InvalidUrl(config.linkedin.site_url.clone()))?;

        Ok(Self {
            client: build_http_client(&config.user_agent, &config.http)?,
            search_url,
            site_url: config.linkedin.site_url.clone(),
            site_domain,
            results_per_query: config.search_engine.results_per_query,
            pacer: Pacer::new(&config.pacing.fallback),
        })
    }

    /// Restricts a planned query to profile pages on the site
    ///
    /// `python backend Boston` becomes `site:linkedin.com/in "python backend Boston"`.
    pub fn engine_query(&self, query: &str) -> String {
        format!(
            "site:{}/{} \"{}\"",
            self.site_domain, PROFILE_PATH_MARKER, query
        )
    }

    /// Runs every planned query until `max_results` unique profiles are collected
    ///
    /// Every failure is logged and skipped; this never returns an error.
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        max_results: usize,
    ) -> Vec<CandidateProfile> {
        let mut candidates = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for (index, query) in build_queries(criteria).iter().enumerate() {
            if seen.len() >= max_results {
                break;
            }
            if index > 0 {
                self.pacer.polite_delay().await;
            }

            let engine_query = self.engine_query(query);
            tracing::info!("Fallback search: {}", engine_query);

            let request = self
                .client
                .get(self.search_url.clone())
                .header(ACCEPT, HTML_ACCEPT)
                .query(&[
                    ("q", engine_query.clone()),
                    ("num", self.results_per_query.to_string()),
                ]);

            match fetch(request).await {
                FetchResult::Success { final_url, body } => {
                    let base = Url::parse(&final_url).unwrap_or_else(|_| self.search_url.clone());
                    let found = parse_search_results(&body, &base, &self.site_url);
                    tracing::info!("  {} profile links for {:?}", found.len(), query);
                    for profile in found {
                        seen.insert(profile.profile_url.clone());
                        candidates.push(profile);
                    }
                }
                FetchResult::RateLimited => {
                    tracing::warn!("Search engine rate limited {:?}", query);
                    self.pacer.cool_down().await;
                }
                FetchResult::NetworkError { error, .. } => {
                    tracing::error!("Search engine request failed for {:?}: {}", query, error);
                }
                other => {
                    if let Some(error) = other.into_error(self.search_url.as_str()) {
                        tracing::warn!("Search engine query failed for {:?}: {}", query, error);
                    }
                }
            }
        }

        dedup_profiles(candidates, max_results)
    }
}

#[async_trait]
impl ProfileSource for FallbackSearchClient {
    fn name(&self) -> &'static str {
        "search-engine"
    }

    async fn search_people(
        &self,
        criteria: &SearchCriteria,
        max_results: usize,
    ) -> Result<Vec<CandidateProfile>, CrawlError> {
        Ok(self.search(criteria, max_results).await)
    }
}
