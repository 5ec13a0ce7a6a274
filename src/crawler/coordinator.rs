//! Crawl coordinator - strategy selection and fallback
//!
//! The coordinator owns the two search strategies. It validates the request, computes
//! the query plan once for reporting, tries the authenticated source when one is
//! configured, and falls back to the search-engine source when that fails or finds
//! nothing.

use super::authenticated::AuthenticatedSearchClient;
use super::fallback::FallbackSearchClient;
use super::query::build_queries;
use super::ProfileSource;
use crate::config::{validate, Config};
use crate::model::{CandidateProfile, CrawlResult, SearchCriteria};
use crate::CrawlError;
use std::sync::Arc;

/// Unified entry point for profile search and enrichment
pub struct UnifiedCrawler {
    authenticated: Option<Arc<dyn ProfileSource>>,
    fallback: Arc<dyn ProfileSource>,
}

impl UnifiedCrawler {
    /// Creates a crawler from configuration
    ///
    /// The authenticated source is enabled only when a non-empty session cookie is
    /// configured. No requests are made here.
    ///
    /// # Returns
    ///
    /// * `Ok(UnifiedCrawler)` - Ready to search
    /// * `Err(CrawlError)` - Invalid configuration or HTTP client setup failed
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        validate(config)?;

        let fallback: Arc<dyn ProfileSource> = Arc::new(FallbackSearchClient::new(config)?);
        let authenticated = match AuthenticatedSearchClient::from_config(config)? {
            Some(client) => {
                tracing::info!("Session cookie configured, authenticated search enabled");
                Some(Arc::new(client) as Arc<dyn ProfileSource>)
            }
            None => {
                tracing::info!("No session cookie configured, using search-engine fallback only");
                None
            }
        };

        Ok(Self::from_sources(authenticated, fallback))
    }

    /// Creates a crawler from explicit sources
    pub fn from_sources(
        authenticated: Option<Arc<dyn ProfileSource>>,
        fallback: Arc<dyn ProfileSource>,
    ) -> Self {
        Self {
            authenticated,
            fallback,
        }
    }

    /// Whether a session cookie was configured for the authenticated source
    pub fn has_authenticated(&self) -> bool {
        self.authenticated.is_some()
    }

    /// Searches for profiles matching `criteria`
    ///
    /// `queries_used` is always the full query plan, whichever strategy produced the
    /// profiles. Source failures never surface here; they trigger the fallback or
    /// yield an empty result.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - At most `max_results` profiles with unique URLs
    /// * `Err(CrawlError::InvalidCriteria)` - Blank criteria entries or `max_results == 0`
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        max_results: usize,
    ) -> Result<CrawlResult, CrawlError> {
        criteria.validate()?;
        if max_results == 0 {
            return Err(CrawlError::InvalidCriteria(
                "max_results must be at least 1".to_string(),
            ));
        }

        let queries_used = build_queries(criteria);
        if queries_used.is_empty() {
            tracing::info!("No titles or locations given, nothing to search");
            return Ok(CrawlResult {
                profiles: Vec::new(),
                queries_used,
            });
        }
        tracing::info!("Planned {} queries", queries_used.len());

        if let Some(authenticated) = &self.authenticated {
            match authenticated.search_people(criteria, max_results).await {
                Ok(profiles) if !profiles.is_empty() => {
                    tracing::info!(
                        "{} search returned {} profiles",
                        authenticated.name(),
                        profiles.len()
                    );
                    return Ok(CrawlResult {
                        profiles,
                        queries_used,
                    });
                }
                Ok(_) => tracing::warn!(
                    "{} search returned no profiles, falling back to {}",
                    authenticated.name(),
                    self.fallback.name()
                ),
                Err(CrawlError::Unauthorized(reason)) => tracing::error!(
                    "Session credential rejected ({}), falling back to {}",
                    reason,
                    self.fallback.name()
                ),
                Err(e) => tracing::error!(
                    "{} search failed: {}, falling back to {}",
                    authenticated.name(),
                    e,
                    self.fallback.name()
                ),
            }
        }

        let profiles = match self.fallback.search_people(criteria, max_results).await {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::error!("{} search failed: {}", self.fallback.name(), e);
                Vec::new()
            }
        };
        tracing::info!("{} search returned {} profiles", self.fallback.name(), profiles.len());

        Ok(CrawlResult {
            profiles,
            queries_used,
        })
    }

    /// Fetches the full profile for a public identifier
    ///
    /// Requires the authenticated source; returns `None` without it or on any failure.
    pub async fn enrich_profile(&self, public_id: &str) -> Option<CandidateProfile> {
        match &self.authenticated {
            Some(authenticated) => authenticated.enrich(public_id).await,
            None => {
                tracing::warn!("Enrichment needs a session cookie; skipping {}", public_id);
                None
            }
        }
    }
}
