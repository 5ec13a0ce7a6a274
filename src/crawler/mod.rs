//! Crawler module for profile search
//!
//! This module contains the search strategies and their coordination, including:
//! - Query planning from search criteria
//! - HTTP fetching and response classification
//! - Request pacing between queries
//! - The authenticated API and search-engine fallback sources
//! - Strategy selection with fallback

mod authenticated;
mod coordinator;
mod fallback;
mod fetcher;
mod pacing;
mod query;

pub use authenticated::AuthenticatedSearchClient;
pub use coordinator::UnifiedCrawler;
pub use fallback::FallbackSearchClient;
pub use fetcher::{build_http_client, fetch, FetchResult};
pub use pacing::Pacer;
pub use query::build_queries;

use crate::model::{CandidateProfile, SearchCriteria};
use crate::CrawlError;
use async_trait::async_trait;

/// A strategy that can find candidate profiles
///
/// Sources run their queries sequentially and report profiles with unique URLs,
/// at most `max_results` of them.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Runs the query plan for `criteria`
    async fn search_people(
        &self,
        criteria: &SearchCriteria,
        max_results: usize,
    ) -> Result<Vec<CandidateProfile>, CrawlError>;

    /// Fetches the full profile for a public identifier, if the source can
    async fn enrich(&self, _public_id: &str) -> Option<CandidateProfile> {
        None
    }
}
