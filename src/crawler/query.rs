//! Query planning
//!
//! Turns search criteria into the ordered list of free-text queries that every
//! strategy runs. Pure and deterministic.

use crate::model::SearchCriteria;

/// Titles combined with keywords, one query each
const MAX_TITLES: usize = 3;

/// Keywords appended to each title query
const TITLE_KEYWORDS: usize = 4;

/// Keywords combined with the first location
const LOCATION_KEYWORDS: usize = 3;

/// Builds the query plan for a set of criteria
///
/// - One query per title (first 3 titles): `"<title> <first 4 keywords>"`
/// - One extra query when locations exist: `"<first 3 keywords> <first location>"`
///
/// Queries are not deduplicated. An empty plan means there is nothing to search.
///
/// # Example
///
/// ```
/// use candidate_sourcer::{build_queries, SearchCriteria};
///
/// let criteria = SearchCriteria {
///     keywords: vec!["python".into(), "backend".into()],
///     titles: vec!["Backend Engineer".into()],
///     locations: vec!["Boston".into()],
///     ..Default::default()
/// };
///
/// assert_eq!(
///     build_queries(&criteria),
///     vec!["Backend Engineer python backend", "python backend Boston"]
/// );
/// ```
pub fn build_queries(criteria: &SearchCriteria) -> Vec<String> {
    let mut queries = Vec::new();

    let title_keywords = join_first(&criteria.keywords, TITLE_KEYWORDS);
    for title in criteria.titles.iter().take(MAX_TITLES) {
        queries.push(join_terms(&[title.as_str(), title_keywords.as_str()]));
    }

    if let Some(location) = criteria.locations.first() {
        let location_keywords = join_first(&criteria.keywords, LOCATION_KEYWORDS);
        queries.push(join_terms(&[location_keywords.as_str(), location.as_str()]));
    }

    queries
}

fn join_first(terms: &[String], count: usize) -> String {
    terms
        .iter()
        .take(count)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Space-joins terms, leaving out empty ones so no query has stray spaces
fn join_terms(terms: &[&str]) -> String {
    terms
        .iter()
        .filter(|term| !term.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
