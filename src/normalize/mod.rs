//! Result normalization
//!
//! Maps provider-specific raw data into canonical `CandidateProfile` values:
//! - `voyager`: typed records from the structured API's `included` array
//! - `serp`: profile links and snippets scraped from search-engine result pages
//!
//! Records without a usable name or identifier are skipped, never reported as errors.

mod serp;
mod voyager;

pub use serp::parse_search_results;
pub use voyager::{
    decode_included, parse_full_profile, parse_search_response, DateParts, EducationRecord,
    PositionRecord, ProfileRecord, SkillRecord, TimePeriod, VoyagerRecord,
};

use crate::model::CandidateProfile;
use std::collections::HashSet;

/// Deduplicates profiles by `profile_url` and truncates to `max_results`
///
/// The first occurrence of each URL wins and relative order is preserved.
pub fn dedup_profiles(profiles: Vec<CandidateProfile>, max_results: usize) -> Vec<CandidateProfile> {
    let mut seen: HashSet<String> = HashSet::new();
    profiles
        .into_iter()
        .filter(|profile| seen.insert(profile.profile_url.clone()))
        .take(max_results)
        .collect()
}

/// Turns a public identifier into a display name
///
/// Hyphens become spaces and each word is title-cased, so `jane-doe-12345`
/// reads `Jane Doe 12345`.
pub fn humanize_public_id(public_id: &str) -> String {
    public_id
        .split('-')
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Joins first and last name, ignoring missing or blank parts
pub(crate) fn join_name(first: Option<&str>, last: Option<&str>) -> String {
    [first, last]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Returns the trimmed value when it carries any text
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
