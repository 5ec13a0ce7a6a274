//! Search-engine result page parser
//!
//! This module extracts profile stubs from result markup:
//! - Profile links (from `<a href>` tags, redirect wrappers unwrapped)
//! - Display name and headline from the surrounding snippet text

use super::{humanize_public_id, non_blank};
use crate::model::CandidateProfile;
use crate::url::{canonical_profile_url, public_id_from_url, site_domain, unwrap_redirect};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Delimiter search engines put between name, headline and site in result titles
const SNIPPET_DELIMITER: &str = " - ";

/// Parses a result page and returns one profile per profile link, in page order
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` tags whose destination is a profile on the site domain
///   (`/in/<public_id>`), including subdomain mirrors
/// - Redirect wrappers (`/url?q=...`, `/l/?uddg=...`) after unwrapping
///
/// **Exclude:**
/// - Links to other sites or non-profile pages
/// - Profile links with no identifier after the `/in/` marker
/// - `javascript:`, `mailto:` and fragment-only links
///
/// Duplicates are kept; the caller deduplicates across pages.
///
/// # Arguments
///
/// * `html` - The result page markup
/// * `base_url` - The search URL, for resolving relative links
/// * `site_url` - Base of canonical profile URLs
///
/// # Example
///
/// ```
/// use candidate_sourcer::normalize::parse_search_results;
/// use url::Url;
///
/// let html = r#"<div><a href="/url?q=https://www.linkedin.com/in/jane-doe&sa=U">Jane Doe - Engineer - LinkedIn</a></div>"#;
/// let base = Url::parse("https://www.google.com/search").unwrap();
/// let profiles = parse_search_results(html, &base, "https://www.linkedin.com");
/// assert_eq!(profiles[0].name, "Jane Doe");
/// assert_eq!(profiles[0].profile_url, "https://www.linkedin.com/in/jane-doe");
/// ```
pub fn parse_search_results(html: &str, base_url: &Url, site_url: &str) -> Vec<CandidateProfile> {
    let Some(domain) = site_domain(site_url) else {
        tracing::warn!("Cannot derive site domain from {}", site_url);
        return Vec::new();
    };

    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut profiles = Vec::new();

    for anchor in document.select(&anchor_selector) {
        let Some(link) = anchor
            .value()
            .attr("href")
            .and_then(|href| unwrap_redirect(href, base_url))
        else {
            continue;
        };

        let public_id = match public_id_from_url(&link, &domain) {
            Ok(id) => id,
            Err(_) => continue,
        };

        let (name, headline) = split_snippet(&snippet_text(anchor), &public_id);
        let Some(mut profile) =
            CandidateProfile::new(name, canonical_profile_url(site_url, &public_id))
        else {
            continue;
        };
        profile.current_title = headline.clone();
        profile.headline = headline;

        profiles.push(profile);
    }

    profiles
}

/// Text of the nearest enclosing `<div>`, or of the anchor itself
fn snippet_text(anchor: ElementRef<'_>) -> String {
    let container = anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "div")
        .unwrap_or(anchor);

    container
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recovers `(name, headline)` from snippet text
///
/// `"Jane Doe - Staff Engineer - Acme - LinkedIn"` gives `Jane Doe` and
/// `Staff Engineer`. Without a delimiter the name comes from the public id.
fn split_snippet(text: &str, public_id: &str) -> (String, Option<String>) {
    let mut parts = text.split(SNIPPET_DELIMITER);

    match (parts.next(), parts.next()) {
        (Some(first), Some(second)) => {
            let name = non_blank(Some(first)).unwrap_or_else(|| humanize_public_id(public_id));
            (name, non_blank(Some(second)))
        }
        _ => (humanize_public_id(public_id), None),
    }
}
