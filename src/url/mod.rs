//! URL handling module for Candidate-Sourcer
//!
//! This module provides profile URL canonicalization, public identifier extraction,
//! search-engine redirect unwrapping and site domain matching.

mod normalize;

use url::Url;

// Re-export main functions
pub use normalize::{canonical_profile_url, profile_public_id, public_id_from_url, unwrap_redirect};

/// Path segment that marks a member profile on the target network
pub const PROFILE_PATH_MARKER: &str = "in";

/// Extracts the registrable site domain from a base URL
///
/// The host is lowercased and a leading `www.` is removed, so
/// `https://www.linkedin.com` yields `linkedin.com`.
///
/// # Examples
///
/// ```
/// use candidate_sourcer::url::site_domain;
///
/// assert_eq!(site_domain("https://www.LinkedIn.com"), Some("linkedin.com".to_string()));
/// assert_eq!(site_domain("not a url"), None);
/// ```
pub fn site_domain(base_url: &str) -> Option<String> {
    let url = Url::parse(base_url).ok()?;
    let host = url.host_str()?.to_lowercase();

    Some(match host.strip_prefix("www.") {
        Some(stripped) => stripped.to_string(),
        None => host,
    })
}

/// Checks whether `host` is the site domain itself or one of its subdomains
///
/// Country and language mirrors such as `uk.linkedin.com` count as the same site.
pub fn host_matches(site_domain: &str, host: &str) -> bool {
    let host = host.to_lowercase();
    host == site_domain || host.ends_with(&format!(".{}", site_domain))
}
