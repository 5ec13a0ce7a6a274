use crate::url::{host_matches, PROFILE_PATH_MARKER};
use crate::UrlError;
use url::Url;

/// Query parameters that search engines use to carry the real destination
const REDIRECT_PARAMS: &[&str] = &["q", "url", "uddg"];

/// Builds the canonical profile URL for a public identifier
///
/// # Examples
///
/// ```
/// use candidate_sourcer::url::canonical_profile_url;
///
/// assert_eq!(
///     canonical_profile_url("https://www.linkedin.com/", "jane-doe"),
///     "https://www.linkedin.com/in/jane-doe"
/// );
/// ```
pub fn canonical_profile_url(site_url: &str, public_id: &str) -> String {
    format!(
        "{}/{}/{}",
        site_url.trim_end_matches('/'),
        PROFILE_PATH_MARKER,
        public_id
    )
}

/// Resolves a result-page link and unwraps search-engine redirect wrappers
///
/// Handles relative links (resolved against `base_url`), Google-style
/// `/url?q=<dest>&sa=...` links and DuckDuckGo-style `/l/?uddg=<dest>` links.
/// Destination values are percent-decoded. Links that are not wrappers are
/// returned as resolved.
///
/// Returns `None` for empty, fragment-only or non-HTTP(S) links.
pub fn unwrap_redirect(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let resolved = base_url.join(href).ok()?;
    if !is_http(&resolved) {
        return None;
    }

    let is_wrapper = resolved.path() == "/url" || resolved.path().starts_with("/l/");
    if is_wrapper {
        let destination = resolved
            .query_pairs()
            .find(|(key, value)| {
                REDIRECT_PARAMS.contains(&key.as_ref()) && value.starts_with("http")
            })
            .and_then(|(_, value)| Url::parse(&value).ok())
            .filter(is_http);

        if destination.is_some() {
            return destination;
        }
    }

    Some(resolved)
}

/// Extracts the public identifier from a profile link
///
/// # Normalization Steps
///
/// 1. Reject non-HTTP(S) schemes and links without a host
/// 2. Reject hosts outside the site domain (subdomains are accepted)
/// 3. Normalize the path:
///    - Remove empty and `.` segments
///    - Resolve `..` segments
/// 4. Take the segment following the profile marker (`/in/<id>`)
///
/// Query string (tracking parameters included) and fragment never contribute.
///
/// # Examples
///
/// ```
/// use candidate_sourcer::url::public_id_from_url;
/// use url::Url;
///
/// let url = Url::parse("https://uk.linkedin.com/in/jane-doe/?trk=public").unwrap();
/// assert_eq!(public_id_from_url(&url, "linkedin.com").unwrap(), "jane-doe");
/// ```
pub fn public_id_from_url(url: &Url, site_domain: &str) -> Result<String, UrlError> {
    if !is_http(url) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url.host_str().ok_or(UrlError::MissingDomain)?;
    if !host_matches(site_domain, host) {
        return Err(UrlError::NotAProfile(url.to_string()));
    }

    let segments = normalize_segments(url.path());
    segments
        .iter()
        .position(|segment| *segment == PROFILE_PATH_MARKER)
        .and_then(|index| segments.get(index + 1))
        .map(|id| id.to_string())
        .ok_or_else(|| UrlError::NotAProfile(url.to_string()))
}

/// Parses a link and canonicalizes it in one step
///
/// Returns `(public_id, canonical_url)` for profile links on the site.
pub fn profile_public_id(
    link: &str,
    site_url: &str,
    site_domain: &str,
) -> Result<(String, String), UrlError> {
    let url = Url::parse(link).map_err(|e| UrlError::Parse(e.to_string()))?;
    let public_id = public_id_from_url(&url, site_domain)?;
    let canonical = canonical_profile_url(site_url, &public_id);
    Ok((public_id, canonical))
}

fn is_http(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}

/// Splits a path into normalized segments, removing dot segments and empties
fn normalize_segments(path: &str) -> Vec<&str> {
    let mut normalized_segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            // Skip empty segments (from multiple or trailing slashes) and current directory markers
            "" | "." => continue,
            // Parent directory - pop the last segment if possible
            ".." => {
                normalized_segments.pop();
            }
            _ => normalized_segments.push(segment),
        }
    }

    normalized_segments
}
