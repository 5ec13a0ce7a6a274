use serde::{Deserialize, Serialize};

/// A single work-experience entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single education entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    pub school: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<String>,
}

/// Canonical candidate profile
///
/// `profile_url` is always in canonical form (`<site>/in/<public_id>`) and is the
/// identity key used for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub profile_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
}

impl CandidateProfile {
    /// Creates a profile with only the required fields set
    ///
    /// Returns `None` when the trimmed name is empty.
    pub fn new(name: impl Into<String>, profile_url: impl Into<String>) -> Option<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return None;
        }

        Some(Self {
            name,
            headline: None,
            location: None,
            profile_url: profile_url.into(),
            current_company: None,
            current_title: None,
            summary: None,
            skills: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
        })
    }

    /// The slug following `/in/` in the canonical URL
    pub fn public_id(&self) -> Option<&str> {
        self.profile_url
            .split("/in/")
            .nth(1)
            .map(|rest| rest.split('/').next().unwrap_or(rest))
            .filter(|id| !id.is_empty())
    }
}

/// Outcome of one crawl call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlResult {
    /// Unique profiles, in the order the winning strategy produced them
    pub profiles: Vec<CandidateProfile>,

    /// Queries planned for this call, independent of which strategy ran
    pub queries_used: Vec<String>,
}

impl CrawlResult {
    /// Splits the result into `(profiles, queries_used)`
    pub fn into_parts(self) -> (Vec<CandidateProfile>, Vec<String>) {
        (self.profiles, self.queries_used)
    }
}
