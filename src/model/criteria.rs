use crate::CrawlError;
use serde::{Deserialize, Serialize};

/// Search parameters derived from job requirements
///
/// Produced by an upstream collaborator and never modified by the crawler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Primary search keywords, most important first
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Job titles to search for (current or past)
    #[serde(default)]
    pub titles: Vec<String>,

    /// Geographic locations, most preferred first
    #[serde(default)]
    pub locations: Vec<String>,

    /// Target companies
    #[serde(default)]
    pub companies: Vec<String>,

    /// Industries to filter by
    #[serde(default)]
    pub industries: Vec<String>,

    /// Whether only current positions should match
    #[serde(default)]
    pub current_only: bool,
}

impl SearchCriteria {
    /// Checks that the criteria are structurally usable
    ///
    /// Empty lists are accepted. Blank entries inside a list are rejected.
    pub fn validate(&self) -> Result<(), CrawlError> {
        let fields: [(&str, &[String]); 5] = [
            ("keywords", &self.keywords),
            ("titles", &self.titles),
            ("locations", &self.locations),
            ("companies", &self.companies),
            ("industries", &self.industries),
        ];

        for (field, values) in fields {
            if let Some(index) = values.iter().position(|v| v.trim().is_empty()) {
                return Err(CrawlError::InvalidCriteria(format!(
                    "{}[{}] is blank",
                    field, index
                )));
            }
        }

        Ok(())
    }
}
