//! Structured-API record decoding
//!
//! Responses carry an `included` array of heterogeneous records whose kind is named
//! by an embedded `$type` string. Each record decodes into a `VoyagerRecord`
//! variant; anything unrecognized or malformed becomes `VoyagerRecord::Unknown` and
//! is dropped, so schema drift on the provider side degrades to missing fields
//! rather than failed batches.

use super::{join_name, non_blank};
use crate::model::{CandidateProfile, Education, Experience};
use crate::url::canonical_profile_url;
use serde::Deserialize;
use serde_json::Value;

/// Discriminator field carried by every included record
const TYPE_FIELD: &str = "$type";

/// One decoded entry of the `included` array
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoyagerRecord {
    Profile(ProfileRecord),
    Position(PositionRecord),
    Education(EducationRecord),
    Skill(SkillRecord),
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    #[serde(alias = "public_id")]
    pub public_identifier: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub occupation: Option<String>,
    pub headline: Option<String>,
    pub location_name: Option<String>,
    pub summary: Option<String>,
    pub entity_urn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionRecord {
    pub title: Option<String>,
    pub company_name: Option<String>,
    pub location_name: Option<String>,
    pub description: Option<String>,
    pub time_period: Option<TimePeriod>,
    pub entity_urn: Option<String>,
    pub profile_urn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationRecord {
    pub school_name: Option<String>,
    pub degree_name: Option<String>,
    pub field_of_study: Option<String>,
    pub time_period: Option<TimePeriod>,
    pub entity_urn: Option<String>,
    pub profile_urn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRecord {
    pub name: Option<String>,
    pub entity_urn: Option<String>,
    pub profile_urn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimePeriod {
    pub start_date: Option<DateParts>,
    pub end_date: Option<DateParts>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DateParts {
    pub year: Option<i32>,
}

impl TimePeriod {
    /// `"2019 - Present"`, `"2015 - 2019"` or a single year
    fn label(&self) -> Option<String> {
        let start = self.start_date.as_ref()?.year?;
        match self.end_date.as_ref().map(|end| end.year) {
            None => Some(format!("{} - Present", start)),
            Some(Some(end)) if end != start => Some(format!("{} - {}", start, end)),
            Some(_) => Some(start.to_string()),
        }
    }

    fn is_ongoing(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_none()
    }
}

impl VoyagerRecord {
    /// Decodes one raw record using its `$type` discriminator
    ///
    /// Only the last dotted segment of the type name is inspected. Position,
    /// education and skill kinds are checked before profile kinds because their
    /// names may also mention profiles.
    pub fn from_value(value: &Value) -> Self {
        let Some(type_name) = value.get(TYPE_FIELD).and_then(Value::as_str) else {
            return Self::Unknown;
        };
        let kind = type_name.rsplit('.').next().unwrap_or(type_name);

        let decoded = if kind.contains("Position") {
            PositionRecord::deserialize(value).map(Self::Position)
        } else if kind.contains("Education") {
            EducationRecord::deserialize(value).map(Self::Education)
        } else if kind.contains("Skill") {
            SkillRecord::deserialize(value).map(Self::Skill)
        } else if kind.contains("Profile") {
            ProfileRecord::deserialize(value).map(Self::Profile)
        } else {
            return Self::Unknown;
        };

        decoded.unwrap_or_else(|e| {
            tracing::debug!("Skipping malformed {} record: {}", type_name, e);
            Self::Unknown
        })
    }
}

/// Decodes the `included` array, dropping unknown records
pub fn decode_included(data: &Value) -> Vec<VoyagerRecord> {
    data.get("included")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(VoyagerRecord::from_value)
                .filter(|record| *record != VoyagerRecord::Unknown)
                .collect()
        })
        .unwrap_or_default()
}

/// Extracts summary profiles from a people-search response
///
/// Every profile record with a public identifier and a non-empty name yields one
/// profile, in response order. Duplicates are left for the caller to remove.
pub fn parse_search_response(data: &Value, site_url: &str) -> Vec<CandidateProfile> {
    decode_included(data)
        .iter()
        .filter_map(|record| match record {
            VoyagerRecord::Profile(profile) => summary_profile(profile, site_url),
            _ => None,
        })
        .collect()
}

fn summary_profile(record: &ProfileRecord, site_url: &str) -> Option<CandidateProfile> {
    let public_id = non_blank(record.public_identifier.as_deref())?;
    let name = join_name(record.first_name.as_deref(), record.last_name.as_deref());
    let mut profile = CandidateProfile::new(name, canonical_profile_url(site_url, &public_id))?;

    let occupation = non_blank(record.occupation.as_deref());
    profile.headline = occupation
        .clone()
        .or_else(|| non_blank(record.headline.as_deref()));
    profile.location = non_blank(record.location_name.as_deref());

    if let Some(occupation) = occupation {
        let (title, company) = split_occupation(&occupation);
        profile.current_title = Some(title);
        profile.current_company = company;
    }

    Some(profile)
}

/// Splits `"Staff Engineer at Acme"` into title and company
fn split_occupation(occupation: &str) -> (String, Option<String>) {
    match occupation.split_once(" at ") {
        Some((title, company)) if !title.trim().is_empty() && !company.trim().is_empty() => {
            (title.trim().to_string(), Some(company.trim().to_string()))
        }
        _ => (occupation.to_string(), None),
    }
}

/// Correlates child records with the requested root profile
struct Correlator<'a> {
    root_key: Option<&'a str>,
    single_profile: bool,
}

impl Correlator<'_> {
    /// A child belongs to the root when one of its URNs embeds the root's id.
    /// Children with no identifier can only be attributed when the response holds
    /// exactly one profile; otherwise they are ambiguous.
    fn belongs(&self, urns: [Option<&str>; 2]) -> bool {
        let child_urns: Vec<&str> = urns.into_iter().flatten().collect();

        match self.root_key {
            Some(key) if !child_urns.is_empty() => child_urns
                .iter()
                .any(|urn| urn.split([':', '(', ')', ',']).any(|part| part == key)),
            _ => self.single_profile,
        }
    }
}

/// Parses a full profile response into one aggregated profile
///
/// Returns `None` when no profile record matches `public_id` or the matching
/// record has no usable name.
pub fn parse_full_profile(
    data: &Value,
    public_id: &str,
    site_url: &str,
) -> Option<CandidateProfile> {
    let records = decode_included(data);

    let profiles: Vec<&ProfileRecord> = records
        .iter()
        .filter_map(|record| match record {
            VoyagerRecord::Profile(profile) => Some(profile),
            _ => None,
        })
        .collect();

    let root = profiles
        .iter()
        .find(|profile| profile.public_identifier.as_deref() == Some(public_id))?;

    let correlator = Correlator {
        root_key: root
            .entity_urn
            .as_deref()
            .and_then(|urn| urn.rsplit(':').next())
            .filter(|key| !key.is_empty()),
        single_profile: profiles.len() == 1,
    };

    let mut experience = Vec::new();
    let mut education = Vec::new();
    let mut skills: Vec<String> = Vec::new();
    let mut current: Option<(String, String)> = None;

    for record in &records {
        match record {
            VoyagerRecord::Position(position)
                if correlator.belongs([
                    position.entity_urn.as_deref(),
                    position.profile_urn.as_deref(),
                ]) =>
            {
                let Some(company) = non_blank(position.company_name.as_deref()) else {
                    continue;
                };
                let title =
                    non_blank(position.title.as_deref()).unwrap_or_else(|| "Unknown".to_string());

                let ongoing = position
                    .time_period
                    .as_ref()
                    .map_or(false, TimePeriod::is_ongoing);
                if ongoing && current.is_none() {
                    current = Some((title.clone(), company.clone()));
                }

                experience.push(Experience {
                    title,
                    company,
                    location: non_blank(position.location_name.as_deref()),
                    duration: position.time_period.as_ref().and_then(TimePeriod::label),
                    description: non_blank(position.description.as_deref()),
                });
            }
            VoyagerRecord::Education(entry)
                if correlator.belongs([entry.entity_urn.as_deref(), entry.profile_urn.as_deref()]) =>
            {
                let Some(school) = non_blank(entry.school_name.as_deref()) else {
                    continue;
                };
                education.push(Education {
                    school,
                    degree: non_blank(entry.degree_name.as_deref()),
                    field_of_study: non_blank(entry.field_of_study.as_deref()),
                    years: entry.time_period.as_ref().and_then(TimePeriod::label),
                });
            }
            VoyagerRecord::Skill(skill)
                if correlator.belongs([skill.entity_urn.as_deref(), skill.profile_urn.as_deref()]) =>
            {
                if let Some(name) = non_blank(skill.name.as_deref()) {
                    if !skills.contains(&name) {
                        skills.push(name);
                    }
                }
            }
            _ => {}
        }
    }

    let name = join_name(root.first_name.as_deref(), root.last_name.as_deref());
    let Some(mut profile) = CandidateProfile::new(name, canonical_profile_url(site_url, public_id))
    else {
        tracing::debug!("Profile {} has no usable name", public_id);
        return None;
    };

    let headline = non_blank(root.headline.as_deref());
    profile.location = non_blank(root.location_name.as_deref());
    profile.summary = non_blank(root.summary.as_deref());
    match current {
        Some((title, company)) => {
            profile.current_title = Some(title);
            profile.current_company = Some(company);
        }
        None => profile.current_title = headline.clone(),
    }
    profile.headline = headline;
    profile.skills = skills;
    profile.experience = experience;
    profile.education = education;

    Some(profile)
}
