//! Data model shared by every search strategy
//!
//! - `SearchCriteria`: immutable input supplied by the requirement-extraction stage
//! - `CandidateProfile`: canonical profile record produced by the normalizers
//! - `CrawlResult`: profiles plus the query plan that produced them

mod criteria;
mod profile;

pub use criteria::SearchCriteria;
pub use profile::{CandidateProfile, CrawlResult, Education, Experience};
