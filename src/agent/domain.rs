use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifier for a job seeker profile.
    ProfileId
);
id_type!(
    /// Identifier for a job listing.
    JobId
);
id_type!(
    /// Identifier for a tracked application.
    ApplicationId
);
id_type!(
    /// Identifier for a persisted saved search.
    SavedSearchId
);

/// A single skill on a profile. Names are unique per profile, case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: String,
    /// Proficiency on a 1-5 scale.
    pub proficiency: u8,
    pub years_experience: f32,
    pub highlighted: bool,
}

/// A position held, current when `end` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkExperience {
    pub company: String,
    pub title: String,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub description: String,
}

impl WorkExperience {
    pub fn is_current(&self) -> bool {
        self.end.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
}

/// Stored identity on an external job platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformCredential {
    pub platform: String,
    pub username: String,
    pub token: String,
}

/// The job seeker's structured resume data.
///
/// Child collections are owned by the profile and mutated only through the
/// profile service, never shared between call sites.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub summary: String,
    pub last_updated: DateTime<Utc>,
    pub skills: Vec<Skill>,
    pub experience: Vec<WorkExperience>,
    pub education: Vec<Education>,
    pub credentials: Vec<PlatformCredential>,
}

/// Where a listing was ingested from, for cross-platform deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingSource {
    pub platform: String,
    pub external_id: String,
}

/// A stored job posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub job_type: String,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub source: Option<ListingSource>,
    pub url: Option<String>,
    pub posted_at: Option<NaiveDate>,
    pub closes_at: Option<NaiveDate>,
    pub active: bool,
}

/// A listing that has not been persisted yet; the store assigns the identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub job_type: String,
    pub salary_min: Option<u32>,
    pub salary_max: Option<u32>,
    pub source: Option<ListingSource>,
    pub url: Option<String>,
    pub posted_at: Option<NaiveDate>,
    pub closes_at: Option<NaiveDate>,
    pub active: bool,
}

impl NewListing {
    pub(crate) fn into_listing(self, id: JobId) -> JobListing {
        JobListing {
            id,
            title: self.title,
            company: self.company,
            location: self.location,
            description: self.description,
            job_type: self.job_type,
            salary_min: self.salary_min,
            salary_max: self.salary_max,
            source: self.source,
            url: self.url,
            posted_at: self.posted_at,
            closes_at: self.closes_at,
            active: self.active,
        }
    }
}

/// Persisted search criteria a user can re-run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: SavedSearchId,
    pub profile_id: ProfileId,
    pub name: String,
    pub keywords: Vec<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub platforms: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub notify: bool,
    pub notify_every_days: Option<u32>,
    pub last_executed: Option<DateTime<Utc>>,
}
