use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::notes::{render_notes, NoteEntry};
use super::status::ApplicationStatus;
use crate::agent::domain::{ApplicationId, JobId, ProfileId};

/// The record of a profile pursuing a specific listing.
///
/// Owned by its profile; references (never owns) the listing. Mutated only
/// through the lifecycle service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: ApplicationId,
    pub profile_id: ProfileId,
    pub job_id: JobId,
    pub applied_at: DateTime<Utc>,
    pub status: ApplicationStatus,
    pub resume_version: Option<u32>,
    pub cover_letter_version: Option<u32>,
    pub notes: Vec<NoteEntry>,
    pub last_updated: DateTime<Utc>,
}

impl Application {
    /// Legacy single-blob rendering of the note log.
    pub fn rendered_notes(&self) -> String {
        render_notes(&self.notes)
    }

    pub fn view(&self) -> ApplicationView {
        ApplicationView {
            id: self.id,
            profile_id: self.profile_id,
            job_id: self.job_id,
            status: self.status.label(),
            applied_at: self.applied_at,
            last_updated: self.last_updated,
            resume_version: self.resume_version,
            cover_letter_version: self.cover_letter_version,
            notes: self.rendered_notes(),
        }
    }
}

/// Serialization-boundary view of an application for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub profile_id: ProfileId,
    pub job_id: JobId,
    pub status: &'static str,
    pub applied_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter_version: Option<u32>,
    pub notes: String,
}

/// Derived per-profile counters, recomputed on demand and never persisted.
///
/// The bucket counters group synonym statuses; `by_status` keeps the exact
/// per-status breakdown. Both views are returned together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplicationStatistics {
    pub total: usize,
    pub pending: usize,
    pub interviews: usize,
    pub offers: usize,
    pub rejected: usize,
    pub by_status: BTreeMap<String, usize>,
}

impl ApplicationStatistics {
    /// Single pass over a profile's applications.
    pub fn collect<'a, I>(applications: I) -> Self
    where
        I: IntoIterator<Item = &'a Application>,
    {
        let mut stats = ApplicationStatistics::default();
        for application in applications {
            stats.total += 1;
            match application.status {
                ApplicationStatus::Applied | ApplicationStatus::Screening => stats.pending += 1,
                ApplicationStatus::Interview | ApplicationStatus::TechnicalTest => {
                    stats.interviews += 1
                }
                ApplicationStatus::Offer => stats.offers += 1,
                ApplicationStatus::Rejected => stats.rejected += 1,
                // Withdrawn stays unbucketed; it still counts toward the
                // total and the exact breakdown.
                ApplicationStatus::Withdrawn => {}
            }
            *stats
                .by_status
                .entry(application.status.label().to_string())
                .or_insert(0) += 1;
        }
        stats
    }
}

/// Which generated artifact a version number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Resume,
    CoverLetter,
}

impl DocumentKind {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentKind::Resume => "resume",
            DocumentKind::CoverLetter => "cover_letter",
        }
    }
}

/// AI-generated content persisted with a monotonic per-(profile, job, kind)
/// version. Versions are never reused or decremented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub profile_id: ProfileId,
    pub job_id: JobId,
    pub kind: DocumentKind,
    pub version: u32,
    pub body: String,
    pub created_at: DateTime<Utc>,
}
