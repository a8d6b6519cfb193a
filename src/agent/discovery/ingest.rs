//! CSV listing ingest.
//!
//! Platform exports arrive as CSV; each row becomes a listing draft saved
//! through the discovery service so external-id deduplication applies.

use std::io::Read;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};

use super::service::{DiscoveryError, JobDiscoveryService};
use crate::agent::domain::{ListingSource, NewListing};
use crate::agent::store::{ListingStore, ProfileStore, SavedSearchStore};

/// Outcome of one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub inserted: usize,
    /// Rows whose (platform, external id) pair was already stored.
    pub skipped_duplicates: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("malformed listing export: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
}

pub fn import_listings<R, L, P, S>(
    service: &JobDiscoveryService<L, P, S>,
    reader: R,
) -> Result<ImportSummary, IngestError>
where
    R: Read,
    L: ListingStore,
    P: ProfileStore,
    S: SavedSearchStore,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut summary = ImportSummary::default();
    for record in csv_reader.deserialize::<ListingRow>() {
        let row = record?;
        match service.save_listing(row.into_draft()) {
            Ok(_) => summary.inserted += 1,
            Err(DiscoveryError::DuplicateListing { .. }) => summary.skipped_duplicates += 1,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(summary)
}

#[derive(Debug, Deserialize)]
struct ListingRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Company")]
    company: String,
    #[serde(rename = "Location", default)]
    location: String,
    #[serde(rename = "Description", default)]
    description: String,
    #[serde(rename = "Job Type", default)]
    job_type: String,
    #[serde(rename = "Platform", default, deserialize_with = "empty_string_as_none")]
    platform: Option<String>,
    #[serde(rename = "External ID", default, deserialize_with = "empty_string_as_none")]
    external_id: Option<String>,
    #[serde(rename = "Url", default, deserialize_with = "empty_string_as_none")]
    url: Option<String>,
    #[serde(rename = "Posted At", default, deserialize_with = "empty_string_as_none")]
    posted_at: Option<String>,
}

impl ListingRow {
    fn into_draft(self) -> NewListing {
        let source = match (&self.platform, &self.external_id) {
            (Some(platform), Some(external_id)) => Some(ListingSource {
                platform: platform.clone(),
                external_id: external_id.clone(),
            }),
            _ => None,
        };
        NewListing {
            posted_at: self.posted_at.as_deref().and_then(parse_date),
            title: self.title,
            company: self.company,
            location: self.location,
            description: self.description,
            job_type: self.job_type,
            salary_min: None,
            salary_max: None,
            source,
            url: self.url,
            closes_at: None,
            active: true,
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}
