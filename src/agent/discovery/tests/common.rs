use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::agent::discovery::service::JobDiscoveryService;
use crate::agent::domain::{
    JobId, JobListing, ListingSource, NewListing, Profile, ProfileId, Skill,
};
use crate::agent::memory::{MemoryListingStore, MemoryProfileStore, MemorySavedSearchStore};
use crate::agent::store::{ListingStore, ProfileStore, StoreError};

pub(super) type MemoryDiscovery =
    JobDiscoveryService<MemoryListingStore, MemoryProfileStore, MemorySavedSearchStore>;

pub(super) fn build_service() -> (
    Arc<MemoryDiscovery>,
    Arc<MemoryListingStore>,
    Arc<MemoryProfileStore>,
    Arc<MemorySavedSearchStore>,
) {
    let listings = Arc::new(MemoryListingStore::default());
    let profiles = Arc::new(MemoryProfileStore::default());
    let searches = Arc::new(MemorySavedSearchStore::default());
    let service = Arc::new(JobDiscoveryService::new(
        listings.clone(),
        profiles.clone(),
        searches.clone(),
    ));
    (service, listings, profiles, searches)
}

pub(super) fn draft(title: &str, description: &str, posted: Option<NaiveDate>) -> NewListing {
    NewListing {
        title: title.to_string(),
        company: "Acme".to_string(),
        location: "Des Moines, IA".to_string(),
        description: description.to_string(),
        job_type: "Full-time".to_string(),
        salary_min: None,
        salary_max: None,
        source: None,
        url: None,
        posted_at: posted,
        closes_at: None,
        active: true,
    }
}

pub(super) fn sourced_draft(title: &str, platform: &str, external_id: &str) -> NewListing {
    let mut listing = draft(title, "", date(2024, 1, 1));
    listing.source = Some(ListingSource {
        platform: platform.to_string(),
        external_id: external_id.to_string(),
    });
    listing
}

pub(super) fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    Some(NaiveDate::from_ymd_opt(year, month, day).expect("valid date"))
}

pub(super) fn seed(listings: &MemoryListingStore, drafts: Vec<NewListing>) -> Vec<JobListing> {
    drafts
        .into_iter()
        .map(|draft| listings.add(draft).expect("memory store accepts drafts"))
        .collect()
}

pub(super) fn profile_with_skills(profiles: &MemoryProfileStore, names: &[&str]) -> Profile {
    let profile = Profile {
        id: ProfileId(0),
        first_name: "Casey".to_string(),
        last_name: "Reed".to_string(),
        email: "casey.reed@example.com".to_string(),
        phone: String::new(),
        location: "Des Moines, IA".to_string(),
        summary: String::new(),
        last_updated: Utc::now(),
        skills: names
            .iter()
            .map(|name| Skill {
                name: (*name).to_string(),
                category: String::new(),
                proficiency: 3,
                years_experience: 2.0,
                highlighted: false,
            })
            .collect(),
        experience: Vec::new(),
        education: Vec::new(),
        credentials: Vec::new(),
    };
    profiles.add(profile).expect("memory store accepts profiles")
}

pub(super) fn ids(listings: &[JobListing]) -> Vec<JobId> {
    listings.iter().map(|listing| listing.id).collect()
}

pub(super) struct UnavailableListingStore;

impl ListingStore for UnavailableListingStore {
    fn get(&self, _id: JobId) -> Result<Option<JobListing>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn all(&self) -> Result<Vec<JobListing>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn add(&self, _listing: NewListing) -> Result<JobListing, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _listing: JobListing) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    fn find_by_source(
        &self,
        _platform: &str,
        _external_id: &str,
    ) -> Result<Option<JobListing>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}
