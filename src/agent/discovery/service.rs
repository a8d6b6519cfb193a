use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::debug;

use super::criteria::{contains_ci, sort_by_recency, Page, SearchCriteria};
use crate::agent::domain::{
    JobId, JobListing, NewListing, ProfileId, SavedSearch, SavedSearchId,
};
use crate::agent::store::{ListingStore, ProfileStore, SavedSearchStore, StoreError};

/// Error raised by the discovery service.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("invalid search request: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("listing already ingested from {platform} as {external_id}")]
    DuplicateListing { platform: String, external_id: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Matching and ranking engine over job listings.
///
/// Produces ordered, paginated, deduplicated listing sets from explicit
/// criteria or from a profile's skills. Loads full snapshots from the listing
/// store and filters client-side; see the note on [`ListingStore::all`].
pub struct JobDiscoveryService<L, P, S> {
    listings: Arc<L>,
    profiles: Arc<P>,
    searches: Arc<S>,
}

impl<L, P, S> JobDiscoveryService<L, P, S>
where
    L: ListingStore,
    P: ProfileStore,
    S: SavedSearchStore,
{
    pub fn new(listings: Arc<L>, profiles: Arc<P>, searches: Arc<S>) -> Self {
        Self {
            listings,
            profiles,
            searches,
        }
    }

    /// Keyword search: a listing qualifies when any keyword appears in its
    /// title or description (case-insensitive substring), intersected with
    /// the location/job-type/platform filters when given.
    pub fn search(
        &self,
        criteria: &SearchCriteria,
        page: Page,
    ) -> Result<Vec<JobListing>, DiscoveryError> {
        page.validate().map_err(DiscoveryError::Validation)?;
        criteria.validate().map_err(DiscoveryError::Validation)?;

        let mut matched: Vec<JobListing> = self
            .listings
            .all()?
            .into_iter()
            .filter(|listing| criteria.matches(listing))
            .collect();
        sort_by_recency(&mut matched);
        Ok(page.slice(matched))
    }

    /// Location search. The radius is accepted for interface compatibility
    /// but the baseline performs substring containment on the location
    /// string; geodistance filtering is out of scope for this engine.
    pub fn by_location(
        &self,
        location: &str,
        _radius_miles: u32,
        page: Page,
    ) -> Result<Vec<JobListing>, DiscoveryError> {
        page.validate().map_err(DiscoveryError::Validation)?;
        if location.trim().is_empty() {
            return Err(DiscoveryError::Validation(
                "location must not be empty".to_string(),
            ));
        }

        let mut matched: Vec<JobListing> = self
            .listings
            .all()?
            .into_iter()
            .filter(|listing| contains_ci(&listing.location, location))
            .collect();
        sort_by_recency(&mut matched);
        Ok(page.slice(matched))
    }

    /// Recommendations for a profile: the union of listings whose description
    /// mentions any of the profile's skills, deduplicated by identity and
    /// ordered by recency alone. A listing matching several skills appears
    /// once; match count does not influence rank. An unknown profile or a
    /// profile without skills yields an empty set, not an error.
    pub fn recommended(
        &self,
        profile_id: ProfileId,
        count: usize,
    ) -> Result<Vec<JobListing>, DiscoveryError> {
        let Some(profile) = self.profiles.get(profile_id)? else {
            debug!(%profile_id, "recommendations requested for unknown profile");
            return Ok(Vec::new());
        };

        let skill_names: Vec<String> = profile
            .skills
            .iter()
            .map(|skill| skill.name.clone())
            .collect();
        let mut matched = self.union_by_skill_mentions(&skill_names)?;
        sort_by_recency(&mut matched);
        matched.truncate(count);
        Ok(matched)
    }

    /// Same union/dedup pattern as [`Self::recommended`], keyed by explicit
    /// skill names instead of a profile.
    pub fn by_required_skills(
        &self,
        skill_names: &[String],
    ) -> Result<Vec<JobListing>, DiscoveryError> {
        let mut matched = self.union_by_skill_mentions(skill_names)?;
        sort_by_recency(&mut matched);
        Ok(matched)
    }

    fn union_by_skill_mentions(
        &self,
        skill_names: &[String],
    ) -> Result<Vec<JobListing>, DiscoveryError> {
        let all = self.listings.all()?;
        let mut seen: HashSet<JobId> = HashSet::new();
        let mut matched = Vec::new();
        for name in skill_names {
            if name.trim().is_empty() {
                continue;
            }
            for listing in &all {
                if contains_ci(&listing.description, name) && seen.insert(listing.id) {
                    matched.push(listing.clone());
                }
            }
        }
        Ok(matched)
    }

    pub fn listing(&self, id: JobId) -> Result<JobListing, DiscoveryError> {
        self.listings
            .get(id)?
            .ok_or(DiscoveryError::NotFound("listing"))
    }

    /// Persist a new listing. When the draft carries a platform source, the
    /// (platform, external id) pair must be unused; re-ingesting the same
    /// external posting is rejected instead of silently duplicated.
    pub fn save_listing(&self, draft: NewListing) -> Result<JobListing, DiscoveryError> {
        if let Some(source) = &draft.source {
            if self
                .listings
                .find_by_source(&source.platform, &source.external_id)?
                .is_some()
            {
                return Err(DiscoveryError::DuplicateListing {
                    platform: source.platform.clone(),
                    external_id: source.external_id.clone(),
                });
            }
        }
        let stored = self.listings.add(draft)?;
        debug!(listing = %stored.id, title = %stored.title, "listing saved");
        Ok(stored)
    }

    /// Full update of an existing listing.
    pub fn update_listing(&self, listing: JobListing) -> Result<JobListing, DiscoveryError> {
        match self.listings.update(listing.clone()) {
            Ok(()) => Ok(listing),
            Err(StoreError::NotFound) => Err(DiscoveryError::NotFound("listing")),
            Err(err) => Err(err.into()),
        }
    }

    pub fn deactivate_listing(&self, id: JobId) -> Result<(), DiscoveryError> {
        let mut listing = self.listing(id)?;
        listing.active = false;
        self.listings.update(listing)?;
        Ok(())
    }

    pub fn create_saved_search(
        &self,
        profile_id: ProfileId,
        name: &str,
        criteria: SearchCriteria,
        notify: bool,
        notify_every_days: Option<u32>,
    ) -> Result<SavedSearch, DiscoveryError> {
        criteria.validate().map_err(DiscoveryError::Validation)?;
        if !self.profiles.exists(profile_id)? {
            return Err(DiscoveryError::NotFound("profile"));
        }

        let search = SavedSearch {
            id: SavedSearchId(0), // assigned by the store
            profile_id,
            name: name.to_string(),
            keywords: criteria.keywords,
            location: criteria.location,
            job_type: criteria.job_type,
            platforms: criteria.platforms.unwrap_or_default(),
            created_at: Utc::now(),
            notify,
            notify_every_days,
            last_executed: None,
        };
        Ok(self.searches.add(search)?)
    }

    pub fn saved_searches(&self, profile_id: ProfileId) -> Result<Vec<SavedSearch>, DiscoveryError> {
        Ok(self.searches.for_profile(profile_id)?)
    }

    pub fn delete_saved_search(&self, id: SavedSearchId) -> Result<(), DiscoveryError> {
        match self.searches.delete(id) {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound) => Err(DiscoveryError::NotFound("saved search")),
            Err(err) => Err(err.into()),
        }
    }

    /// Execute a saved search through [`Self::search`] and stamp its
    /// last-executed time. Scheduling is the caller's concern.
    pub fn run_saved_search(
        &self,
        id: SavedSearchId,
        page: Page,
    ) -> Result<Vec<JobListing>, DiscoveryError> {
        let mut search = self
            .searches
            .get(id)?
            .ok_or(DiscoveryError::NotFound("saved search"))?;

        let criteria = SearchCriteria {
            keywords: search.keywords.clone(),
            location: search.location.clone(),
            job_type: search.job_type.clone(),
            platforms: if search.platforms.is_empty() {
                None
            } else {
                Some(search.platforms.clone())
            },
        };
        let results = self.search(&criteria, page)?;

        search.last_executed = Some(Utc::now());
        self.searches.update(search)?;
        Ok(results)
    }
}
