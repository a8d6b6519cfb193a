//! In-memory storage adapters.
//!
//! Back the demo binary, the default server wiring, and tests. Each adapter
//! is a mutex-guarded map with a sequential identity counter; nothing here is
//! meant to survive a restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use super::applications::domain::{Application, DocumentKind, GeneratedDocument};
use super::domain::{
    ApplicationId, JobId, JobListing, NewListing, Profile, ProfileId, SavedSearch, SavedSearchId,
};
use super::store::{
    ApplicationStore, ListingStore, ProfileStore, SavedSearchStore, StoreError,
};

fn lock_err<T>(_: T) -> StoreError {
    StoreError::Unavailable("store mutex poisoned".to_string())
}

#[derive(Default)]
pub struct MemoryListingStore {
    records: Mutex<HashMap<JobId, JobListing>>,
    sequence: AtomicU64,
}

impl MemoryListingStore {
    fn next_id(&self) -> JobId {
        JobId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl ListingStore for MemoryListingStore {
    fn get(&self, id: JobId) -> Result<Option<JobListing>, StoreError> {
        Ok(self.records.lock().map_err(lock_err)?.get(&id).cloned())
    }

    fn all(&self) -> Result<Vec<JobListing>, StoreError> {
        Ok(self.records.lock().map_err(lock_err)?.values().cloned().collect())
    }

    fn add(&self, listing: NewListing) -> Result<JobListing, StoreError> {
        let stored = listing.into_listing(self.next_id());
        self.records
            .lock()
            .map_err(lock_err)?
            .insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update(&self, listing: JobListing) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(lock_err)?;
        if !records.contains_key(&listing.id) {
            return Err(StoreError::NotFound);
        }
        records.insert(listing.id, listing);
        Ok(())
    }

    fn find_by_source(
        &self,
        platform: &str,
        external_id: &str,
    ) -> Result<Option<JobListing>, StoreError> {
        let records = self.records.lock().map_err(lock_err)?;
        Ok(records
            .values()
            .find(|listing| {
                listing.source.as_ref().is_some_and(|source| {
                    source.platform.eq_ignore_ascii_case(platform)
                        && source.external_id == external_id
                })
            })
            .cloned())
    }
}

#[derive(Default)]
pub struct MemoryProfileStore {
    records: Mutex<HashMap<ProfileId, Profile>>,
    sequence: AtomicU64,
}

impl ProfileStore for MemoryProfileStore {
    fn get(&self, id: ProfileId) -> Result<Option<Profile>, StoreError> {
        Ok(self.records.lock().map_err(lock_err)?.get(&id).cloned())
    }

    fn add(&self, mut profile: Profile) -> Result<Profile, StoreError> {
        profile.id = ProfileId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        self.records
            .lock()
            .map_err(lock_err)?
            .insert(profile.id, profile.clone());
        Ok(profile)
    }

    fn update(&self, profile: Profile) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(lock_err)?;
        if !records.contains_key(&profile.id) {
            return Err(StoreError::NotFound);
        }
        records.insert(profile.id, profile);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryApplicationStore {
    records: Mutex<HashMap<ApplicationId, Application>>,
    documents: Mutex<Vec<GeneratedDocument>>,
    sequence: AtomicU64,
}

impl ApplicationStore for MemoryApplicationStore {
    fn get(&self, id: ApplicationId) -> Result<Option<Application>, StoreError> {
        Ok(self.records.lock().map_err(lock_err)?.get(&id).cloned())
    }

    fn add(&self, mut application: Application) -> Result<Application, StoreError> {
        application.id = ApplicationId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        self.records
            .lock()
            .map_err(lock_err)?
            .insert(application.id, application.clone());
        Ok(application)
    }

    fn update(&self, application: Application) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(lock_err)?;
        if !records.contains_key(&application.id) {
            return Err(StoreError::NotFound);
        }
        records.insert(application.id, application);
        Ok(())
    }

    fn for_profile(&self, profile_id: ProfileId) -> Result<Vec<Application>, StoreError> {
        Ok(self
            .records
            .lock()
            .map_err(lock_err)?
            .values()
            .filter(|application| application.profile_id == profile_id)
            .cloned()
            .collect())
    }

    fn add_document(&self, document: GeneratedDocument) -> Result<(), StoreError> {
        self.documents.lock().map_err(lock_err)?.push(document);
        Ok(())
    }

    fn max_document_version(
        &self,
        profile_id: ProfileId,
        job_id: JobId,
        kind: DocumentKind,
    ) -> Result<u32, StoreError> {
        Ok(self
            .documents
            .lock()
            .map_err(lock_err)?
            .iter()
            .filter(|doc| {
                doc.profile_id == profile_id && doc.job_id == job_id && doc.kind == kind
            })
            .map(|doc| doc.version)
            .max()
            .unwrap_or(0))
    }
}

#[derive(Default)]
pub struct MemorySavedSearchStore {
    records: Mutex<HashMap<SavedSearchId, SavedSearch>>,
    sequence: AtomicU64,
}

impl SavedSearchStore for MemorySavedSearchStore {
    fn get(&self, id: SavedSearchId) -> Result<Option<SavedSearch>, StoreError> {
        Ok(self.records.lock().map_err(lock_err)?.get(&id).cloned())
    }

    fn add(&self, mut search: SavedSearch) -> Result<SavedSearch, StoreError> {
        search.id = SavedSearchId(self.sequence.fetch_add(1, Ordering::Relaxed) + 1);
        self.records
            .lock()
            .map_err(lock_err)?
            .insert(search.id, search.clone());
        Ok(search)
    }

    fn update(&self, search: SavedSearch) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(lock_err)?;
        if !records.contains_key(&search.id) {
            return Err(StoreError::NotFound);
        }
        records.insert(search.id, search);
        Ok(())
    }

    fn for_profile(&self, profile_id: ProfileId) -> Result<Vec<SavedSearch>, StoreError> {
        let mut searches: Vec<SavedSearch> = self
            .records
            .lock()
            .map_err(lock_err)?
            .values()
            .filter(|search| search.profile_id == profile_id)
            .cloned()
            .collect();
        searches.sort_by_key(|search| search.id);
        Ok(searches)
    }

    fn delete(&self, id: SavedSearchId) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(lock_err)?;
        records.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
