use super::applications::domain::{Application, DocumentKind, GeneratedDocument};
use super::domain::{
    ApplicationId, JobId, JobListing, NewListing, Profile, ProfileId, SavedSearch, SavedSearchId,
};

/// Error enumeration for storage adapter failures.
///
/// The engine translates these into its own taxonomy and never retries;
/// retry policy belongs to the adapter itself.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("record already exists")]
    Conflict,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Query surface over job listings.
///
/// `all` returns a full snapshot and the engine filters client-side. That is
/// a known scalability ceiling; a production adapter should push the
/// substring filters down instead.
pub trait ListingStore: Send + Sync {
    fn get(&self, id: JobId) -> Result<Option<JobListing>, StoreError>;
    fn all(&self) -> Result<Vec<JobListing>, StoreError>;
    /// Persist a draft, assigning its identity.
    fn add(&self, listing: NewListing) -> Result<JobListing, StoreError>;
    /// Full update of an existing listing; `NotFound` when absent.
    fn update(&self, listing: JobListing) -> Result<(), StoreError>;
    fn find_by_source(
        &self,
        platform: &str,
        external_id: &str,
    ) -> Result<Option<JobListing>, StoreError>;

    fn exists(&self, id: JobId) -> Result<bool, StoreError> {
        Ok(self.get(id)?.is_some())
    }
}

/// Query surface over profiles and their skill sets.
pub trait ProfileStore: Send + Sync {
    fn get(&self, id: ProfileId) -> Result<Option<Profile>, StoreError>;
    /// Persist a profile, assigning its identity (the input id is ignored).
    fn add(&self, profile: Profile) -> Result<Profile, StoreError>;
    fn update(&self, profile: Profile) -> Result<(), StoreError>;

    fn exists(&self, id: ProfileId) -> Result<bool, StoreError> {
        Ok(self.get(id)?.is_some())
    }
}

/// Query surface over application records, keyed by profile.
///
/// Generated documents live here too: they are lifecycle-owned artifacts of
/// a (profile, job) pair and share the application store's consistency scope.
pub trait ApplicationStore: Send + Sync {
    fn get(&self, id: ApplicationId) -> Result<Option<Application>, StoreError>;
    /// Persist an application, assigning its identity (the input id is ignored).
    fn add(&self, application: Application) -> Result<Application, StoreError>;
    fn update(&self, application: Application) -> Result<(), StoreError>;
    fn for_profile(&self, profile_id: ProfileId) -> Result<Vec<Application>, StoreError>;

    fn add_document(&self, document: GeneratedDocument) -> Result<(), StoreError>;
    /// Highest stored version for the (profile, job, kind) triple, 0 when none.
    fn max_document_version(
        &self,
        profile_id: ProfileId,
        job_id: JobId,
        kind: DocumentKind,
    ) -> Result<u32, StoreError>;

    fn exists(&self, id: ApplicationId) -> Result<bool, StoreError> {
        Ok(self.get(id)?.is_some())
    }
}

/// CRUD surface over saved searches.
pub trait SavedSearchStore: Send + Sync {
    fn get(&self, id: SavedSearchId) -> Result<Option<SavedSearch>, StoreError>;
    /// Persist a saved search, assigning its identity (the input id is ignored).
    fn add(&self, search: SavedSearch) -> Result<SavedSearch, StoreError>;
    fn update(&self, search: SavedSearch) -> Result<(), StoreError>;
    fn for_profile(&self, profile_id: ProfileId) -> Result<Vec<SavedSearch>, StoreError>;
    fn delete(&self, id: SavedSearchId) -> Result<(), StoreError>;
}
