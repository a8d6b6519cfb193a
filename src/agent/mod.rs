//! Job matching, recommendation, and application lifecycle engine.
//!
//! Storage and AI generation are collaborators behind the traits in
//! [`store`] and [`gateway`]; the engine owns the matching semantics, the
//! status state machine, and the derived statistics, nothing else.

pub mod applications;
pub mod discovery;
pub mod domain;
pub mod gateway;
pub mod memory;
pub mod profile;
pub mod router;
pub mod store;

pub use applications::domain::{
    Application, ApplicationStatistics, ApplicationView, DocumentKind, GeneratedDocument,
};
pub use applications::notes::{render_notes, NoteEntry};
pub use applications::service::{
    ApplicationLifecycleService, Clock, LifecycleConfig, LifecycleError, NoopSubmitter,
    PlatformSubmitter, SubmissionError, SystemClock,
};
pub use applications::status::{
    AnyTransition, ApplicationStatus, NoReopenPolicy, TransitionDenied, TransitionPolicy,
    UnknownStatus,
};
pub use discovery::criteria::{Page, SearchCriteria};
pub use discovery::ingest::{import_listings, ImportSummary, IngestError};
pub use discovery::service::{DiscoveryError, JobDiscoveryService};
pub use domain::{
    ApplicationId, Education, JobId, JobListing, ListingSource, NewListing, PlatformCredential,
    Profile, ProfileId, SavedSearch, SavedSearchId, Skill, WorkExperience,
};
pub use gateway::{AiGateway, GatewayError, GatewayOperation, ScriptedGateway};
pub use memory::{
    MemoryApplicationStore, MemoryListingStore, MemoryProfileStore, MemorySavedSearchStore,
};
pub use profile::{ProfileError, ProfileService};
pub use router::{application_router, discovery_router};
pub use store::{
    ApplicationStore, ListingStore, ProfileStore, SavedSearchStore, StoreError,
};
