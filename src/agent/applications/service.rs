use std::cmp::Reverse;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;
use tracing::{debug, info};

use super::domain::{Application, ApplicationStatistics, DocumentKind, GeneratedDocument};
use super::notes::NoteEntry;
use super::status::{AnyTransition, ApplicationStatus, TransitionDenied, TransitionPolicy, UnknownStatus};
use crate::agent::domain::{ApplicationId, JobId, JobListing, ProfileId};
use crate::agent::gateway::{AiGateway, GatewayError, GatewayOperation};
use crate::agent::store::{ApplicationStore, ListingStore, ProfileStore, StoreError};

/// Error raised by the lifecycle service.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    InvalidStatus(#[from] UnknownStatus),
    #[error(transparent)]
    TransitionDenied(#[from] TransitionDenied),
    #[error("invalid request: {0}")]
    Validation(String),
    #[error("generation failed: {0}")]
    Generation(#[from] GatewayError),
    #[error("external submission failed: {0}")]
    Submission(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Time source, injected so tests can move the clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock default.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Platform-specific submission collaborator.
pub trait PlatformSubmitter: Send + Sync {
    fn submit(
        &self,
        application: &Application,
        listing: &JobListing,
    ) -> Result<bool, SubmissionError>;
}

#[derive(Debug, thiserror::Error)]
#[error("platform transport unavailable: {0}")]
pub struct SubmissionError(pub String);

/// Default submitter when no platform integration is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSubmitter;

impl PlatformSubmitter for NoopSubmitter {
    fn submit(
        &self,
        application: &Application,
        _listing: &JobListing,
    ) -> Result<bool, SubmissionError> {
        debug!(application = %application.id, "no platform integration configured");
        Ok(false)
    }
}

/// Tuning values for the lifecycle service.
#[derive(Debug, Clone, Copy)]
pub struct LifecycleConfig {
    /// Open-loop applications untouched for longer than this are surfaced as
    /// follow-up candidates.
    pub follow_up_after: chrono::Duration,
    /// Upper bound on a single AI gateway call.
    pub generation_timeout: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            follow_up_after: chrono::Duration::days(7),
            generation_timeout: Duration::from_secs(30),
        }
    }
}

/// Per-key lock registry.
///
/// Note appends and version assignment are read-modify-write; serializing
/// them per record keeps concurrent writers from silently dropping each
/// other's changes. Entries whose handles have all been dropped are evicted
/// on the next lookup, so the map tracks live contention, not every key
/// ever seen.
struct LockRegistry<K> {
    locks: Mutex<HashMap<K, Arc<Mutex<()>>>>,
}

impl<K: Eq + Hash + Clone> LockRegistry<K> {
    fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }

    fn entry(&self, key: K) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        let lock = locks.entry(key).or_default().clone();
        // Strong count 1 means only the map still holds the entry.
        locks.retain(|_, entry| Arc::strong_count(entry) > 1);
        lock
    }
}

/// Application lifecycle manager.
///
/// Creates applications, enforces status transitions through the injected
/// policy, appends timestamped notes, and computes statistics and follow-up
/// queues. Writes to the same application are serialized; reads never block.
pub struct ApplicationLifecycleService<A, P, L> {
    applications: Arc<A>,
    profiles: Arc<P>,
    listings: Arc<L>,
    gateway: Arc<dyn AiGateway>,
    submitter: Arc<dyn PlatformSubmitter>,
    policy: Arc<dyn TransitionPolicy>,
    clock: Arc<dyn Clock>,
    config: LifecycleConfig,
    record_locks: LockRegistry<ApplicationId>,
    version_locks: LockRegistry<(ProfileId, JobId)>,
}

impl<A, P, L> ApplicationLifecycleService<A, P, L>
where
    A: ApplicationStore,
    P: ProfileStore,
    L: ListingStore,
{
    pub fn new(
        applications: Arc<A>,
        profiles: Arc<P>,
        listings: Arc<L>,
        gateway: Arc<dyn AiGateway>,
        submitter: Arc<dyn PlatformSubmitter>,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            applications,
            profiles,
            listings,
            gateway,
            submitter,
            policy: Arc::new(AnyTransition),
            clock: Arc::new(SystemClock),
            config,
            record_locks: LockRegistry::new(),
            version_locks: LockRegistry::new(),
        }
    }

    /// Replace the permissive default transition policy.
    pub fn with_policy(mut self, policy: Arc<dyn TransitionPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Create an application in the `Applied` state. Both the profile and
    /// the listing must exist.
    pub fn create(
        &self,
        profile_id: ProfileId,
        job_id: JobId,
        resume_version: Option<u32>,
        cover_letter_version: Option<u32>,
        notes: Option<&str>,
    ) -> Result<Application, LifecycleError> {
        if !self.profiles.exists(profile_id)? {
            return Err(LifecycleError::NotFound("profile"));
        }
        if !self.listings.exists(job_id)? {
            return Err(LifecycleError::NotFound("job listing"));
        }

        let now = self.clock.now();
        let mut entries = Vec::new();
        if let Some(body) = notes.map(str::trim).filter(|body| !body.is_empty()) {
            entries.push(NoteEntry {
                at: now,
                status: None,
                body: body.to_string(),
            });
        }

        let stored = self.applications.add(Application {
            id: ApplicationId(0), // assigned by the store
            profile_id,
            job_id,
            applied_at: now,
            status: ApplicationStatus::Applied,
            resume_version,
            cover_letter_version,
            notes: entries,
            last_updated: now,
        })?;
        info!(application = %stored.id, %profile_id, %job_id, "application created");
        Ok(stored)
    }

    /// Move an application to a new status, appending the optional note to
    /// the audit trail. The status string is normalized against the canonical
    /// set; anything unknown is rejected.
    pub fn update_status(
        &self,
        id: ApplicationId,
        status: &str,
        notes: Option<&str>,
    ) -> Result<Application, LifecycleError> {
        let next: ApplicationStatus = status.parse()?;

        let lock = self.record_locks.entry(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut application = self
            .applications
            .get(id)?
            .ok_or(LifecycleError::NotFound("application"))?;
        self.policy.check(application.status, next)?;

        let now = self.clock.now();
        if let Some(body) = notes.map(str::trim).filter(|body| !body.is_empty()) {
            application.notes.push(NoteEntry {
                at: now,
                status: Some(next),
                body: body.to_string(),
            });
        }
        let previous = application.status;
        application.status = next;
        application.last_updated = now;
        self.applications.update(application.clone())?;
        debug!(application = %id, from = previous.label(), to = next.label(), "status updated");
        Ok(application)
    }

    /// Append a free-standing note without changing the status.
    pub fn update_notes(&self, id: ApplicationId, notes: &str) -> Result<Application, LifecycleError> {
        let body = notes.trim();
        if body.is_empty() {
            return Err(LifecycleError::Validation(
                "note text must not be empty".to_string(),
            ));
        }

        let lock = self.record_locks.entry(id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut application = self
            .applications
            .get(id)?
            .ok_or(LifecycleError::NotFound("application"))?;
        let now = self.clock.now();
        application.notes.push(NoteEntry {
            at: now,
            status: None,
            body: body.to_string(),
        });
        application.last_updated = now;
        self.applications.update(application.clone())?;
        Ok(application)
    }

    pub fn application(&self, id: ApplicationId) -> Result<Application, LifecycleError> {
        self.applications
            .get(id)?
            .ok_or(LifecycleError::NotFound("application"))
    }

    /// All applications for a profile, most recent first.
    pub fn for_profile(&self, profile_id: ProfileId) -> Result<Vec<Application>, LifecycleError> {
        let mut applications = self.applications.for_profile(profile_id)?;
        applications.sort_by_key(|application| (Reverse(application.applied_at), application.id));
        Ok(applications)
    }

    /// Applications currently in the given status. The input is normalized,
    /// so legacy spellings and arbitrary casing match their canonical member.
    pub fn by_status(
        &self,
        profile_id: ProfileId,
        status: &str,
    ) -> Result<Vec<Application>, LifecycleError> {
        let wanted: ApplicationStatus = status.parse()?;
        let mut applications = self.for_profile(profile_id)?;
        applications.retain(|application| application.status == wanted);
        Ok(applications)
    }

    pub fn recent(
        &self,
        profile_id: ProfileId,
        count: usize,
    ) -> Result<Vec<Application>, LifecycleError> {
        let mut applications = self.for_profile(profile_id)?;
        applications.truncate(count);
        Ok(applications)
    }

    /// Bucketed counters plus the exact per-status breakdown, recomputed in
    /// one pass over the profile's applications.
    pub fn statistics(&self, profile_id: ProfileId) -> Result<ApplicationStatistics, LifecycleError> {
        let applications = self.applications.for_profile(profile_id)?;
        Ok(ApplicationStatistics::collect(&applications))
    }

    /// Open-loop applications (non-terminal status) whose last update is
    /// older than the configured follow-up threshold, stalest first.
    pub fn follow_ups(&self, profile_id: ProfileId) -> Result<Vec<Application>, LifecycleError> {
        let cutoff = self.clock.now() - self.config.follow_up_after;
        let mut due: Vec<Application> = self
            .applications
            .for_profile(profile_id)?
            .into_iter()
            .filter(|application| {
                !application.status.is_terminal() && application.last_updated < cutoff
            })
            .collect();
        due.sort_by_key(|application| (application.last_updated, application.id));
        Ok(due)
    }

    /// Generate a cover letter for a profile/listing pair and persist it with
    /// the next version number.
    pub fn generate_cover_letter(
        &self,
        profile_id: ProfileId,
        job_id: JobId,
    ) -> Result<GeneratedDocument, LifecycleError> {
        self.generate_document(profile_id, job_id, DocumentKind::CoverLetter)
    }

    /// Generate a resume tailored to a listing and persist it with the next
    /// version number.
    pub fn generate_resume(
        &self,
        profile_id: ProfileId,
        job_id: JobId,
    ) -> Result<GeneratedDocument, LifecycleError> {
        self.generate_document(profile_id, job_id, DocumentKind::Resume)
    }

    fn generate_document(
        &self,
        profile_id: ProfileId,
        job_id: JobId,
        kind: DocumentKind,
    ) -> Result<GeneratedDocument, LifecycleError> {
        let profile = self
            .profiles
            .get(profile_id)?
            .ok_or(LifecycleError::NotFound("profile"))?;
        let listing = self
            .listings
            .get(job_id)?
            .ok_or(LifecycleError::NotFound("job listing"))?;

        let operation = match kind {
            DocumentKind::CoverLetter => GatewayOperation::GenerateCoverLetter,
            DocumentKind::Resume => GatewayOperation::TailorResume,
        };
        let payload = json!({ "profile": profile, "listing": listing });
        // Gateway first: nothing is persisted when generation fails or the
        // call is cancelled by timeout.
        let body = self
            .gateway
            .invoke(operation, &payload, self.config.generation_timeout)?;

        // Version assignment and the document write happen under the same
        // per-(profile, job) lock so concurrent calls never share a version.
        let lock = self.version_locks.entry((profile_id, job_id));
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let version = self
            .applications
            .max_document_version(profile_id, job_id, kind)?
            + 1;
        let document = GeneratedDocument {
            profile_id,
            job_id,
            kind,
            version,
            body,
            created_at: self.clock.now(),
        };
        self.applications.add_document(document.clone())?;
        info!(%profile_id, %job_id, kind = kind.label(), version, "document generated");
        Ok(document)
    }

    /// Interview preparation content for an existing application.
    pub fn interview_prep(&self, id: ApplicationId) -> Result<String, LifecycleError> {
        let application = self.application(id)?;
        let profile = self
            .profiles
            .get(application.profile_id)?
            .ok_or(LifecycleError::NotFound("profile"))?;
        let listing = self
            .listings
            .get(application.job_id)?
            .ok_or(LifecycleError::NotFound("job listing"))?;

        let payload = json!({ "profile": profile, "listing": listing });
        Ok(self.gateway.invoke(
            GatewayOperation::PrepareInterview,
            &payload,
            self.config.generation_timeout,
        )?)
    }

    /// Hand an application to the platform-specific submitter.
    pub fn submit_external(&self, id: ApplicationId) -> Result<bool, LifecycleError> {
        let application = self.application(id)?;
        let listing = self
            .listings
            .get(application.job_id)?
            .ok_or(LifecycleError::NotFound("job listing"))?;
        self.submitter
            .submit(&application, &listing)
            .map_err(|err| LifecycleError::Submission(err.to_string()))
    }
}
