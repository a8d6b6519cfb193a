use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::agent::applications::service::{
    ApplicationLifecycleService, Clock, LifecycleConfig, NoopSubmitter, PlatformSubmitter,
    SubmissionError,
};
use crate::agent::domain::{JobListing, NewListing, Profile, ProfileId, Skill};
use crate::agent::gateway::{AiGateway, GatewayError, GatewayOperation, ScriptedGateway};
use crate::agent::memory::{MemoryApplicationStore, MemoryListingStore, MemoryProfileStore};
use crate::agent::store::{ListingStore, ProfileStore};
use crate::agent::Application;

pub(super) type MemoryLifecycle =
    ApplicationLifecycleService<MemoryApplicationStore, MemoryProfileStore, MemoryListingStore>;

/// Movable time source; every test starts from the same fixed instant.
pub(super) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub(super) fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub(super) fn advance(&self, by: chrono::Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

pub(super) fn start_instant() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-02-01T09:00:00Z")
        .expect("valid timestamp")
        .with_timezone(&Utc)
}

/// Always-broken AI collaborator.
pub(super) struct FailingGateway;

impl AiGateway for FailingGateway {
    fn invoke(
        &self,
        _operation: GatewayOperation,
        _payload: &Value,
        timeout: Duration,
    ) -> Result<String, GatewayError> {
        Err(GatewayError::Timeout(timeout))
    }
}

/// Submitter double that accepts everything and records what it saw.
#[derive(Default)]
pub(super) struct RecordingSubmitter {
    pub(super) submitted: Mutex<Vec<crate::agent::domain::ApplicationId>>,
}

impl PlatformSubmitter for RecordingSubmitter {
    fn submit(
        &self,
        application: &Application,
        _listing: &JobListing,
    ) -> Result<bool, SubmissionError> {
        self.submitted.lock().unwrap().push(application.id);
        Ok(true)
    }
}

pub(super) struct Harness {
    pub(super) service: MemoryLifecycle,
    pub(super) applications: Arc<MemoryApplicationStore>,
    pub(super) listings: Arc<MemoryListingStore>,
    pub(super) clock: Arc<ManualClock>,
    pub(super) profile: Profile,
    pub(super) listing: JobListing,
}

pub(super) fn harness() -> Harness {
    harness_with(Arc::new(ScriptedGateway), Arc::new(NoopSubmitter))
}

pub(super) fn harness_with(
    gateway: Arc<dyn AiGateway>,
    submitter: Arc<dyn PlatformSubmitter>,
) -> Harness {
    let applications = Arc::new(MemoryApplicationStore::default());
    let profiles = Arc::new(MemoryProfileStore::default());
    let listings = Arc::new(MemoryListingStore::default());
    let clock = ManualClock::starting_at(start_instant());

    let profile = profiles
        .add(sample_profile())
        .expect("memory store accepts profiles");
    let listing = listings
        .add(sample_listing("Platform Engineer"))
        .expect("memory store accepts drafts");

    let service = ApplicationLifecycleService::new(
        applications.clone(),
        profiles,
        listings.clone(),
        gateway,
        submitter,
        LifecycleConfig::default(),
    )
    .with_clock(clock.clone());

    Harness {
        service,
        applications,
        listings,
        clock,
        profile,
        listing,
    }
}

pub(super) fn sample_listing(title: &str) -> NewListing {
    NewListing {
        title: title.to_string(),
        company: "Harbor Systems".to_string(),
        location: "Remote".to_string(),
        description: "Keep the deployment pipeline healthy.".to_string(),
        job_type: "Full-time".to_string(),
        salary_min: None,
        salary_max: None,
        source: None,
        url: None,
        posted_at: None,
        closes_at: None,
        active: true,
    }
}

fn sample_profile() -> Profile {
    Profile {
        id: ProfileId(0),
        first_name: "Jordan".to_string(),
        last_name: "Avery".to_string(),
        email: "jordan.avery@example.com".to_string(),
        phone: String::new(),
        location: "Des Moines, IA".to_string(),
        summary: String::new(),
        last_updated: Utc::now(),
        skills: vec![Skill {
            name: "Docker".to_string(),
            category: "Infrastructure".to_string(),
            proficiency: 5,
            years_experience: 4.0,
            highlighted: true,
        }],
        experience: Vec::new(),
        education: Vec::new(),
        credentials: Vec::new(),
    }
}
