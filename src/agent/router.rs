use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::applications::service::{ApplicationLifecycleService, LifecycleError};
use super::discovery::criteria::{Page, SearchCriteria};
use super::discovery::service::{DiscoveryError, JobDiscoveryService};
use super::domain::{ApplicationId, NewListing, ProfileId};
use super::store::{ApplicationStore, ListingStore, ProfileStore, SavedSearchStore, StoreError};

/// Router builder exposing the matching engine over HTTP.
pub fn discovery_router<L, P, S>(service: Arc<JobDiscoveryService<L, P, S>>) -> Router
where
    L: ListingStore + 'static,
    P: ProfileStore + 'static,
    S: SavedSearchStore + 'static,
{
    Router::new()
        .route("/api/v1/jobs/search", post(search_handler::<L, P, S>))
        .route("/api/v1/jobs", post(save_listing_handler::<L, P, S>))
        .route(
            "/api/v1/profiles/:profile_id/recommendations",
            get(recommendations_handler::<L, P, S>),
        )
        .with_state(service)
}

/// Router builder exposing the lifecycle manager over HTTP.
pub fn application_router<A, P, L>(service: Arc<ApplicationLifecycleService<A, P, L>>) -> Router
where
    A: ApplicationStore + 'static,
    P: ProfileStore + 'static,
    L: ListingStore + 'static,
{
    Router::new()
        .route("/api/v1/applications", post(create_application_handler::<A, P, L>))
        .route(
            "/api/v1/applications/:application_id",
            get(get_application_handler::<A, P, L>),
        )
        .route(
            "/api/v1/applications/:application_id/status",
            post(update_status_handler::<A, P, L>),
        )
        .route(
            "/api/v1/profiles/:profile_id/applications",
            get(list_applications_handler::<A, P, L>),
        )
        .route(
            "/api/v1/profiles/:profile_id/statistics",
            get(statistics_handler::<A, P, L>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchRequest {
    #[serde(flatten)]
    pub(crate) criteria: SearchCriteria,
    #[serde(default = "default_page")]
    pub(crate) page: u32,
    #[serde(default = "default_page_size")]
    pub(crate) page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

const DEFAULT_RECOMMENDATION_COUNT: usize = 10;

#[derive(Debug, Deserialize)]
pub(crate) struct CreateApplicationRequest {
    pub(crate) profile_id: u64,
    pub(crate) job_id: u64,
    #[serde(default)]
    pub(crate) resume_version: Option<u32>,
    #[serde(default)]
    pub(crate) cover_letter_version: Option<u32>,
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdateStatusRequest {
    pub(crate) status: String,
    #[serde(default)]
    pub(crate) notes: Option<String>,
}

pub(crate) async fn search_handler<L, P, S>(
    State(service): State<Arc<JobDiscoveryService<L, P, S>>>,
    Json(request): Json<SearchRequest>,
) -> Response
where
    L: ListingStore + 'static,
    P: ProfileStore + 'static,
    S: SavedSearchStore + 'static,
{
    let page = Page::new(request.page, request.page_size);
    match service.search(&request.criteria, page) {
        Ok(listings) => (StatusCode::OK, Json(listings)).into_response(),
        Err(err) => discovery_error_response(err),
    }
}

pub(crate) async fn save_listing_handler<L, P, S>(
    State(service): State<Arc<JobDiscoveryService<L, P, S>>>,
    Json(draft): Json<NewListing>,
) -> Response
where
    L: ListingStore + 'static,
    P: ProfileStore + 'static,
    S: SavedSearchStore + 'static,
{
    match service.save_listing(draft) {
        Ok(listing) => (StatusCode::CREATED, Json(listing)).into_response(),
        Err(err) => discovery_error_response(err),
    }
}

pub(crate) async fn recommendations_handler<L, P, S>(
    State(service): State<Arc<JobDiscoveryService<L, P, S>>>,
    Path(profile_id): Path<u64>,
) -> Response
where
    L: ListingStore + 'static,
    P: ProfileStore + 'static,
    S: SavedSearchStore + 'static,
{
    match service.recommended(ProfileId(profile_id), DEFAULT_RECOMMENDATION_COUNT) {
        Ok(listings) => (StatusCode::OK, Json(listings)).into_response(),
        Err(err) => discovery_error_response(err),
    }
}

pub(crate) async fn create_application_handler<A, P, L>(
    State(service): State<Arc<ApplicationLifecycleService<A, P, L>>>,
    Json(request): Json<CreateApplicationRequest>,
) -> Response
where
    A: ApplicationStore + 'static,
    P: ProfileStore + 'static,
    L: ListingStore + 'static,
{
    match service.create(
        ProfileId(request.profile_id),
        crate::agent::domain::JobId(request.job_id),
        request.resume_version,
        request.cover_letter_version,
        request.notes.as_deref(),
    ) {
        Ok(application) => (StatusCode::CREATED, Json(application.view())).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

pub(crate) async fn get_application_handler<A, P, L>(
    State(service): State<Arc<ApplicationLifecycleService<A, P, L>>>,
    Path(application_id): Path<u64>,
) -> Response
where
    A: ApplicationStore + 'static,
    P: ProfileStore + 'static,
    L: ListingStore + 'static,
{
    match service.application(ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, Json(application.view())).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

pub(crate) async fn update_status_handler<A, P, L>(
    State(service): State<Arc<ApplicationLifecycleService<A, P, L>>>,
    Path(application_id): Path<u64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Response
where
    A: ApplicationStore + 'static,
    P: ProfileStore + 'static,
    L: ListingStore + 'static,
{
    match service.update_status(
        ApplicationId(application_id),
        &request.status,
        request.notes.as_deref(),
    ) {
        Ok(application) => (StatusCode::OK, Json(application.view())).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

pub(crate) async fn list_applications_handler<A, P, L>(
    State(service): State<Arc<ApplicationLifecycleService<A, P, L>>>,
    Path(profile_id): Path<u64>,
) -> Response
where
    A: ApplicationStore + 'static,
    P: ProfileStore + 'static,
    L: ListingStore + 'static,
{
    match service.for_profile(ProfileId(profile_id)) {
        Ok(applications) => {
            let views: Vec<_> = applications
                .iter()
                .map(super::applications::domain::Application::view)
                .collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(err) => lifecycle_error_response(err),
    }
}

pub(crate) async fn statistics_handler<A, P, L>(
    State(service): State<Arc<ApplicationLifecycleService<A, P, L>>>,
    Path(profile_id): Path<u64>,
) -> Response
where
    A: ApplicationStore + 'static,
    P: ProfileStore + 'static,
    L: ListingStore + 'static,
{
    match service.statistics(ProfileId(profile_id)) {
        Ok(statistics) => (StatusCode::OK, Json(statistics)).into_response(),
        Err(err) => lifecycle_error_response(err),
    }
}

fn discovery_error_response(error: DiscoveryError) -> Response {
    let status = match &error {
        DiscoveryError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DiscoveryError::NotFound(_) => StatusCode::NOT_FOUND,
        DiscoveryError::DuplicateListing { .. } => StatusCode::CONFLICT,
        DiscoveryError::Store(store) => store_status(store),
    };
    error_payload(status, &error.to_string())
}

fn lifecycle_error_response(error: LifecycleError) -> Response {
    let status = match &error {
        LifecycleError::NotFound(_) => StatusCode::NOT_FOUND,
        LifecycleError::InvalidStatus(_) | LifecycleError::Validation(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        LifecycleError::TransitionDenied(_) => StatusCode::CONFLICT,
        LifecycleError::Generation(_) | LifecycleError::Submission(_) => StatusCode::BAD_GATEWAY,
        LifecycleError::Store(store) => store_status(store),
    };
    error_payload(status, &error.to_string())
}

fn store_status(error: &StoreError) -> StatusCode {
    match error {
        StoreError::NotFound => StatusCode::NOT_FOUND,
        StoreError::Conflict => StatusCode::CONFLICT,
        StoreError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_payload(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}
