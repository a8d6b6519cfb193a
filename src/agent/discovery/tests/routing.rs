use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::{build_service, date, draft, profile_with_skills, seed};
use crate::agent::router::discovery_router;

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body is readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

#[tokio::test]
async fn search_endpoint_returns_the_ordered_page() {
    let (service, listings, _, _) = build_service();
    let stored = seed(
        &listings,
        vec![
            draft("Rust Engineer", "", date(2024, 1, 1)),
            draft("Rust Engineer", "", date(2024, 1, 9)),
            draft("Accountant", "", date(2024, 1, 5)),
        ],
    );
    let router = discovery_router(service);

    let response = router
        .oneshot(post_json(
            "/api/v1/jobs/search",
            json!({ "keywords": ["rust"], "page": 1, "page_size": 10 }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|listing| listing["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["Rust Engineer", "Rust Engineer"]);
    assert_eq!(body[0]["id"], json!(stored[1].id.0));
}

#[tokio::test]
async fn search_endpoint_rejects_blank_criteria() {
    let (service, _, _, _) = build_service();
    let router = discovery_router(service);

    let response = router
        .oneshot(post_json("/api/v1/jobs/search", json!({ "keywords": [] })))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json(response).await;
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn listing_endpoint_reports_duplicates_as_conflict() {
    let (service, _, _, _) = build_service();
    let router = discovery_router(service);

    let payload = json!({
        "title": "Rust Engineer",
        "company": "Acme",
        "location": "Remote",
        "description": "",
        "job_type": "Full-time",
        "salary_min": null,
        "salary_max": null,
        "source": { "platform": "LinkedIn", "external_id": "li-9" },
        "url": null,
        "posted_at": null,
        "closes_at": null,
        "active": true,
    });

    let created = router
        .clone()
        .oneshot(post_json("/api/v1/jobs", payload.clone()))
        .await
        .expect("router responds");
    assert_eq!(created.status(), StatusCode::CREATED);

    let duplicate = router
        .oneshot(post_json("/api/v1/jobs", payload))
        .await
        .expect("router responds");
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn recommendations_endpoint_is_empty_for_unknown_profiles() {
    let (service, listings, profiles, _) = build_service();
    seed(
        &listings,
        vec![draft("Platform Engineer", "Docker everywhere", date(2024, 1, 5))],
    );
    let profile = profile_with_skills(&profiles, &["Docker"]);
    let router = discovery_router(service);

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/profiles/{}/recommendations", profile.id.0))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/v1/profiles/999/recommendations")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(0));
}
