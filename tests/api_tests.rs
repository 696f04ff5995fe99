use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use mediatrack_api::{
    api::{create_router, AppState},
    error::{AppError, AppResult},
    models::CandidateItem,
    services::{providers::CandidateProvider, CandidatePool},
};

/// Provider serving a fixed list, or failing on every call
struct StaticProvider {
    candidates: Option<Vec<CandidateItem>>,
}

#[async_trait::async_trait]
impl CandidateProvider for StaticProvider {
    async fn fetch_candidates(&self) -> AppResult<Vec<CandidateItem>> {
        self.candidates
            .clone()
            .ok_or_else(|| AppError::ExternalApi("static provider offline".to_string()))
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

fn candidate_pool() -> Vec<CandidateItem> {
    let mut matching = CandidateItem::new("Kaiju No. 8", "Anime");
    matching.genres = vec!["Action".to_string()];
    matching.mal_score = Some(8.2);
    matching.mal_id = Some(100);

    let mut owned = CandidateItem::new("Renamed Show", "Anime");
    owned.mal_id = Some(3);

    let unrelated = CandidateItem::new("Farming Sim", "Game");

    vec![unrelated, owned, matching]
}

fn create_test_app(candidates: Option<Vec<CandidateItem>>) -> Router {
    let provider: Arc<dyn CandidateProvider> = Arc::new(StaticProvider { candidates });
    let state = AppState::in_memory(CandidatePool::new(vec![provider]), 6);
    create_router(state)
}

async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(path);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn seed_liked_collection(app: &Router) {
    for i in 1..=5 {
        let (status, _) = send(
            app,
            "POST",
            "/api/v1/items",
            Some(json!({
                "title": format!("Action Show {}", i),
                "category": "Anime",
                "rating": 8,
                "genres": ["Action"],
                "studios": ["MAPPA"],
                "malId": i
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(Some(Vec::new()));
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app(Some(Vec::new()));
    let id = "7f1c2b7e-1d3a-4a4e-9a57-2d0c6f8e9b10";

    let request = Request::builder()
        .uri("/health")
        .header("x-request-id", id)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers()["x-request-id"], id);
}

#[tokio::test]
async fn test_add_and_list_items() {
    let app = create_test_app(Some(Vec::new()));

    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/items",
        Some(json!({ "title": "Perfect Blue", "category": "Anime", "rating": 9 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["title"], "Perfect Blue");
    assert!(created["id"].is_string());

    let (status, items) = send(&app, "GET", "/api/v1/items", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(items.as_array().unwrap().len(), 1);
    assert_eq!(items[0]["rating"], 9.0);
}

#[tokio::test]
async fn test_add_item_rejects_invalid_rating() {
    let app = create_test_app(Some(Vec::new()));

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/items",
        Some(json!({ "title": "Too Good", "category": "Film", "rating": 11 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Rating"));
}

#[tokio::test]
async fn test_add_item_rejects_blank_title() {
    let app = create_test_app(Some(Vec::new()));

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/items",
        Some(json!({ "title": "  ", "category": "Film" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_add_item_rejects_duplicate_mal_id() {
    let app = create_test_app(Some(Vec::new()));
    let item = json!({ "title": "Frieren", "category": "Anime", "rating": 9, "malId": 52991 });

    let (status, _) = send(&app, "POST", "/api/v1/items", Some(item.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/api/v1/items", Some(item)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("Frieren"));

    let (_, items) = send(&app, "GET", "/api/v1/items", None).await;
    assert_eq!(items.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_added_recommendation_leaves_cached_set() {
    let app = create_test_app(Some(candidate_pool()));
    seed_liked_collection(&app).await;

    let (_, first) = send(&app, "GET", "/api/v1/recommendations", None).await;
    assert_eq!(first["recommendations"][0]["title"], "Kaiju No. 8");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/items",
        Some(json!({ "title": "Kaiju No. 8", "category": "Anime", "malId": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, second) = send(&app, "GET", "/api/v1/recommendations", None).await;
    assert_eq!(second["fromCache"], true);
    let titles: Vec<&str> = second["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Farming Sim"]);
}

#[tokio::test]
async fn test_profile_reflects_liked_items() {
    let app = create_test_app(Some(Vec::new()));
    seed_liked_collection(&app).await;

    let (status, profile) = send(&app, "GET", "/api/v1/profile", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["likedItemCount"], 5);
    assert_eq!(profile["avgRating"], 8.0);
    assert_eq!(profile["genreWeights"]["Action"]["count"], 5);
    assert_eq!(profile["studioWeights"]["MAPPA"]["totalRating"], 40.0);
}

#[tokio::test]
async fn test_recommendations_empty_below_rating_threshold() {
    let app = create_test_app(Some(candidate_pool()));

    let (status, body) = send(&app, "GET", "/api/v1/recommendations", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["recommendations"].as_array().unwrap().is_empty());
    assert_eq!(body["fromCache"], false);
}

#[tokio::test]
async fn test_recommendations_rank_and_filter() {
    let app = create_test_app(Some(candidate_pool()));
    seed_liked_collection(&app).await;

    let (status, body) = send(&app, "GET", "/api/v1/recommendations", None).await;
    assert_eq!(status, StatusCode::OK);

    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0]["title"], "Kaiju No. 8");
    assert_eq!(recs[0]["reason"], "liked genre: Action");
    assert_eq!(recs[0]["source"], "external");
    assert_eq!(recs[1]["title"], "Farming Sim");
    assert_eq!(body["fromCache"], false);

    // Second call within the freshness window is served from cache
    let (_, cached) = send(&app, "GET", "/api/v1/recommendations", None).await;
    assert_eq!(cached["fromCache"], true);
    assert_eq!(cached["recommendations"][0]["title"], "Kaiju No. 8");
    assert_eq!(cached["lastRefresh"], body["lastRefresh"]);
}

#[tokio::test]
async fn test_refresh_recomputes() {
    let app = create_test_app(Some(candidate_pool()));
    seed_liked_collection(&app).await;

    send(&app, "GET", "/api/v1/recommendations", None).await;
    let (status, body) = send(&app, "POST", "/api/v1/recommendations/refresh", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fromCache"], false);
    assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_provider_failure_reports_error_without_cache() {
    let app = create_test_app(None);
    seed_liked_collection(&app).await;

    let (status, body) = send(&app, "POST", "/api/v1/recommendations/refresh", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["recommendations"].as_array().unwrap().is_empty());
    assert!(body["error"].is_string());
}
