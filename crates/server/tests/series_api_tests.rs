//! Integration tests for the series log.

mod common;

use axum::http::StatusCode;
use common::{TestServer, json_request};
use serde_json::json;

#[tokio::test]
async fn test_series_crud() {
    let server = TestServer::new().await;

    let (status, created) = json_request(
        &server.router,
        "POST",
        "/api/series",
        Some(json!({"exerciseId": "e1", "repetitions": 5, "weight": 102.5, "date": "2024-03-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["weight"].as_f64(), Some(102.5));

    let (status, fetched) =
        json_request(&server.router, "GET", &format!("/api/series/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = json_request(
        &server.router,
        "PUT",
        &format!("/api/series/{id}"),
        Some(json!({"repetitions": 6})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["repetitions"], 6);
    assert_eq!(updated["date"], "2024-03-01");

    let (status, body) =
        json_request(&server.router, "DELETE", &format!("/api/series/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Series deleted successfully");

    let (_, list) = json_request(&server.router, "GET", "/api/series", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_series_validation_and_missing_rows() {
    let server = TestServer::new().await;

    let (status, _) = json_request(
        &server.router,
        "POST",
        "/api/series",
        Some(json!({"repetitions": 5, "weight": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = json_request(
        &server.router,
        "PUT",
        "/api/series/ghost",
        Some(json!({"weight": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = json_request(&server.router, "DELETE", "/api/series/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
