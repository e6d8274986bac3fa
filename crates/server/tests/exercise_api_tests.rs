//! Integration tests for the exercise and set endpoints.

mod common;

use axum::http::StatusCode;
use common::{TestServer, json_request};
use serde_json::json;

#[tokio::test]
async fn test_exercise_lifecycle_with_sets() {
    let server = TestServer::new().await;

    let (status, body) = json_request(
        &server.router,
        "POST",
        "/api/exercises",
        Some(json!({"name": "Bench Press", "description": "", "muscleGroup": "chest"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());
    assert_eq!(body.as_object().unwrap().len(), 1, "only the id is returned");

    let (status, set) = json_request(
        &server.router,
        "POST",
        &format!("/api/exercises/{id}/sets"),
        Some(json!({"repetitions": 8, "weight": 60})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(set["exerciseId"], id.as_str());
    assert!(set["timestamp"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, body) = json_request(
        &server.router,
        "DELETE",
        &format!("/api/exercises/{id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Exercise deleted successfully");
    assert_eq!(body["setsDeleted"], 1);

    let (status, body) = json_request(
        &server.router,
        "GET",
        &format!("/api/exercises/{id}/sets"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains(&id));
}

#[tokio::test]
async fn test_set_numbers_come_back_typed() {
    let server = TestServer::new().await;
    let id = server.create_exercise("Overhead Press").await;

    let (status, _) = json_request(
        &server.router,
        "POST",
        &format!("/api/exercises/{id}/sets"),
        Some(json!({"repetitions": 10, "weight": 52.5})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, sets) = json_request(
        &server.router,
        "GET",
        &format!("/api/exercises/{id}/sets"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let sets = sets.as_array().unwrap();
    assert_eq!(sets.len(), 1);
    assert!(sets[0]["repetitions"].is_i64());
    assert_eq!(sets[0]["repetitions"].as_i64(), Some(10));
    assert!(sets[0]["weight"].is_f64());
    assert_eq!(sets[0]["weight"].as_f64(), Some(52.5));
}

#[tokio::test]
async fn test_get_includes_set_summary() {
    let server = TestServer::new().await;
    let id = server.create_exercise("Squat").await;

    for (reps, weight) in [(5, 100.0), (3, 120.0)] {
        json_request(
            &server.router,
            "POST",
            &format!("/api/exercises/{id}/sets"),
            Some(json!({"repetitions": reps, "weight": weight})),
        )
        .await;
    }

    let (status, body) =
        json_request(&server.router, "GET", &format!("/api/exercises/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Squat");
    let summary = &body["aggregateSetSummary"];
    assert_eq!(summary["setCount"], 2);
    assert_eq!(summary["totalRepetitions"], 8);
    assert_eq!(summary["totalVolume"].as_f64(), Some(860.0));
    assert_eq!(summary["maxWeight"].as_f64(), Some(120.0));
}

#[tokio::test]
async fn test_list_reflects_writes_immediately() {
    let server = TestServer::new().await;

    let (_, empty) = json_request(&server.router, "GET", "/api/exercises", None).await;
    assert_eq!(empty, json!([]));

    let id = server.create_exercise("Deadlift").await;
    let (_, list) = json_request(&server.router, "GET", "/api/exercises", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, updated) = json_request(
        &server.router,
        "PUT",
        &format!("/api/exercises/{id}"),
        Some(json!({"muscleGroup": "back"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["muscleGroup"], "back");
    assert_eq!(updated["name"], "Deadlift");

    let (_, list) = json_request(&server.router, "GET", "/api/exercises", None).await;
    assert_eq!(list[0]["muscleGroup"], "back");

    json_request(&server.router, "DELETE", &format!("/api/exercises/{id}"), None).await;
    let (_, list) = json_request(&server.router, "GET", "/api/exercises", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_validation_errors_are_bad_requests() {
    let server = TestServer::new().await;

    let (status, body) = json_request(
        &server.router,
        "POST",
        "/api/exercises",
        Some(json!({"description": "no name"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "name is required");
    assert!(body.get("details").is_none());

    let id = server.create_exercise("Row").await;
    let (status, _) = json_request(
        &server.router,
        "POST",
        &format!("/api/exercises/{id}/sets"),
        Some(json!({"repetitions": 8})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = json_request(
        &server.router,
        "POST",
        &format!("/api/exercises/{id}/sets"),
        Some(json!({"repetitions": "eight", "weight": 40})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = json_request(
        &server.router,
        "PUT",
        &format!("/api/exercises/{id}"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let server = TestServer::new().await;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/exercises")
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = common::send(&server.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("invalid JSON"));
}

#[tokio::test]
async fn test_missing_exercise_is_not_found() {
    let server = TestServer::new().await;

    for (method, uri, body) in [
        ("GET", "/api/exercises/ghost", None),
        ("PUT", "/api/exercises/ghost", Some(json!({"name": "x"}))),
        ("DELETE", "/api/exercises/ghost", None),
        (
            "POST",
            "/api/exercises/ghost/sets",
            Some(json!({"repetitions": 1, "weight": 1})),
        ),
    ] {
        let (status, body) = json_request(&server.router, method, uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method} {uri}");
        assert_eq!(body["error"], "exercise ghost not found");
    }
}

#[tokio::test]
async fn test_delete_leaves_other_exercise_sets() {
    let server = TestServer::new().await;
    let bench = server.create_exercise("Bench").await;
    let curl = server.create_exercise("Curl").await;

    for id in [&bench, &bench, &curl] {
        json_request(
            &server.router,
            "POST",
            &format!("/api/exercises/{id}/sets"),
            Some(json!({"repetitions": 10, "weight": 20})),
        )
        .await;
    }

    let (_, body) =
        json_request(&server.router, "DELETE", &format!("/api/exercises/{bench}"), None).await;
    assert_eq!(body["setsDeleted"], 2);

    let (status, sets) = json_request(
        &server.router,
        "GET",
        &format!("/api/exercises/{curl}/sets"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sets.as_array().unwrap().len(), 1);
}
