//! End-to-end tests for the service metadata and health endpoints

mod common;

use common::{TestClient, TestServer};
use reqwest::StatusCode;
use serde_json::Value;

// =============================================================================
// Service Metadata Tests
// =============================================================================

#[tokio::test]
async fn test_home_returns_service_metadata() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.home().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["service"], env!("CARGO_PKG_NAME"));
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime"].as_str().unwrap().contains(':'));
    assert!(!body["hash"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client
        .client
        .get(format!("{}/presets", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Health Tests
// =============================================================================

#[tokio::test]
async fn test_health_degraded_without_model_or_corpus() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.health().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "degraded");

    let components = &body["components"];
    assert!(components["llm"].as_str().unwrap().starts_with("degraded"));
    assert!(components["corpus"].as_str().unwrap().starts_with("degraded"));
    assert!(components["catalog"].as_str().unwrap().starts_with("ok"));
}

#[tokio::test]
async fn test_health_ok_with_model_and_corpus() {
    let server = TestServer::spawn_scripted_with_corpus(Vec::new()).await;
    let client = TestClient::new(server.base_url.clone());

    let response = client.health().await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let components = &body["components"];
    assert!(components["llm"].as_str().unwrap().contains("scripted"));
    assert!(components["corpus"].as_str().unwrap().contains("3 presets"));
}

#[tokio::test]
async fn test_health_survives_generation_traffic() {
    let server = TestServer::spawn().await;
    let client = TestClient::new(server.base_url.clone());

    client.generate_ok("late night radio static").await;
    let response = client.health().await;
    assert_eq!(response.status(), StatusCode::OK);
}
