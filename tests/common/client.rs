//! HTTP client for end-to-end tests
//!
//! This module provides a high-level HTTP client that wraps reqwest
//! and provides methods for all trinity-server endpoints.
//!
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::Response;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP test client
pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    /// POST /generate with just a prompt
    pub async fn generate(&self, prompt: &str) -> Response {
        self.generate_raw(json!({ "prompt": prompt })).await
    }

    /// POST /generate with a prompt and a request context
    pub async fn generate_with_context(&self, prompt: &str, context: Value) -> Response {
        self.generate_raw(json!({ "prompt": prompt, "context": context }))
            .await
    }

    /// POST /generate with an arbitrary JSON body
    pub async fn generate_raw(&self, body: Value) -> Response {
        self.client
            .post(format!("{}/generate", self.base_url))
            .json(&body)
            .send()
            .await
            .expect("Failed to send generate request")
    }

    /// POST /generate and unwrap the successful response body
    ///
    /// # Panics
    ///
    /// Panics if the request does not come back 200 with `success: true`.
    pub async fn generate_ok(&self, prompt: &str) -> Value {
        let response = self.generate(prompt).await;
        assert_eq!(
            response.status(),
            reqwest::StatusCode::OK,
            "generate failed for prompt {:?}",
            prompt
        );
        let body: Value = response.json().await.expect("generate body was not JSON");
        assert_eq!(body["success"], true, "generate unsuccessful: {}", body);
        body
    }

    /// GET /health
    pub async fn health(&self) -> Response {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .expect("Failed to send health request")
    }

    /// GET /
    pub async fn home(&self) -> Response {
        self.client
            .get(&self.base_url)
            .send()
            .await
            .expect("Failed to send home request")
    }
}
