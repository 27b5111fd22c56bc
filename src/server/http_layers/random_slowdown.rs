//! Random slowdown middleware
#![allow(dead_code)] // Only wired in with the slowdown feature

use axum::{body::Body, http::Request, middleware::Next, response::IntoResponse};
use rand::Rng;
use std::time::Duration;
use tracing::debug;

const MIN_DELAY_MS: u64 = 50;
const MAX_DELAY_MS: u64 = 1500;

/// Delays every request by a random amount, for exercising client timeout
/// and loading states against a local server.
pub async fn slowdown_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let delay_ms = rand::rng().random_range(MIN_DELAY_MS..=MAX_DELAY_MS);
    debug!("Slowing down request by {}ms", delay_ms);
    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    next.run(request).await
}
