//! Rate limiting middleware using tower-governor
//!
//! The generation endpoint fans out to a paid LLM API and runs a full
//! retrieval pass per request, so it is limited per client IP. The rest of
//! the surface (health, metadata) is cheap and stays unlimited.

use crate::server::metrics::record_rate_limit_hit;
use axum::{
    extract::{ConnectInfo, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tower_governor::{key_extractor::KeyExtractor, GovernorError};
use tracing::warn;

/// Seconds until one generation slot is replenished (30 requests per minute
/// per IP at a sustained rate)
pub const GENERATE_REPLENISH_SECONDS: u64 = 2;

/// Generation requests a single IP may burst before the replenish rate
/// applies
pub const GENERATE_BURST_SIZE: u32 = 10;

/// Extracts the client IP address from ConnectInfo for IP-based rate limiting
#[derive(Clone)]
pub struct IpKeyExtractor;

impl KeyExtractor for IpKeyExtractor {
    type Key = SocketAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr)
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Logs rate limit violations and turns governor errors into responses
pub fn rate_limit_error_handler(err: GovernorError) -> Response {
    match err {
        GovernorError::TooManyRequests { wait_time, .. } => {
            warn!(
                "Rate limit exceeded on generation endpoint, next slot in {}s",
                wait_time
            );
            record_rate_limit_hit("/generate");

            StatusCode::TOO_MANY_REQUESTS.into_response()
        }
        _ => {
            warn!("Rate limiting error: {:?}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
