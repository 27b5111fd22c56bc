use super::RequestsLoggingLevel;
use std::time::Duration;

#[derive(Clone)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub metrics_port: u16,
    /// Hard cap on one full pipeline run before the request answers 504.
    pub pipeline_timeout: Duration,
    /// If false, skips the per-IP rate limiter on the generation endpoint.
    /// In-process tests drive the router without a peer address.
    pub rate_limit: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 8000,
            metrics_port: 9091,
            pipeline_timeout: Duration::from_secs(60),
            rate_limit: true,
        }
    }
}
