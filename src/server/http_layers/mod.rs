mod random_slowdown;
mod rate_limit;
mod requests_logging;

#[cfg(feature = "slowdown")]
pub use random_slowdown::slowdown_request;
pub use rate_limit::{
    rate_limit_error_handler, IpKeyExtractor, GENERATE_BURST_SIZE, GENERATE_REPLENISH_SECONDS,
};
pub use requests_logging::{log_requests, RequestsLoggingLevel};
