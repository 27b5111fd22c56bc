use axum::{http::StatusCode, response::IntoResponse};
use lazy_static::lazy_static;
use prometheus::{
    CounterVec, Encoder, Gauge, Histogram, HistogramOpts, HistogramVec, Opts, Registry,
    TextEncoder,
};
use std::time::Duration;

/// Metric name prefix for all Trinity metrics
const PREFIX: &str = "trinity";

lazy_static! {
    // Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Request Metrics
    pub static ref HTTP_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_http_requests_total"), "Total number of HTTP requests"),
        &["method", "path", "status"]
    ).expect("Failed to create http_requests_total metric");

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_http_request_duration_seconds"),
            "HTTP request duration in seconds"
        )
        .buckets(vec![0.005, 0.025, 0.1, 0.5, 1.0, 5.0, 15.0, 30.0, 60.0]),
        &["method", "path"]
    ).expect("Failed to create http_request_duration_seconds metric");

    // Generation Metrics
    pub static ref GENERATIONS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_generations_total"), "Preset generations by outcome"),
        &["outcome"]
    ).expect("Failed to create generations_total metric");

    pub static ref STAGE_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            format!("{PREFIX}_stage_duration_seconds"),
            "Pipeline stage duration in seconds"
        )
        .buckets(vec![0.0005, 0.005, 0.05, 0.25, 1.0, 5.0, 15.0, 30.0, 60.0]),
        &["stage"]
    ).expect("Failed to create stage_duration_seconds metric");

    pub static ref STAGE_DEGRADED_TOTAL: CounterVec = CounterVec::new(
        Opts::new(
            format!("{PREFIX}_stage_degraded_total"),
            "Pipeline stages that fell back instead of completing cleanly"
        ),
        &["stage"]
    ).expect("Failed to create stage_degraded_total metric");

    // LLM Metrics
    pub static ref LLM_CACHE_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_llm_cache_total"), "LLM response cache lookups"),
        &["result"]
    ).expect("Failed to create llm_cache_total metric");

    // Retrieval Metrics
    pub static ref RETRIEVAL_SCORE: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            format!("{PREFIX}_retrieval_score"),
            "Combined score of the winning corpus match"
        )
        .buckets(vec![0.1, 0.25, 0.5, 1.0, 10.0, 20.0, 30.0, 50.0])
    ).expect("Failed to create retrieval_score metric");

    pub static ref CORPUS_ENTRIES: Gauge = Gauge::new(
        format!("{PREFIX}_corpus_entries"),
        "Usable presets in the retrieval corpus"
    ).expect("Failed to create corpus_entries metric");

    // Rate Limiting Metrics
    pub static ref RATE_LIMIT_HITS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_rate_limit_hits_total"), "Rate limit violations"),
        &["endpoint"]
    ).expect("Failed to create rate_limit_hits_total metric");

    // Error Metrics
    pub static ref ERRORS_TOTAL: CounterVec = CounterVec::new(
        Opts::new(format!("{PREFIX}_errors_total"), "Total errors by type and endpoint"),
        &["error_type", "endpoint"]
    ).expect("Failed to create errors_total metric");

    // Process Metrics
    pub static ref PROCESS_MEMORY_BYTES: Gauge = Gauge::new(
        format!("{PREFIX}_process_memory_bytes"),
        "Process memory usage in bytes"
    ).expect("Failed to create process_memory_bytes metric");
}

/// Initialize all metrics and register them with the Prometheus registry
pub fn init_metrics() {
    // Register all metrics - ignore errors if already registered (for tests)
    let _ = REGISTRY.register(Box::new(HTTP_REQUESTS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(GENERATIONS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(STAGE_DURATION_SECONDS.clone()));
    let _ = REGISTRY.register(Box::new(STAGE_DEGRADED_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(LLM_CACHE_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(RETRIEVAL_SCORE.clone()));
    let _ = REGISTRY.register(Box::new(CORPUS_ENTRIES.clone()));
    let _ = REGISTRY.register(Box::new(RATE_LIMIT_HITS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(ERRORS_TOTAL.clone()));
    let _ = REGISTRY.register(Box::new(PROCESS_MEMORY_BYTES.clone()));

    tracing::info!("Metrics system initialized successfully");
}

/// Initialize corpus-specific metrics
pub fn init_corpus_metrics(num_entries: usize) {
    CORPUS_ENTRIES.set(num_entries as f64);

    tracing::info!("Corpus metrics initialized: {} entries", num_entries);
}

/// Record an HTTP request
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration.as_secs_f64());
}

/// Record the outcome of one generation request
pub fn record_generation(outcome: &str) {
    GENERATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

/// Record how long a pipeline stage took
pub fn record_stage_duration(stage: &str, duration: Duration) {
    STAGE_DURATION_SECONDS
        .with_label_values(&[stage])
        .observe(duration.as_secs_f64());
}

/// Record a pipeline stage falling back to its degraded path
pub fn record_stage_degraded(stage: &str) {
    STAGE_DEGRADED_TOTAL.with_label_values(&[stage]).inc();
}

/// Record an LLM cache lookup
pub fn record_llm_cache(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    LLM_CACHE_TOTAL.with_label_values(&[result]).inc();
}

/// Record the winning retrieval score
pub fn record_retrieval_score(score: f64) {
    RETRIEVAL_SCORE.observe(score);
}

/// Record a rate limit hit
pub fn record_rate_limit_hit(endpoint: &str) {
    RATE_LIMIT_HITS_TOTAL.with_label_values(&[endpoint]).inc();
}

/// Record an error
pub fn record_error(error_type: &str, endpoint: &str) {
    ERRORS_TOTAL
        .with_label_values(&[error_type, endpoint])
        .inc();
}

/// Update process memory usage
pub fn update_memory_usage() {
    // Get current process memory usage
    #[cfg(target_os = "linux")]
    {
        if let Ok(status) = std::fs::read_to_string("/proc/self/status") {
            for line in status.lines() {
                if line.starts_with("VmRSS:") {
                    // Parse the RSS (Resident Set Size) in kB
                    if let Some(kb_str) = line.split_whitespace().nth(1) {
                        if let Ok(kb) = kb_str.parse::<f64>() {
                            // Convert kB to bytes
                            PROCESS_MEMORY_BYTES.set(kb * 1024.0);
                            return;
                        }
                    }
                }
            }
        }
    }

    // Fallback for non-Linux systems or if reading fails
    // We'll just not update the metric
}

/// Handler for the /metrics endpoint
pub async fn metrics_handler() -> impl IntoResponse {
    // Update memory usage before returning metrics
    update_memory_usage();

    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let mut buffer = vec![];
    match encoder.encode(&metric_families, &mut buffer) {
        Ok(()) => {
            let response = String::from_utf8(buffer).unwrap_or_else(|_| String::from(""));
            (StatusCode::OK, response)
        }
        Err(e) => {
            tracing::error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        // This test ensures metrics can be initialized without panic
        init_metrics();

        // Verify we can gather metrics
        let metric_families = REGISTRY.gather();
        assert!(!metric_families.is_empty(), "Metrics should be registered");
    }

    #[test]
    fn test_record_http_request() {
        init_metrics();

        record_http_request("POST", "/generate", 200, Duration::from_millis(50));

        let metrics = REGISTRY.gather();
        let http_metrics = metrics
            .iter()
            .find(|m| m.get_name() == "trinity_http_requests_total");

        assert!(http_metrics.is_some(), "HTTP request metrics should exist");
    }

    #[test]
    fn test_record_stage_metrics() {
        init_metrics();

        record_stage_duration("visionary", Duration::from_millis(800));
        record_stage_duration("oracle", Duration::from_micros(120));
        record_stage_degraded("visionary");

        let metrics = REGISTRY.gather();
        assert!(metrics
            .iter()
            .any(|m| m.get_name() == "trinity_stage_duration_seconds"));
        assert!(metrics
            .iter()
            .any(|m| m.get_name() == "trinity_stage_degraded_total"));
    }

    #[test]
    fn test_record_llm_cache() {
        init_metrics();

        record_llm_cache(true);
        record_llm_cache(false);

        let metrics = REGISTRY.gather();
        let cache_metrics = metrics
            .iter()
            .find(|m| m.get_name() == "trinity_llm_cache_total");

        assert!(cache_metrics.is_some(), "LLM cache metrics should exist");
    }

    #[test]
    fn test_record_rate_limit_hit() {
        init_metrics();

        record_rate_limit_hit("/generate");

        let metrics = REGISTRY.gather();
        let rate_limit_metrics = metrics
            .iter()
            .find(|m| m.get_name() == "trinity_rate_limit_hits_total");

        assert!(
            rate_limit_metrics.is_some(),
            "Rate limit metrics should exist"
        );
    }

    #[test]
    fn test_corpus_metrics() {
        init_metrics();

        init_corpus_metrics(150);

        let metrics = REGISTRY.gather();
        let corpus_metrics = metrics
            .iter()
            .find(|m| m.get_name() == "trinity_corpus_entries");

        assert!(corpus_metrics.is_some(), "Corpus metrics should exist");
    }

    #[test]
    fn test_generation_outcomes() {
        init_metrics();

        record_generation("clean");
        record_generation("degraded");
        record_generation("timeout");

        let metrics = REGISTRY.gather();
        assert!(metrics
            .iter()
            .any(|m| m.get_name() == "trinity_generations_total"));
    }
}
