use anyhow::{anyhow, Result};
use std::{
    collections::BTreeMap,
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::{error, info};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};

#[cfg(feature = "slowdown")]
use super::slowdown_request;
use super::{
    log_requests, metrics, rate_limit_error_handler, state::*, IpKeyExtractor,
    RequestsLoggingLevel, ServerConfig, GENERATE_BURST_SIZE, GENERATE_REPLENISH_SECONDS,
};
use crate::pipeline::{GenerateOptions, PipelineError};
use crate::preset::{to_plugin_params, Preset, PresetSource};

const GENERATE_ENDPOINT: &str = "/generate";

/// How long the health endpoint waits on the model before calling it degraded.
const LLM_HEALTH_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Serialize)]
struct ServerStats {
    pub service: String,
    pub version: String,
    pub uptime: String,
    pub hash: String,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct GenerateBody {
    pub prompt: String,
    pub context: Option<GenerateContext>,
}

#[derive(Deserialize, Debug)]
struct GenerateContext {
    pub blend: Option<u32>,
}

#[derive(Serialize)]
struct GenerateResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    preset: Option<PresetPayload>,
    message: String,
}

/// Wire shape of a finished preset, with the slot state flattened to the
/// parameter map the plugin loads directly.
#[derive(Serialize)]
struct PresetPayload {
    name: String,
    vibe: String,
    source: PresetSource,
    signal_flow: String,
    validation_warnings: Vec<String>,
    parameters: BTreeMap<String, f32>,
}

impl PresetPayload {
    fn from_preset(preset: &Preset) -> Self {
        Self {
            name: preset.name.clone(),
            vibe: preset.vibe.clone(),
            source: preset.source,
            signal_flow: preset.signal_flow.clone(),
            validation_warnings: preset.validation_warnings.clone(),
            parameters: to_plugin_params(preset),
        }
    }
}

fn failure(status: StatusCode, message: &str) -> Response {
    let body = GenerateResponse {
        success: false,
        preset: None,
        message: message.to_owned(),
    };
    (status, Json(body)).into_response()
}

/// Distinct stage names carried in warning prefixes, in emission order.
fn degraded_stages(warnings: &[String]) -> Vec<String> {
    let mut stages = Vec::new();
    for warning in warnings {
        let Some((stage, _)) = warning.split_once(':') else {
            continue;
        };
        let stage = stage.trim().to_owned();
        if !stages.contains(&stage) {
            stages.push(stage);
        }
    }
    stages
}

async fn generate(
    State(pipeline): State<GuardedPipeline>,
    State(catalog): State<GuardedCatalog>,
    State(config): State<ServerConfig>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> Response {
    let Ok(Json(body)) = body else {
        metrics::record_generation("rejected");
        return failure(
            StatusCode::BAD_REQUEST,
            "Body must be JSON with a string 'prompt' field",
        );
    };

    let options = GenerateOptions {
        blend: body
            .context
            .as_ref()
            .and_then(|context| context.blend)
            .map(|blend| blend as usize),
    };

    let outcome = tokio::time::timeout(
        config.pipeline_timeout,
        pipeline.generate(&body.prompt, &options),
    )
    .await;

    let report = match outcome {
        Err(_) => {
            error!("Generation timed out after {:?}", config.pipeline_timeout);
            metrics::record_generation("timeout");
            metrics::record_error("timeout", GENERATE_ENDPOINT);
            return failure(StatusCode::GATEWAY_TIMEOUT, "Generation timed out");
        }
        Ok(Err(PipelineError::EmptyPrompt)) => {
            metrics::record_generation("rejected");
            return failure(StatusCode::BAD_REQUEST, "Prompt must not be empty");
        }
        Ok(Ok(report)) => report,
    };

    // A response that the plugin cannot load is a server bug, not a degraded run.
    let issues = report.preset.validate(&catalog);
    if !issues.is_empty() {
        error!("Generated preset failed validation: {}", issues.join("; "));
        metrics::record_generation("error");
        metrics::record_error("invalid_preset", GENERATE_ENDPOINT);
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Generation produced an unusable preset",
        );
    }

    let message = if report.degraded {
        metrics::record_generation("degraded");
        format!(
            "Generated '{}', degraded stages: {}",
            report.preset.name,
            degraded_stages(&report.stage_warnings).join(", ")
        )
    } else {
        metrics::record_generation("clean");
        format!("Generated '{}'", report.preset.name)
    };

    let body = GenerateResponse {
        success: true,
        preset: Some(PresetPayload::from_preset(&report.preset)),
        message,
    };
    (StatusCode::OK, Json(body)).into_response()
}

#[derive(Serialize)]
struct HealthReport {
    status: String,
    components: HealthComponents,
}

#[derive(Serialize)]
struct HealthComponents {
    catalog: String,
    corpus: String,
    llm: String,
}

async fn health(State(state): State<ServerState>) -> Json<HealthReport> {
    let provider = state.pipeline.visionary().provider();
    let llm = match tokio::time::timeout(LLM_HEALTH_TIMEOUT, provider.health_check()).await {
        Ok(Ok(())) => format!("ok ({} {})", provider.name(), provider.model()),
        Ok(Err(err)) => format!("degraded: {}", err),
        Err(_) => "degraded: health check timed out".to_owned(),
    };
    let corpus = if state.corpus_entries > 0 {
        format!("ok ({} presets)", state.corpus_entries)
    } else {
        "degraded: empty, synthesizing defaults".to_owned()
    };
    let catalog = format!("ok ({} engines)", state.catalog.len());

    // A dead model or an empty corpus degrades answers but never blocks them.
    let status = if llm.starts_with("ok") && corpus.starts_with("ok") {
        "ok"
    } else {
        "degraded"
    };
    Json(HealthReport {
        status: status.to_owned(),
        components: HealthComponents {
            catalog,
            corpus,
            llm,
        },
    })
}

async fn home(State(state): State<ServerState>) -> Json<ServerStats> {
    Json(ServerStats {
        service: env!("CARGO_PKG_NAME").to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        uptime: format_uptime(state.start_time.elapsed()),
        hash: state.hash.clone(),
    })
}

impl ServerState {
    fn new(
        config: ServerConfig,
        catalog: GuardedCatalog,
        pipeline: GuardedPipeline,
        corpus_entries: usize,
    ) -> ServerState {
        ServerState {
            config,
            start_time: Instant::now(),
            catalog,
            pipeline,
            corpus_entries,
            hash: env!("GIT_HASH").to_owned(),
        }
    }
}

pub fn make_app(
    config: ServerConfig,
    catalog: GuardedCatalog,
    pipeline: GuardedPipeline,
    corpus_entries: usize,
) -> Result<Router> {
    let rate_limit = config.rate_limit;
    let state = ServerState::new(config, catalog, pipeline, corpus_entries);

    let mut generate_routes: Router = Router::new()
        .route(GENERATE_ENDPOINT, post(generate))
        .with_state(state.clone());
    if rate_limit {
        let governor_conf = Arc::new(
            GovernorConfigBuilder::default()
                .key_extractor(IpKeyExtractor)
                .per_second(GENERATE_REPLENISH_SECONDS)
                .burst_size(GENERATE_BURST_SIZE)
                .finish()
                .ok_or_else(|| anyhow!("Invalid rate limiter configuration"))?,
        );
        generate_routes = generate_routes
            .layer(GovernorLayer::new(governor_conf).error_handler(rate_limit_error_handler));
    }

    let meta_routes: Router = Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .with_state(state.clone());

    #[allow(unused_mut)]
    let mut app: Router = meta_routes.merge(generate_routes);

    #[cfg(feature = "slowdown")]
    {
        app = app.layer(middleware::from_fn(slowdown_request));
    }
    app = app.layer(middleware::from_fn_with_state(state.clone(), log_requests));

    Ok(app)
}

pub async fn run_server(
    catalog: GuardedCatalog,
    pipeline: GuardedPipeline,
    corpus_entries: usize,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
    metrics_port: u16,
    pipeline_timeout: Duration,
) -> Result<()> {
    let config = ServerConfig {
        requests_logging_level,
        port,
        metrics_port,
        pipeline_timeout,
        rate_limit: true,
    };
    let app = make_app(config, catalog, pipeline, corpus_entries)?;

    let metrics_app: Router = Router::new().route("/metrics", get(metrics::metrics_handler));
    let metrics_listener =
        tokio::net::TcpListener::bind(format!("127.0.0.1:{}", metrics_port)).await?;
    info!("Metrics on http://127.0.0.1:{}/metrics", metrics_port);
    tokio::spawn(async move {
        if let Err(err) = axum::serve(metrics_listener, metrics_app).await {
            error!("Metrics server stopped: {}", err);
        }
    });

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    info!("Listening on http://127.0.0.1:{}", port);

    Ok(axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to install shutdown signal handler: {}", err);
        return;
    }
    info!("Shutdown signal received, draining connections");
}
