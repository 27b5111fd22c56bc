//! Test server lifecycle management
//!
//! This module manages spawning and shutting down test HTTP servers.
//! Each test gets an isolated server on a random port with its own
//! pipeline, scripted model provider and in-memory retrieval corpus.

use super::constants::*;
use super::fixtures::{create_test_corpus, ScriptedProvider};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use trinity_server::alchemist::Alchemist;
use trinity_server::calculator::{Calculator, CalculatorConfig};
use trinity_server::catalog::EngineCatalog;
use trinity_server::llm::{LlmProvider, NullProvider};
use trinity_server::oracle::{Oracle, OracleConfig, PresetCorpus};
use trinity_server::pipeline::TrinityPipeline;
use trinity_server::server::{make_app, RequestsLoggingLevel, ServerConfig};
use trinity_server::visionary::{Visionary, VisionaryConfig};

/// Test server instance with an isolated pipeline
///
/// When dropped, the server gracefully shuts down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// The port the server is listening on
    pub port: u16,

    // Private field - dropping the sender shuts the server down
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a server with no model and no corpus
    ///
    /// Every stage runs its rule-based fallback path. This is the
    /// degraded-but-working configuration the service must survive.
    pub async fn spawn() -> Self {
        Self::spawn_inner(Arc::new(NullProvider), PresetCorpus::empty()).await
    }

    /// Spawns a server whose model replays the given completion texts
    ///
    /// Replies are consumed in call order (blueprint first, then the
    /// refinement pass if it triggers). An exhausted script behaves like
    /// an unreachable backend.
    pub async fn spawn_scripted(replies: Vec<String>) -> Self {
        Self::spawn_inner(Arc::new(ScriptedProvider::new(replies)), PresetCorpus::empty()).await
    }

    /// Spawns a scripted server backed by the fixture retrieval corpus
    pub async fn spawn_scripted_with_corpus(replies: Vec<String>) -> Self {
        let catalog = EngineCatalog::builtin();
        let corpus = create_test_corpus(&catalog);
        Self::spawn_inner(Arc::new(ScriptedProvider::new(replies)), corpus).await
    }

    /// Spawns a server with no model but with the fixture corpus
    pub async fn spawn_with_corpus() -> Self {
        let catalog = EngineCatalog::builtin();
        let corpus = create_test_corpus(&catalog);
        Self::spawn_inner(Arc::new(NullProvider), corpus).await
    }

    async fn spawn_inner(provider: Arc<dyn LlmProvider>, corpus: PresetCorpus) -> Self {
        let catalog = Arc::new(EngineCatalog::builtin());
        let corpus = Arc::new(corpus);

        let pipeline = Arc::new(TrinityPipeline::new(
            Visionary::new(catalog.clone(), provider.clone(), VisionaryConfig::default()),
            Oracle::new(catalog.clone(), corpus.clone(), OracleConfig::default()),
            Calculator::new(catalog.clone(), provider, CalculatorConfig::default()),
            Alchemist::new(catalog.clone()),
        ));

        // Rate limiting is off: the router is driven without a stable
        // peer address and tests fire requests back to back.
        let config = ServerConfig {
            requests_logging_level: RequestsLoggingLevel::None,
            rate_limit: false,
            pipeline_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            ..ServerConfig::default()
        };
        let app = make_app(config, catalog, pipeline, corpus.len())
            .expect("Failed to build test app");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test server port");
        let port = listener.local_addr().expect("No local addr").port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Test server crashed");
        });

        let server = Self {
            base_url,
            port,
            _shutdown_tx: Some(shutdown_tx),
        };
        server.wait_until_ready().await;
        server
    }

    async fn wait_until_ready(&self) {
        let client = reqwest::Client::new();
        let deadline = std::time::Instant::now() + Duration::from_secs(READY_TIMEOUT_SECS);
        loop {
            if let Ok(response) = client.get(&self.base_url).send().await {
                if response.status().is_success() {
                    return;
                }
            }
            assert!(
                std::time::Instant::now() < deadline,
                "Test server did not become ready in time"
            );
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }
}
