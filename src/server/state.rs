use axum::extract::FromRef;

use crate::catalog::EngineCatalog;
use crate::pipeline::TrinityPipeline;
use std::sync::Arc;
use std::time::Instant;

use super::ServerConfig;

pub type GuardedCatalog = Arc<EngineCatalog>;
pub type GuardedPipeline = Arc<TrinityPipeline>;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub catalog: GuardedCatalog,
    pub pipeline: GuardedPipeline,
    /// Usable corpus entries at startup, surfaced by the health endpoint.
    pub corpus_entries: usize,
    pub hash: String,
}

impl FromRef<ServerState> for GuardedCatalog {
    fn from_ref(input: &ServerState) -> Self {
        input.catalog.clone()
    }
}

impl FromRef<ServerState> for GuardedPipeline {
    fn from_ref(input: &ServerState) -> Self {
        input.pipeline.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
