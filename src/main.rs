use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use trinity_server::alchemist::Alchemist;
use trinity_server::calculator::{Calculator, CalculatorConfig};
use trinity_server::catalog::{load_catalog, EngineCatalog};
use trinity_server::config::{AppConfig, CliConfig, FileConfig};
use trinity_server::llm::{
    CachedProvider, CompletionOptions, LlmProvider, NullProvider, OpenAiProvider,
};
use trinity_server::oracle::{Oracle, OracleConfig, PresetCorpus};
use trinity_server::pipeline::TrinityPipeline;
use trinity_server::server::{self, run_server, RequestsLoggingLevel};
use trinity_server::visionary::{Visionary, VisionaryConfig};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the engine catalog JSON file. Defaults to the built-in catalog.
    #[clap(long, value_parser = parse_path)]
    pub catalog: Option<PathBuf>,

    /// Path to the preset corpus JSON file. Without one, every request
    /// synthesizes a default preset instead of adapting a retrieved match.
    #[clap(long, value_parser = parse_path)]
    pub corpus: Option<PathBuf>,

    /// Path to a TOML config file. Values there override CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 8000)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping).
    #[clap(long, default_value_t = 9091)]
    pub metrics_port: u16,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Hard cap in seconds on a single generation request.
    #[clap(long, default_value_t = 60)]
    pub pipeline_timeout_sec: u64,

    /// Base URL of an OpenAI-compatible completions endpoint. Unset runs
    /// the pipeline on its rule-based fallbacks alone.
    #[clap(long)]
    pub llm_base_url: Option<String>,

    /// Model name requested from the completions endpoint.
    #[clap(long, default_value = "gpt-4o-mini")]
    pub llm_model: String,

    /// Environment variable read for the API key.
    #[clap(long, default_value = "OPENAI_API_KEY")]
    pub llm_api_key_env: String,

    /// Command executed to obtain a fresh API key. Takes precedence over
    /// the environment variable.
    #[clap(long)]
    pub llm_api_key_command: Option<String>,

    /// Timeout in seconds for a single model call.
    #[clap(long, default_value_t = 30)]
    pub llm_timeout_sec: u64,

    /// Sampling temperature for model calls.
    #[clap(long, default_value_t = 0.3)]
    pub llm_temperature: f32,

    /// Retrieval score contribution of one matched engine.
    #[clap(long, default_value_t = 10.0)]
    pub engine_match_weight: f32,

    /// Weight of keyword targets when nudging retrieved parameters.
    #[clap(long, default_value_t = 0.7)]
    pub blend: f32,

    /// Disable the model-assisted parameter refinement pass.
    #[clap(long)]
    pub no_refinement: bool,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            catalog_path: self.catalog.clone(),
            corpus_path: self.corpus.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            logging_level: self.logging_level.clone(),
            pipeline_timeout_sec: self.pipeline_timeout_sec,
            llm_base_url: self.llm_base_url.clone(),
            llm_model: self.llm_model.clone(),
            llm_api_key_env: self.llm_api_key_env.clone(),
            llm_api_key_command: self.llm_api_key_command.clone(),
            llm_timeout_sec: self.llm_timeout_sec,
            llm_temperature: self.llm_temperature,
            engine_match_weight: self.engine_match_weight,
            blend: self.blend,
            no_refinement: self.no_refinement,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    let catalog = match &config.catalog_path {
        Some(path) => {
            info!("Loading engine catalog from {:?}...", path);
            Arc::new(load_catalog(path)?)
        }
        None => Arc::new(EngineCatalog::builtin()),
    };
    info!("Catalog ready with {} engines", catalog.len());

    let corpus = match &config.corpus_path {
        Some(path) if path.exists() => {
            info!("Loading preset corpus from {:?}...", path);
            let corpus = PresetCorpus::load(path, &catalog)?;
            info!("Corpus ready with {} presets", corpus.len());
            Arc::new(corpus)
        }
        Some(path) => {
            warn!(
                "Corpus file {:?} not found, every request will synthesize defaults",
                path
            );
            Arc::new(PresetCorpus::empty())
        }
        None => {
            warn!("No corpus configured, every request will synthesize defaults");
            Arc::new(PresetCorpus::empty())
        }
    };

    let options = CompletionOptions {
        temperature: config.llm.temperature,
        timeout: config.llm.timeout,
        json_response: true,
        ..CompletionOptions::default()
    };
    let provider: Arc<dyn LlmProvider> = match &config.llm.base_url {
        Some(base_url) => {
            info!("Using model '{}' at {}", config.llm.model, base_url);
            let provider: Arc<dyn LlmProvider> = match &config.llm.api_key_command {
                Some(command) => Arc::new(OpenAiProvider::with_key_command(
                    base_url.clone(),
                    config.llm.model.clone(),
                    command.clone(),
                )),
                None => Arc::new(OpenAiProvider::new(
                    base_url.clone(),
                    config.llm.model.clone(),
                    std::env::var(&config.llm.api_key_env).ok(),
                )),
            };
            Arc::new(CachedProvider::new(provider))
        }
        None => {
            warn!("No LLM endpoint configured, running on rule-based fallbacks");
            Arc::new(NullProvider)
        }
    };

    let pipeline = Arc::new(TrinityPipeline::new(
        Visionary::new(
            catalog.clone(),
            provider.clone(),
            VisionaryConfig {
                options: options.clone(),
            },
        ),
        Oracle::new(
            catalog.clone(),
            corpus.clone(),
            OracleConfig {
                engine_match_weight: config.oracle.engine_match_weight,
            },
        ),
        Calculator::new(
            catalog.clone(),
            provider,
            CalculatorConfig {
                blend: config.calculator.blend,
                refinement: config.calculator.refinement,
                options,
            },
        ),
        Alchemist::new(catalog.clone()),
    ));

    // Initialize metrics system
    info!("Initializing metrics...");
    server::metrics::init_metrics();
    server::metrics::init_corpus_metrics(corpus.len());

    info!("Ready to serve at port {}!", config.port);
    info!("Metrics available at port {}!", config.metrics_port);
    run_server(
        catalog,
        pipeline,
        corpus.len(),
        config.logging_level,
        config.port,
        config.metrics_port,
        config.pipeline_timeout,
    )
    .await
}
