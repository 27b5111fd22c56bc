mod file_config;

pub use file_config::{CalculatorFileConfig, FileConfig, LlmFileConfig, OracleFileConfig};

use crate::server::RequestsLoggingLevel;
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;
use std::time::Duration;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub catalog_path: Option<PathBuf>,
    pub corpus_path: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub pipeline_timeout_sec: u64,
    pub llm_base_url: Option<String>,
    pub llm_model: String,
    pub llm_api_key_env: String,
    pub llm_api_key_command: Option<String>,
    pub llm_timeout_sec: u64,
    pub llm_temperature: f32,
    pub engine_match_weight: f32,
    pub blend: f32,
    pub no_refinement: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            catalog_path: None,
            corpus_path: None,
            port: 8000,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::default(),
            pipeline_timeout_sec: 60,
            llm_base_url: None,
            llm_model: "gpt-4o-mini".to_owned(),
            llm_api_key_env: "OPENAI_API_KEY".to_owned(),
            llm_api_key_command: None,
            llm_timeout_sec: 30,
            llm_temperature: 0.3,
            engine_match_weight: 10.0,
            blend: 0.7,
            no_refinement: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    // Core settings
    pub catalog_path: Option<PathBuf>,
    pub corpus_path: Option<PathBuf>,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub pipeline_timeout: Duration,

    // Stage settings (with defaults)
    pub llm: LlmSettings,
    pub oracle: OracleSettings,
    pub calculator: CalculatorSettings,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: Option<String>,
    pub model: String,
    pub api_key_env: String,
    pub api_key_command: Option<String>,
    pub timeout: Duration,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct OracleSettings {
    pub engine_match_weight: f32,
}

#[derive(Debug, Clone)]
pub struct CalculatorSettings {
    pub blend: f32,
    pub refinement: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        // TOML overrides CLI for each field
        let catalog_path = file
            .catalog_path
            .map(PathBuf::from)
            .or_else(|| cli.catalog_path.clone());
        if let Some(path) = &catalog_path {
            if !path.exists() {
                bail!("Catalog file does not exist: {:?}", path);
            }
            if !path.is_file() {
                bail!("catalog_path is not a file: {:?}", path);
            }
        }

        // A missing corpus file is fine on first boot, only a directory is rejected.
        let corpus_path = file
            .corpus_path
            .map(PathBuf::from)
            .or_else(|| cli.corpus_path.clone());
        if let Some(path) = &corpus_path {
            if path.exists() && !path.is_file() {
                bail!("corpus_path is not a file: {:?}", path);
            }
        }

        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);
        if port == metrics_port {
            bail!("port and metrics_port must differ, both are {}", port);
        }

        let logging_level = file
            .logging_level
            .and_then(|s| parse_logging_level(&s))
            .unwrap_or_else(|| cli.logging_level.clone());

        let pipeline_timeout_sec = file.pipeline_timeout_sec.unwrap_or(cli.pipeline_timeout_sec);
        if pipeline_timeout_sec == 0 {
            bail!("pipeline_timeout_sec must be greater than zero");
        }

        // LLM settings - merge file config with CLI
        let llm_file = file.llm.unwrap_or_default();
        let temperature = llm_file.temperature.unwrap_or(cli.llm_temperature);
        if !(0.0..=2.0).contains(&temperature) {
            bail!("temperature must be within 0.0..=2.0, got {}", temperature);
        }
        let llm = LlmSettings {
            base_url: llm_file.base_url.or_else(|| cli.llm_base_url.clone()),
            model: llm_file.model.unwrap_or_else(|| cli.llm_model.clone()),
            api_key_env: llm_file
                .api_key_env
                .unwrap_or_else(|| cli.llm_api_key_env.clone()),
            api_key_command: llm_file
                .api_key_command
                .or_else(|| cli.llm_api_key_command.clone()),
            timeout: Duration::from_secs(llm_file.timeout_sec.unwrap_or(cli.llm_timeout_sec)),
            temperature,
        };

        let oracle_file = file.oracle.unwrap_or_default();
        let engine_match_weight = oracle_file
            .engine_match_weight
            .unwrap_or(cli.engine_match_weight);
        if engine_match_weight < 0.0 {
            bail!(
                "engine_match_weight must not be negative, got {}",
                engine_match_weight
            );
        }
        let oracle = OracleSettings {
            engine_match_weight,
        };

        let calculator_file = file.calculator.unwrap_or_default();
        let blend = calculator_file.blend.unwrap_or(cli.blend);
        if !(0.0..=1.0).contains(&blend) {
            bail!("blend must be within 0.0..=1.0, got {}", blend);
        }
        let calculator = CalculatorSettings {
            blend,
            refinement: calculator_file.refinement.unwrap_or(!cli.no_refinement),
        };

        Ok(Self {
            catalog_path,
            corpus_path,
            port,
            metrics_port,
            logging_level,
            pipeline_timeout: Duration::from_secs(pipeline_timeout_sec),
            llm,
            oracle,
            calculator,
        })
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
