use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    // Core settings (can override CLI)
    pub catalog_path: Option<String>,
    pub corpus_path: Option<String>,
    pub port: Option<u16>,
    pub metrics_port: Option<u16>,
    pub logging_level: Option<String>,
    pub pipeline_timeout_sec: Option<u64>,

    // Stage configs
    pub llm: Option<LlmFileConfig>,
    pub oracle: Option<OracleFileConfig>,
    pub calculator: Option<CalculatorFileConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LlmFileConfig {
    /// Base URL of an OpenAI-compatible endpoint. Unset means no model:
    /// the pipeline runs entirely on its rule-based fallbacks.
    pub base_url: Option<String>,
    pub model: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: Option<String>,
    /// Command executed to obtain a fresh API key, takes precedence
    /// over `api_key_env` when both are set.
    pub api_key_command: Option<String>,
    pub timeout_sec: Option<u64>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct OracleFileConfig {
    pub engine_match_weight: Option<f32>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct CalculatorFileConfig {
    pub blend: Option<f32>,
    pub refinement: Option<bool>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
