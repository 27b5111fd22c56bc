//! Corpus Builder Tool
//!
//! This binary builds the retrieval corpus the server loads at startup.
//! It reads a JSON array of raw presets in the plugin's flat parameter
//! format, checks each against the engine catalog, computes feature
//! vectors and writes the corpus file.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use trinity_server::catalog::{load_catalog, EngineCatalog};
use trinity_server::oracle::{feature_vector, CorpusEntry, CorpusFile, FEATURE_DIM};
use trinity_server::preset::from_plugin_params;

#[derive(Parser, Debug)]
#[command(name = "cli-corpus")]
#[command(about = "Build and inspect the preset retrieval corpus")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a corpus file from a JSON array of raw presets
    Build {
        /// Path to the raw presets JSON file
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Path the corpus file is written to
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Path to the engine catalog JSON file, defaults to the built-in catalog
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Print entry and dimension counts of a corpus file
    Inspect {
        /// Path to the corpus file
        #[arg(value_name = "INPUT")]
        input: PathBuf,
    },
}

/// Input shape of one raw preset: display metadata plus the flat
/// `slotN_engine` / `slotN_param...` map exported from the plugin.
#[derive(Deserialize, Debug)]
struct RawPreset {
    name: String,
    #[serde(default)]
    vibe: String,
    parameters: HashMap<String, f32>,
}

#[derive(Default)]
struct BuildStats {
    converted: usize,
    rejected: usize,
}

fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('-') {
            out.push('-');
        }
    }
    let out = out.trim_end_matches('-').to_owned();
    if out.is_empty() {
        "preset".to_owned()
    } else {
        out
    }
}

/// Stable per-entry ids: slugged names with a counter suffix on repeats.
/// Retrieval ties break on id order, so rebuilding the same input must
/// produce the same ids.
fn assign_ids(raw_presets: &[RawPreset]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    raw_presets
        .iter()
        .map(|raw| {
            let base = slug(&raw.name);
            let count = seen.entry(base.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{}-{}", base, count)
            }
        })
        .collect()
}

fn convert(id: &str, raw: &RawPreset, catalog: &EngineCatalog) -> Result<CorpusEntry, String> {
    let mut preset = from_plugin_params(&raw.parameters, catalog).map_err(|e| e.to_string())?;
    preset.name = raw.name.clone();
    preset.vibe = raw.vibe.clone();

    #[cfg(not(feature = "no_checks"))]
    {
        let issues = preset.validate(catalog);
        if !issues.is_empty() {
            return Err(issues.join("; "));
        }
    }

    let features = feature_vector(&preset, catalog);
    Ok(CorpusEntry {
        id: id.to_owned(),
        name: raw.name.clone(),
        vibe: raw.vibe.clone(),
        preset,
        features,
    })
}

fn build(input: &Path, output: &Path, catalog_path: Option<&Path>) -> Result<()> {
    info!("Corpus Builder");
    info!("==============");
    info!("Input: {}", input.display());
    info!("Output: {}", output.display());

    if output.exists() {
        warn!("Output file already exists and will be overwritten");
    }

    let catalog = match catalog_path {
        Some(path) => {
            info!("Loading engine catalog from {}...", path.display());
            load_catalog(path)?
        }
        None => EngineCatalog::builtin(),
    };
    info!("Catalog ready with {} engines", catalog.len());

    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file {}", input.display()))?;
    let raw_presets: Vec<RawPreset> =
        serde_json::from_str(&content).context("Failed to parse input file")?;
    info!("Read {} raw presets", raw_presets.len());

    let ids = assign_ids(&raw_presets);
    let results: Vec<(String, Result<CorpusEntry, String>)> = raw_presets
        .par_iter()
        .zip(ids.par_iter())
        .map(|(raw, id)| (id.clone(), convert(id, raw, &catalog)))
        .collect();

    let mut stats = BuildStats::default();
    let mut entries = Vec::with_capacity(results.len());
    for (id, result) in results {
        match result {
            Ok(entry) => {
                entries.push(entry);
                stats.converted += 1;
            }
            Err(reason) => {
                warn!("Skipping '{}': {}", id, reason);
                stats.rejected += 1;
            }
        }
    }

    let file = CorpusFile {
        feature_dim: FEATURE_DIM,
        entries,
    };
    let serialized = serde_json::to_string_pretty(&file)?;
    std::fs::write(output, serialized)
        .with_context(|| format!("Failed to write corpus file {}", output.display()))?;

    info!("");
    info!("Build Summary");
    info!("=============");
    info!("Presets converted: {}", stats.converted);
    if stats.rejected > 0 {
        warn!("Presets rejected: {}", stats.rejected);
    }
    info!("Feature dimension: {}", FEATURE_DIM);
    info!("Corpus written to {}", output.display());
    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read corpus file {}", input.display()))?;
    let file: CorpusFile = serde_json::from_str(&content).context("Failed to parse corpus file")?;

    info!("Corpus file: {}", input.display());
    info!("Entries: {}", file.entries.len());
    info!("Feature dimension: {}", file.feature_dim);
    if file.feature_dim != FEATURE_DIM {
        warn!(
            "Dimension mismatch: file has {}, this build expects {}",
            file.feature_dim, FEATURE_DIM
        );
    }
    let malformed = file
        .entries
        .iter()
        .filter(|e| e.features.len() != file.feature_dim)
        .count();
    if malformed > 0 {
        warn!("{} entries have a wrong feature vector length", malformed);
    }
    Ok(())
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    match args.command {
        Command::Build {
            input,
            output,
            catalog,
        } => build(&input, &output, catalog.as_deref()),
        Command::Inspect { input } => inspect(&input),
    }
}
