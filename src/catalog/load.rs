//! Engine catalog loading from a JSON data file.

use super::catalog::EngineCatalog;
use super::engine::{EngineDescriptor, EngineId};
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

#[derive(Debug)]
pub enum Problem {
    DuplicateId(EngineId),
    EmptyName(EngineId),
    EmptySchema(EngineId),
    ParamOutOfRange(EngineId, String),
    MissingBypass,
}

fn check_engines(engines: &[EngineDescriptor]) -> Vec<Problem> {
    let mut problems = Vec::new();
    let mut seen: HashSet<EngineId> = HashSet::new();
    for engine in engines {
        if !seen.insert(engine.id) {
            problems.push(Problem::DuplicateId(engine.id));
        }
        if engine.name.trim().is_empty() {
            problems.push(Problem::EmptyName(engine.id));
        }
        if !engine.id.is_none() && engine.parameters.is_empty() {
            problems.push(Problem::EmptySchema(engine.id));
        }
        for p in &engine.parameters {
            if !(0.0..=1.0).contains(&p.default) || !p.default.is_finite() {
                problems.push(Problem::ParamOutOfRange(engine.id, p.name.clone()));
            }
        }
    }
    if !seen.contains(&EngineId::NONE) {
        problems.push(Problem::MissingBypass);
    }
    problems
}

/// Loads a catalog override from a JSON array of engine descriptors. The
/// file is pure data, same shape as the built-in table. Fatal problems
/// (duplicates, missing bypass) abort the load; everything else is
/// reported and tolerated.
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<EngineCatalog> {
    let raw = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read catalog file {}", path.as_ref().display()))?;
    let engines: Vec<EngineDescriptor> =
        serde_json::from_str(&raw).context("Failed to parse catalog file")?;

    let problems = check_engines(&engines);
    if !problems.is_empty() {
        info!("Found {} catalog problems:", problems.len());
        for problem in problems.iter() {
            info!("- {:?}", problem);
        }
    }
    let fatal = problems
        .iter()
        .any(|p| matches!(p, Problem::DuplicateId(_) | Problem::MissingBypass));
    if fatal {
        bail!("Catalog file is not usable, see problems above");
    }

    let catalog = EngineCatalog::from_engines(engines);
    info!(
        "Catalog has {} engines, max id {}",
        catalog.len(),
        catalog.max_id()
    );
    Ok(catalog)
}
