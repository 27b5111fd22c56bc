//! Retrieval corpus loading.

use super::features::FEATURE_DIM;
use super::index::FlatIndex;
use crate::catalog::EngineCatalog;
use crate::preset::Preset;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// One reference preset with its precomputed feature vector, as written by
/// the offline corpus builder.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub id: String,
    pub name: String,
    pub vibe: String,
    pub preset: Preset,
    pub features: Vec<f32>,
}

#[derive(Serialize, Deserialize)]
pub struct CorpusFile {
    pub feature_dim: usize,
    pub entries: Vec<CorpusEntry>,
}

#[derive(Debug)]
pub enum Problem {
    WrongFeatureDim(String, usize),
    InvalidPreset(String, String),
}

pub struct PresetCorpus {
    entries: Vec<CorpusEntry>,
}

impl PresetCorpus {
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Entries are kept sorted by id so ranking ties always resolve the
    /// same way for a given corpus file.
    pub fn from_entries(mut entries: Vec<CorpusEntry>) -> Self {
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        Self { entries }
    }

    /// Loads and checks a corpus file. Entries that fail validation are
    /// skipped and reported; an unreadable file is an error, an empty
    /// corpus is not.
    pub fn load<P: AsRef<Path>>(path: P, catalog: &EngineCatalog) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read corpus file {}", path.as_ref().display()))?;
        let file: CorpusFile = serde_json::from_str(&raw).context("Failed to parse corpus file")?;

        let mut problems: Vec<Problem> = Vec::new();
        let mut good = Vec::with_capacity(file.entries.len());
        for entry in file.entries {
            if entry.features.len() != FEATURE_DIM {
                problems.push(Problem::WrongFeatureDim(entry.id, entry.features.len()));
                continue;
            }
            let issues = entry.preset.validate(catalog);
            if !issues.is_empty() {
                problems.push(Problem::InvalidPreset(entry.id, issues.join("; ")));
                continue;
            }
            good.push(entry);
        }

        if !problems.is_empty() {
            info!("Found {} corpus problems:", problems.len());
            for problem in problems.iter() {
                info!("- {:?}", problem);
            }
        }
        info!("Corpus has {} usable presets", good.len());
        Ok(Self::from_entries(good))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CorpusEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CorpusEntry> {
        self.entries.get(index)
    }

    pub fn build_index(&self) -> FlatIndex {
        let vectors = self.entries.iter().map(|e| e.features.clone()).collect();
        FlatIndex::new(FEATURE_DIM, vectors).expect("entry features length-checked at load")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EngineCatalog, SPRING_REVERB};
    use crate::oracle::features::feature_vector;
    use crate::preset::Slot;
    use std::io::Write;

    fn entry(id: &str, catalog: &EngineCatalog) -> CorpusEntry {
        let mut preset = Preset::empty();
        preset.slots[0] = Slot::with_defaults(catalog.get(SPRING_REVERB).unwrap());
        let features = feature_vector(&preset, catalog);
        CorpusEntry {
            id: id.to_owned(),
            name: format!("preset {}", id),
            vibe: "splashy".to_owned(),
            preset,
            features,
        }
    }

    #[test]
    fn entries_are_sorted_by_id() {
        let catalog = EngineCatalog::builtin();
        let corpus =
            PresetCorpus::from_entries(vec![entry("b", &catalog), entry("a", &catalog)]);
        assert_eq!(corpus.get(0).unwrap().id, "a");
        assert_eq!(corpus.get(1).unwrap().id, "b");
    }

    #[test]
    fn load_skips_bad_entries() {
        let catalog = EngineCatalog::builtin();
        let mut bad = entry("bad", &catalog);
        bad.features.pop();
        let mut invalid = entry("invalid", &catalog);
        invalid.preset.slots[0].params[0] = 7.0;
        let file = CorpusFile {
            feature_dim: FEATURE_DIM,
            entries: vec![entry("good", &catalog), bad, invalid],
        };

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("corpus.json");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(serde_json::to_string(&file).unwrap().as_bytes())
            .unwrap();

        let corpus = PresetCorpus::load(&path, &catalog).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get(0).unwrap().id, "good");
    }

    #[test]
    fn load_fails_on_missing_file() {
        let catalog = EngineCatalog::builtin();
        assert!(PresetCorpus::load("/nope/corpus.json", &catalog).is_err());
    }

    #[test]
    fn index_matches_corpus_size() {
        let catalog = EngineCatalog::builtin();
        let corpus =
            PresetCorpus::from_entries(vec![entry("a", &catalog), entry("b", &catalog)]);
        let index = corpus.build_index();
        assert_eq!(index.len(), 2);
        assert_eq!(index.dim(), FEATURE_DIM);
    }
}
