//! Corpus retrieval: ranks reference presets against a blueprint and
//! adapts the winner to the blueprint's engine assignments.

use super::corpus::PresetCorpus;
use super::features::blueprint_features;
use super::index::FlatIndex;
use crate::catalog::EngineCatalog;
use crate::pipeline::StageResult;
use crate::preset::{Blueprint, Preset, PresetSource, Slot, SLOT_COUNT};
use crate::server::metrics;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Score contribution of one requested-engine match. Similarity lives
    /// in (0, 1], so any engine overlap outranks pure vector proximity.
    pub engine_match_weight: f32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            engine_match_weight: 10.0,
        }
    }
}

/// One ranked corpus candidate.
#[derive(Debug, Clone)]
pub struct ScoredPreset {
    pub entry_id: String,
    pub name: String,
    pub similarity: f32,
    pub engine_matches: usize,
    pub score: f32,
    pub preset: Preset,
}

#[derive(Debug, Error, PartialEq)]
pub enum BlendError {
    #[error("need at least two presets to blend, got {0}")]
    TooFew(usize),
    #[error("got {presets} presets but {weights} weights")]
    MismatchedWeights { presets: usize, weights: usize },
    #[error("blend weights sum to {0:.3}, expected 1.0")]
    BadWeightSum(f32),
}

pub struct Oracle {
    catalog: Arc<EngineCatalog>,
    corpus: Arc<PresetCorpus>,
    index: FlatIndex,
    config: OracleConfig,
}

impl Oracle {
    pub fn new(catalog: Arc<EngineCatalog>, corpus: Arc<PresetCorpus>, config: OracleConfig) -> Self {
        let index = corpus.build_index();
        Self {
            catalog,
            corpus,
            index,
            config,
        }
    }

    /// Best corpus match adapted to the blueprint. Never fails: with no
    /// usable corpus the blueprint is synthesized into a default preset
    /// and the result is marked degraded.
    pub fn find_best_preset(&self, blueprint: &Blueprint) -> StageResult<Preset> {
        if self.corpus.is_empty() {
            info!("Retrieval corpus is empty, synthesizing default preset");
            return StageResult::degraded(
                Preset::default_for(blueprint, &self.catalog),
                "corpus unavailable, synthesized defaults",
            );
        }
        match self.rank(blueprint).into_iter().next() {
            Some(best) => {
                debug!(
                    entry = %best.entry_id,
                    score = best.score,
                    matches = best.engine_matches,
                    "Best corpus match"
                );
                metrics::record_retrieval_score(best.score as f64);
                StageResult::Clean(self.adapt_to_blueprint(
                    best.preset,
                    blueprint,
                    PresetSource::OracleAdapted,
                ))
            }
            None => StageResult::degraded(
                Preset::default_for(blueprint, &self.catalog),
                "retrieval produced no candidates, synthesized defaults",
            ),
        }
    }

    /// Top-k candidates by combined score, descending. Ties resolve to the
    /// lower corpus position, so ranking is reproducible for a fixed
    /// corpus file.
    pub fn find_best_presets(&self, blueprint: &Blueprint, k: usize) -> Vec<ScoredPreset> {
        let mut ranked = self.rank(blueprint);
        ranked.truncate(k);
        ranked
    }

    /// Blends the top-k candidates with rank-proportional weights, then
    /// adapts the blend to the blueprint. Falls back to the single-match
    /// path when the corpus is too small.
    pub fn blend_best(&self, blueprint: &Blueprint, k: usize) -> StageResult<Preset> {
        let ranked = self.find_best_presets(blueprint, k);
        if ranked.len() < 2 {
            return self
                .find_best_preset(blueprint)
                .with_warning("corpus too small to blend, used best match");
        }

        let total: f32 = ranked.iter().map(|s| s.score).sum();
        let weights: Vec<f32> = ranked.iter().map(|s| s.score / total).collect();
        let presets: Vec<Preset> = ranked.iter().map(|s| s.preset.clone()).collect();

        match self.blend_presets(&presets, &weights) {
            Ok(blended) => StageResult::Clean(self.adapt_to_blueprint(
                blended,
                blueprint,
                PresetSource::OracleBlend,
            )),
            Err(e) => self
                .find_best_preset(blueprint)
                .with_warning(format!("blend failed ({}), used best match", e)),
        }
    }

    /// Weighted interpolation of several presets. The slot layout comes
    /// from the highest-weighted preset; parameters interpolate across the
    /// presets that carry the same engine.
    pub fn blend_presets(&self, presets: &[Preset], weights: &[f32]) -> Result<Preset, BlendError> {
        if presets.len() < 2 {
            return Err(BlendError::TooFew(presets.len()));
        }
        if presets.len() != weights.len() {
            return Err(BlendError::MismatchedWeights {
                presets: presets.len(),
                weights: weights.len(),
            });
        }
        let sum: f32 = weights.iter().sum();
        if (sum - 1.0).abs() > 0.01 {
            return Err(BlendError::BadWeightSum(sum));
        }

        let base_idx = weights
            .iter()
            .enumerate()
            .max_by(|a, b| {
                a.1.partial_cmp(b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(b.0.cmp(&a.0))
            })
            .map(|(i, _)| i)
            .unwrap_or(0);

        let mut result = presets[base_idx].clone();
        result.source = PresetSource::OracleBlend;

        for slot in result.slots.iter_mut() {
            if !slot.is_active() {
                continue;
            }
            let mut acc = vec![0.0f32; slot.params.len()];
            let mut total_weight = 0.0f32;
            for (preset, weight) in presets.iter().zip(weights.iter()) {
                let matching = preset
                    .slots
                    .iter()
                    .find(|s| s.is_active() && s.engine_id == slot.engine_id);
                if let Some(other) = matching {
                    if other.params.len() == acc.len() {
                        for (a, v) in acc.iter_mut().zip(other.params.iter()) {
                            *a += weight * v;
                        }
                        total_weight += weight;
                    }
                }
            }
            if total_weight > f32::EPSILON {
                for (target, value) in slot.params.iter_mut().zip(acc.iter()) {
                    *target = (value / total_weight).clamp(0.0, 1.0);
                }
            }
        }
        Ok(result)
    }

    fn rank(&self, blueprint: &Blueprint) -> Vec<ScoredPreset> {
        let query = blueprint_features(blueprint, &self.catalog);
        let requested = blueprint.requested_ids();

        let mut scored: Vec<ScoredPreset> = self
            .index
            .search(&query, self.index.len())
            .into_iter()
            .filter_map(|(idx, distance)| {
                let entry = self.corpus.get(idx)?;
                let similarity = 1.0 / (1.0 + distance);
                let matched: std::collections::HashSet<_> = entry
                    .preset
                    .active_engine_ids()
                    .into_iter()
                    .filter(|id| requested.contains(id))
                    .collect();
                let engine_matches = matched.len();
                Some(ScoredPreset {
                    entry_id: entry.id.clone(),
                    name: entry.name.clone(),
                    similarity,
                    engine_matches,
                    score: similarity + engine_matches as f32 * self.config.engine_match_weight,
                    preset: entry.preset.clone(),
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.entry_id.cmp(&b.entry_id))
        });
        scored
    }

    /// Rewrites slot engine assignments to the blueprint's, reusing the
    /// base preset's parameter values wherever the engine carries over.
    fn adapt_to_blueprint(
        &self,
        base: Preset,
        blueprint: &Blueprint,
        source: PresetSource,
    ) -> Preset {
        let mut result = Preset::empty();
        result.name = base.name.clone();
        result.vibe = blueprint.overall_vibe.clone();
        result.source = source;

        let mut claimed = [false; SLOT_COUNT];
        let mut target = 0;
        for engine_id in blueprint.active_engines() {
            if target >= SLOT_COUNT {
                break;
            }
            let engine = match self.catalog.get(engine_id) {
                Some(e) => e,
                None => continue,
            };
            let donor = base.slots.iter().enumerate().find(|(i, s)| {
                !claimed[*i] && s.is_active() && s.engine_id == engine_id
            });
            result.slots[target] = match donor {
                Some((i, slot)) if slot.params.len() == engine.param_count() => {
                    claimed[i] = true;
                    slot.clone()
                }
                _ => Slot::with_defaults(engine),
            };
            target += 1;
        }
        result
    }
}
