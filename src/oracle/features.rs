//! Feature vectors for preset retrieval.
//!
//! Presets are embedded into a small fixed-dimension numeric space built
//! only from structure: category presence, per-slot engine identity and
//! two key parameters per slot. Vibe text stays out of the vector, text
//! affinity is handled upstream by the generation stage.

use crate::catalog::{EngineCatalog, EngineCategory};
use crate::preset::{Blueprint, Preset, SLOT_COUNT};

const CATEGORY_DIMS: usize = EngineCategory::ALL.len();
const SLOT_DIMS: usize = SLOT_COUNT;
const PARAM_DIMS: usize = SLOT_COUNT * 2;

/// 11 category dims + 6 engine dims + 12 key-parameter dims.
pub const FEATURE_DIM: usize = CATEGORY_DIMS + SLOT_DIMS + PARAM_DIMS;

/// Embeds a preset. The layout is positional and versioned with the corpus
/// file, both sides of retrieval must use the same extraction.
pub fn feature_vector(preset: &Preset, catalog: &EngineCatalog) -> Vec<f32> {
    let mut features = vec![0.0f32; FEATURE_DIM];
    let max_id = catalog.max_id().raw().max(1) as f32;

    for (i, slot) in preset.slots.iter().enumerate() {
        if !slot.is_active() {
            continue;
        }
        let engine = match catalog.get(slot.engine_id) {
            Some(e) => e,
            None => continue,
        };
        features[engine.category.index()] = 1.0;
        features[CATEGORY_DIMS + i] = slot.engine_id.raw() as f32 / max_id;

        let base = CATEGORY_DIMS + SLOT_DIMS + i * 2;
        features[base] = slot.params.first().copied().unwrap_or(0.0);
        if let Some(mix) = engine.mix_index().and_then(|m| slot.params.get(m)) {
            features[base + 1] = *mix;
        }
    }
    features
}

/// Query-side embedding: the blueprint is materialized as its default
/// preset (midpoint parameters) and embedded with the same extraction.
pub fn blueprint_features(blueprint: &Blueprint, catalog: &EngineCatalog) -> Vec<f32> {
    feature_vector(&Preset::default_for(blueprint, catalog), catalog)
}
