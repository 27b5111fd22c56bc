use std::sync::Arc;

use tracing::debug;

use crate::alchemist::naming::NameGenerator;
use crate::alchemist::required::required_engines;
use crate::alchemist::{safety, signal_chain};
use crate::catalog::{self, EngineCatalog, EngineCategory, EngineId};
use crate::pipeline::StageResult;
use crate::preset::{Preset, Slot};

/// A preset with fewer active engines than this sounds like a half-built
/// rack, so finalization tops the chain up.
const MIN_ACTIVE_ENGINES: usize = 4;

/// Inoffensive engines used for topping up, in insertion order.
const FILL_ENGINES: [EngineId; 4] = [
    catalog::PARAMETRIC_EQ,
    catalog::VINTAGE_OPTO_COMPRESSOR,
    catalog::PLATE_REVERB,
    catalog::GAIN_UTILITY,
];

/// How willing we are to throw a category out when a required engine
/// needs its slot. Higher goes first; core dynamics go last.
fn evict_rank(category: EngineCategory) -> usize {
    match category {
        EngineCategory::Utility => 10,
        EngineCategory::Special => 9,
        EngineCategory::Spatial => 8,
        EngineCategory::Pitch => 7,
        EngineCategory::Modulation => 6,
        EngineCategory::Delay => 5,
        EngineCategory::Reverb => 4,
        EngineCategory::Distortion => 3,
        EngineCategory::Filter => 2,
        EngineCategory::Eq => 1,
        EngineCategory::Dynamics => 0,
    }
}

/// Last pipeline stage. Enforces explicitly requested engines, tops up
/// thin chains, orders the slots, clamps unsafe parameter combinations
/// and names the result. Structural validity is unconditional: whatever
/// arrives, a well-formed preset leaves.
pub struct Alchemist {
    catalog: Arc<EngineCatalog>,
    names: NameGenerator,
}

impl Alchemist {
    pub fn new(catalog: Arc<EngineCatalog>) -> Self {
        Self {
            catalog,
            names: NameGenerator::new(),
        }
    }

    pub fn finalize_preset(&self, mut preset: Preset, prompt: &str) -> StageResult<Preset> {
        let mut warnings = Vec::new();
        warnings.extend(self.ensure_required_engines(&mut preset, prompt));
        warnings.extend(self.ensure_minimum_chain(&mut preset));
        signal_chain::reorder_signal_chain(&mut preset, &self.catalog);
        warnings.extend(safety::apply_safety_clamps(&mut preset, &self.catalog));

        preset.signal_flow = signal_chain::signal_flow_string(&preset, &self.catalog);
        if preset.vibe.trim().is_empty() {
            preset.vibe = prompt.trim().to_owned();
        }
        preset.name = self
            .names
            .generate(&preset.vibe, self.dominant_category(&preset));

        if !warnings.is_empty() {
            debug!("Finalization adjusted the preset: {}", warnings.join("; "));
        }
        for warning in warnings {
            preset.warn(warning);
        }
        StageResult::Clean(preset)
    }

    /// Force-inserts engines the prompt names outright. Prefers empty
    /// slots, then evicts the most expendable engine; engines that are
    /// themselves required never get evicted.
    fn ensure_required_engines(&self, preset: &mut Preset, prompt: &str) -> Vec<String> {
        let required = required_engines(prompt);
        let mut warnings = Vec::new();
        for id in &required {
            if preset.has_engine(*id) {
                continue;
            }
            let Some(engine) = self.catalog.get(*id) else {
                continue;
            };
            if let Some(index) = preset.first_empty_slot() {
                preset.slots[index] = Slot::with_defaults(engine);
                warnings.push(format!("added requested {}", engine.name));
                continue;
            }
            let victim = preset
                .active_slots()
                .filter(|(_, slot)| !required.contains(&slot.engine_id))
                .max_by_key(|(_, slot)| {
                    self.catalog
                        .category_of(slot.engine_id)
                        .map(evict_rank)
                        .unwrap_or(0)
                })
                .map(|(index, _)| index);
            match victim {
                Some(index) => {
                    let evicted = self.catalog.name_of(preset.slots[index].engine_id).to_owned();
                    preset.slots[index] = Slot::with_defaults(engine);
                    warnings.push(format!(
                        "replaced {evicted} with requested {}",
                        engine.name
                    ));
                }
                None => warnings.push(format!(
                    "no room for requested {}, every slot holds a requested engine",
                    engine.name
                )),
            }
        }
        warnings
    }

    fn ensure_minimum_chain(&self, preset: &mut Preset) -> Vec<String> {
        let mut warnings = Vec::new();
        if preset.active_count() >= MIN_ACTIVE_ENGINES {
            return warnings;
        }
        let thin = preset.active_count();
        for id in FILL_ENGINES {
            if preset.active_count() >= MIN_ACTIVE_ENGINES {
                break;
            }
            if preset.has_engine(id) {
                continue;
            }
            let Some(index) = preset.first_empty_slot() else {
                break;
            };
            let Some(engine) = self.catalog.get(id) else {
                continue;
            };
            preset.slots[index] = Slot::with_defaults(engine);
            warnings.push(format!(
                "chain had {thin} engines, added {} to fill it out",
                engine.name
            ));
        }
        warnings
    }

    /// Most frequent active category; ties go to whichever runs earlier
    /// in the canonical chain.
    fn dominant_category(&self, preset: &Preset) -> EngineCategory {
        let mut best = EngineCategory::Utility;
        let mut best_count = 0;
        let mut best_rank = usize::MAX;
        for category in EngineCategory::ALL {
            let count = preset
                .active_slots()
                .filter(|(_, slot)| self.catalog.category_of(slot.engine_id) == Some(category))
                .count();
            let rank = signal_chain::chain_rank(category);
            if count > best_count || (count == best_count && count > 0 && rank < best_rank) {
                best = category;
                best_count = count;
                best_rank = rank;
            }
        }
        best
    }
}
