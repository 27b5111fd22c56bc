use super::Blueprint;
use crate::catalog::{EngineCatalog, EngineDescriptor, EngineId};
use serde::{Deserialize, Serialize};

/// The plugin has a fixed rack of six serial slots.
pub const SLOT_COUNT: usize = 6;

/// Where a preset came from, the last retrieval-stage decision that shaped
/// it. Later stages refine parameters but keep the source tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresetSource {
    /// Best corpus match, slots adapted to the blueprint.
    OracleAdapted,
    /// Synthesized from the blueprint alone, no usable corpus match.
    OracleDefault,
    /// Weighted blend of several corpus matches.
    OracleBlend,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub engine_id: EngineId,
    pub bypass: bool,
    /// Normalized [0,1], ordered exactly as the engine's parameter schema.
    pub params: Vec<f32>,
}

impl Slot {
    pub fn empty() -> Self {
        Self {
            engine_id: EngineId::NONE,
            bypass: true,
            params: Vec::new(),
        }
    }

    /// Engine with its schema defaults.
    pub fn with_defaults(engine: &EngineDescriptor) -> Self {
        Self {
            engine_id: engine.id,
            bypass: engine.id.is_none(),
            params: engine.default_params(),
        }
    }

    /// Engine with every parameter at the neutral midpoint.
    pub fn neutral(engine: &EngineDescriptor) -> Self {
        Self {
            engine_id: engine.id,
            bypass: engine.id.is_none(),
            params: vec![0.5; engine.param_count()],
        }
    }

    pub fn is_active(&self) -> bool {
        !self.bypass && !self.engine_id.is_none()
    }
}

/// A complete six-slot preset. This is the only preset representation the
/// pipeline passes around; the flat key-value plugin form is produced at
/// the edges by `plugin_format`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub vibe: String,
    pub source: PresetSource,
    /// Human-readable chain summary, filled in at finalization.
    pub signal_flow: String,
    pub validation_warnings: Vec<String>,
    pub slots: [Slot; SLOT_COUNT],
}

impl Preset {
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            vibe: String::new(),
            source: PresetSource::OracleDefault,
            signal_flow: String::new(),
            validation_warnings: Vec::new(),
            slots: std::array::from_fn(|_| Slot::empty()),
        }
    }

    /// The degraded-path synthesis: blueprint engines in blueprint order,
    /// every parameter at 0.5. Always structurally valid.
    pub fn default_for(blueprint: &Blueprint, catalog: &EngineCatalog) -> Self {
        let mut preset = Self::empty();
        preset.vibe = blueprint.overall_vibe.clone();
        let mut next = 0;
        for engine_id in blueprint.active_engines() {
            if next >= SLOT_COUNT {
                break;
            }
            if let Some(engine) = catalog.get(engine_id) {
                preset.slots[next] = Slot::neutral(engine);
                next += 1;
            }
        }
        preset
    }

    pub fn active_slots(&self) -> impl Iterator<Item = (usize, &Slot)> {
        self.slots.iter().enumerate().filter(|(_, s)| s.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    pub fn active_engine_ids(&self) -> Vec<EngineId> {
        self.active_slots().map(|(_, s)| s.engine_id).collect()
    }

    pub fn has_engine(&self, id: EngineId) -> bool {
        self.active_slots().any(|(_, s)| s.engine_id == id)
    }

    /// Index of the first bypass slot, if any.
    pub fn first_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(|s| !s.is_active())
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.validation_warnings.push(message.into());
    }

    /// Structural checks against the catalog. Returns the list of
    /// violations, empty when the preset is valid.
    pub fn validate(&self, catalog: &EngineCatalog) -> Vec<String> {
        let mut issues = Vec::new();
        for (i, slot) in self.slots.iter().enumerate() {
            let slot_no = i + 1;
            let engine = match catalog.get(slot.engine_id) {
                Some(e) => e,
                None => {
                    issues.push(format!("slot {} has unknown engine {}", slot_no, slot.engine_id));
                    continue;
                }
            };
            if slot.is_active() && engine.id.is_none() {
                issues.push(format!("slot {} active without an engine", slot_no));
            }
            if slot.params.len() != engine.param_count() {
                issues.push(format!(
                    "slot {} has {} params, {} expects {}",
                    slot_no,
                    slot.params.len(),
                    engine.name,
                    engine.param_count()
                ));
            }
            for (p, value) in slot.params.iter().enumerate() {
                if !value.is_finite() || !(0.0..=1.0).contains(value) {
                    issues.push(format!(
                        "slot {} param {} out of range: {}",
                        slot_no,
                        p + 1,
                        value
                    ));
                }
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{EngineCatalog, PLATE_REVERB, TAPE_ECHO};

    #[test]
    fn empty_preset_is_valid() {
        let catalog = EngineCatalog::builtin();
        let preset = Preset::empty();
        assert_eq!(preset.active_count(), 0);
        assert!(preset.validate(&catalog).is_empty());
    }

    #[test]
    fn default_for_places_blueprint_engines_at_midpoint() {
        let catalog = EngineCatalog::builtin();
        let mut blueprint = Blueprint::new("test");
        blueprint.push_engine(TAPE_ECHO, "");
        blueprint.push_engine(PLATE_REVERB, "");
        let preset = Preset::default_for(&blueprint, &catalog);

        assert_eq!(preset.active_count(), 2);
        assert_eq!(preset.slots[0].engine_id, TAPE_ECHO);
        assert_eq!(preset.slots[1].engine_id, PLATE_REVERB);
        assert!(preset.slots[0].params.iter().all(|p| *p == 0.5));
        assert!(preset.validate(&catalog).is_empty());
    }

    #[test]
    fn default_for_caps_at_slot_count() {
        let catalog = EngineCatalog::builtin();
        let mut blueprint = Blueprint::new("overfull");
        for _ in 0..8 {
            blueprint.push_engine(TAPE_ECHO, "");
        }
        let preset = Preset::default_for(&blueprint, &catalog);
        assert_eq!(preset.active_count(), SLOT_COUNT);
    }

    #[test]
    fn validate_flags_out_of_range_params() {
        let catalog = EngineCatalog::builtin();
        let mut preset = Preset::empty();
        preset.slots[0] = Slot::with_defaults(catalog.get(TAPE_ECHO).unwrap());
        preset.slots[0].params[1] = 1.4;
        let issues = preset.validate(&catalog);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("out of range"));
    }

    #[test]
    fn validate_flags_wrong_param_count() {
        let catalog = EngineCatalog::builtin();
        let mut preset = Preset::empty();
        preset.slots[2] = Slot::with_defaults(catalog.get(TAPE_ECHO).unwrap());
        preset.slots[2].params.pop();
        let issues = preset.validate(&catalog);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("expects"));
    }
}
