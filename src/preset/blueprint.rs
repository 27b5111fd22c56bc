use crate::catalog::EngineId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Creative plan for a preset: which engine goes in which slot and with
/// what character. Produced by the generation stage, consumed by retrieval
/// and refinement. Slots holding the bypass engine are empty by definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Blueprint {
    pub slots: Vec<BlueprintSlot>,
    pub overall_vibe: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlueprintSlot {
    pub slot_index: usize,
    pub engine_id: EngineId,
    pub character: String,
}

impl Blueprint {
    pub fn new(vibe: &str) -> Self {
        Self {
            slots: Vec::new(),
            overall_vibe: vibe.to_owned(),
        }
    }

    pub fn push_engine(&mut self, engine_id: EngineId, character: &str) {
        let slot_index = self.slots.len();
        self.slots.push(BlueprintSlot {
            slot_index,
            engine_id,
            character: character.to_owned(),
        });
    }

    /// Engine ids of the non-empty slots, in slot order.
    pub fn active_engines(&self) -> Vec<EngineId> {
        self.slots
            .iter()
            .filter(|s| !s.engine_id.is_none())
            .map(|s| s.engine_id)
            .collect()
    }

    /// Distinct non-empty engine ids, for match counting.
    pub fn requested_ids(&self) -> HashSet<EngineId> {
        self.active_engines().into_iter().collect()
    }

    pub fn active_count(&self) -> usize {
        self.active_engines().len()
    }

    pub fn contains_engine(&self, id: EngineId) -> bool {
        self.slots.iter().any(|s| s.engine_id == id)
    }
}
