//! Canonical slot ordering.
//!
//! Downstream DSP quality depends on chain order: compression before
//! saturation, time effects after tone shaping, reverbs near the end.
//! Active slots are stable-sorted by category rank, so engines sharing a
//! category keep their relative order and re-running the sort is a no-op.

use crate::catalog::{EngineCatalog, EngineCategory};
use crate::preset::{Preset, Slot};

/// Position of a category in the canonical chain. Lower runs earlier.
pub fn chain_rank(category: EngineCategory) -> usize {
    match category {
        EngineCategory::Dynamics => 0,
        EngineCategory::Eq => 1,
        EngineCategory::Filter => 2,
        EngineCategory::Distortion => 3,
        EngineCategory::Modulation => 4,
        EngineCategory::Delay => 5,
        EngineCategory::Reverb => 6,
        EngineCategory::Spatial => 7,
        EngineCategory::Pitch => 8,
        EngineCategory::Utility => 9,
        EngineCategory::Special => 10,
    }
}

/// Reorders active slots into canonical category order, packing them at
/// the front. Returns true when any slot changed position.
pub fn reorder_signal_chain(preset: &mut Preset, catalog: &EngineCatalog) -> bool {
    let mut active: Vec<Slot> = preset
        .slots
        .iter()
        .filter(|s| s.is_active())
        .cloned()
        .collect();
    active.sort_by_key(|slot| {
        catalog
            .category_of(slot.engine_id)
            .map(chain_rank)
            .unwrap_or(usize::MAX)
    });

    let mut reordered = Preset::empty().slots;
    for (i, slot) in active.into_iter().enumerate() {
        reordered[i] = slot;
    }
    let changed = reordered
        .iter()
        .zip(preset.slots.iter())
        .any(|(a, b)| a.engine_id != b.engine_id);
    preset.slots = reordered;
    changed
}

/// Human-readable chain summary, active engine names front to back.
pub fn signal_flow_string(preset: &Preset, catalog: &EngineCatalog) -> String {
    preset
        .active_slots()
        .map(|(_, slot)| catalog.name_of(slot.engine_id))
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        CLASSIC_COMPRESSOR, EngineCatalog, LADDER_FILTER, PLATE_REVERB, STEREO_CHORUS, TAPE_ECHO,
    };

    fn preset_with(catalog: &EngineCatalog, ids: &[crate::catalog::EngineId]) -> Preset {
        let mut preset = Preset::empty();
        for (i, id) in ids.iter().enumerate() {
            preset.slots[i] = Slot::with_defaults(catalog.get(*id).unwrap());
        }
        preset
    }

    #[test]
    fn sorts_into_category_order() {
        let catalog = EngineCatalog::builtin();
        let mut preset = preset_with(
            &catalog,
            &[PLATE_REVERB, CLASSIC_COMPRESSOR, TAPE_ECHO, LADDER_FILTER],
        );
        assert!(reorder_signal_chain(&mut preset, &catalog));
        assert_eq!(
            preset.active_engine_ids(),
            vec![CLASSIC_COMPRESSOR, LADDER_FILTER, TAPE_ECHO, PLATE_REVERB]
        );
    }

    #[test]
    fn reordering_is_idempotent() {
        let catalog = EngineCatalog::builtin();
        let mut preset = preset_with(
            &catalog,
            &[PLATE_REVERB, CLASSIC_COMPRESSOR, TAPE_ECHO, LADDER_FILTER],
        );
        reorder_signal_chain(&mut preset, &catalog);
        let ordered = preset.clone();
        assert!(!reorder_signal_chain(&mut preset, &catalog));
        assert_eq!(preset, ordered);
    }

    #[test]
    fn gaps_pack_to_the_front() {
        let catalog = EngineCatalog::builtin();
        let mut preset = Preset::empty();
        preset.slots[1] = Slot::with_defaults(catalog.get(TAPE_ECHO).unwrap());
        preset.slots[4] = Slot::with_defaults(catalog.get(CLASSIC_COMPRESSOR).unwrap());
        reorder_signal_chain(&mut preset, &catalog);
        assert_eq!(preset.slots[0].engine_id, CLASSIC_COMPRESSOR);
        assert_eq!(preset.slots[1].engine_id, TAPE_ECHO);
        assert!(!preset.slots[2].is_active());
    }

    #[test]
    fn same_category_preserves_relative_order() {
        let catalog = EngineCatalog::builtin();
        let mut preset = preset_with(&catalog, &[TAPE_ECHO, STEREO_CHORUS, PLATE_REVERB]);
        // Chorus moves ahead of the delay, nothing else swaps.
        reorder_signal_chain(&mut preset, &catalog);
        assert_eq!(
            preset.active_engine_ids(),
            vec![STEREO_CHORUS, TAPE_ECHO, PLATE_REVERB]
        );
    }

    #[test]
    fn flow_string_reads_front_to_back() {
        let catalog = EngineCatalog::builtin();
        let mut preset = preset_with(&catalog, &[CLASSIC_COMPRESSOR, TAPE_ECHO]);
        reorder_signal_chain(&mut preset, &catalog);
        assert_eq!(
            signal_flow_string(&preset, &catalog),
            "Classic Compressor -> Tape Echo"
        );
    }
}
