use super::engine::EngineId;

/// Engine ids in the order the plugin's slot dropdown lists them: None
/// first, then the processing categories in chain order with utilities
/// before the special engines. The dropdown index is what the plugin
/// persists in sessions, so this table is part of the wire contract.
pub const CHOICE_ORDER: [u8; 57] = [
    0, // None
    1, 2, 3, 4, 5, // Dynamics
    6, 7, 8, // EQ
    9, 10, 11, 12, 13, 14, // Filter
    15, 16, 17, 18, 19, 20, 21, 22, // Distortion
    23, 24, 25, 26, 27, 28, 29, 30, // Modulation
    31, 32, 33, // Pitch
    34, 35, 36, 37, 38, // Delay
    39, 40, 41, 42, 43, // Reverb
    44, 45, 46, // Spatial
    53, 54, 55, 56, // Utility
    47, 48, 49, 50, 51, 52, // Special
];

/// Dropdown position of an engine id, if the id is defined.
pub fn choice_index_for(id: EngineId) -> Option<usize> {
    CHOICE_ORDER.iter().position(|x| *x == id.raw())
}

/// Engine id at a dropdown position.
pub fn engine_id_for(choice: usize) -> Option<EngineId> {
    CHOICE_ORDER.get(choice).map(|x| EngineId(*x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::EngineCatalog;
    use std::collections::HashSet;

    #[test]
    fn choice_order_is_a_permutation_of_the_catalog() {
        let catalog = EngineCatalog::builtin();
        let ids: HashSet<u8> = CHOICE_ORDER.iter().copied().collect();
        assert_eq!(ids.len(), CHOICE_ORDER.len(), "duplicate choice entries");
        for engine in catalog.iter() {
            assert!(ids.contains(&engine.id.raw()), "{} not listed", engine.name);
        }
    }

    #[test]
    fn round_trips_every_defined_id() {
        let catalog = EngineCatalog::builtin();
        for engine in catalog.iter() {
            let choice = choice_index_for(engine.id).unwrap();
            assert_eq!(engine_id_for(choice), Some(engine.id));
        }
    }

    #[test]
    fn none_is_the_first_choice() {
        assert_eq!(engine_id_for(0), Some(EngineId::NONE));
        assert_eq!(choice_index_for(EngineId::NONE), Some(0));
    }

    #[test]
    fn out_of_range_choice_maps_to_nothing() {
        assert_eq!(engine_id_for(57), None);
        assert_eq!(choice_index_for(EngineId(200)), None);
    }
}
