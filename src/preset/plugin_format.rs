//! The flat key-value form the plugin loads: `slot{N}_engine`,
//! `slot{N}_bypass` and `slot{N}_param{P}` with N in 1..=6 and P 1-based
//! over the engine's declared parameter count. Key names and value ranges
//! are contractual, the plugin parses them bit for bit.

use super::preset::{Preset, PresetSource, Slot, SLOT_COUNT};
use crate::catalog::{EngineCatalog, EngineId};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum PluginFormatError {
    #[error("slot {slot} references unknown engine id {id}")]
    UnknownEngine { slot: usize, id: u8 },
    #[error("key {key} holds a non-integral engine id: {value}")]
    FractionalEngine { key: String, value: f32 },
    #[error("key {key} out of range: {value}")]
    ValueOutOfRange { key: String, value: f32 },
}

/// Serializes a preset into the plugin's flat parameter map. Every slot
/// emits its engine and bypass keys; parameter keys follow the slot's
/// actual vector, so a validated preset round-trips exactly.
pub fn to_plugin_params(preset: &Preset) -> BTreeMap<String, f32> {
    let mut map = BTreeMap::new();
    for (i, slot) in preset.slots.iter().enumerate() {
        let n = i + 1;
        map.insert(format!("slot{}_engine", n), slot.engine_id.raw() as f32);
        map.insert(
            format!("slot{}_bypass", n),
            if slot.bypass { 1.0 } else { 0.0 },
        );
        for (p, value) in slot.params.iter().enumerate() {
            map.insert(format!("slot{}_param{}", n, p + 1), *value);
        }
    }
    map
}

/// Parses a flat parameter map back into a typed preset. Missing engine
/// keys leave the slot empty; missing parameter keys fall back to the
/// engine's schema default. Unknown engines and out-of-range values are
/// rejected, corpus ingestion reports them per entry.
pub fn from_plugin_params(
    params: &HashMap<String, f32>,
    catalog: &EngineCatalog,
) -> Result<Preset, PluginFormatError> {
    let mut preset = Preset::empty();
    preset.source = PresetSource::OracleAdapted;
    for i in 0..SLOT_COUNT {
        let n = i + 1;
        let engine_key = format!("slot{}_engine", n);
        let raw_engine = match params.get(&engine_key) {
            Some(v) => *v,
            None => continue,
        };
        if raw_engine.fract() != 0.0 || raw_engine < 0.0 || raw_engine > u8::MAX as f32 {
            return Err(PluginFormatError::FractionalEngine {
                key: engine_key,
                value: raw_engine,
            });
        }
        let engine_id = EngineId(raw_engine as u8);
        let engine = catalog
            .get(engine_id)
            .ok_or(PluginFormatError::UnknownEngine {
                slot: n,
                id: engine_id.raw(),
            })?;

        let bypass = match params.get(&format!("slot{}_bypass", n)) {
            Some(v) => *v >= 0.5,
            None => engine_id.is_none(),
        };

        let mut values = Vec::with_capacity(engine.param_count());
        for p in 0..engine.param_count() {
            let key = format!("slot{}_param{}", n, p + 1);
            let value = match params.get(&key) {
                Some(v) => *v,
                None => engine.parameters[p].default,
            };
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(PluginFormatError::ValueOutOfRange { key, value });
            }
            values.push(value);
        }
        preset.slots[i] = Slot {
            engine_id,
            bypass,
            params: values,
        };
    }
    Ok(preset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{SPRING_REVERB, TAPE_ECHO};

    fn sample_preset(catalog: &EngineCatalog) -> Preset {
        let mut preset = Preset::empty();
        preset.slots[0] = Slot::with_defaults(catalog.get(TAPE_ECHO).unwrap());
        preset.slots[0].params[1] = 0.62;
        preset.slots[3] = Slot::with_defaults(catalog.get(SPRING_REVERB).unwrap());
        preset
    }

    #[test]
    fn emits_all_slot_keys() {
        let catalog = EngineCatalog::builtin();
        let map = to_plugin_params(&sample_preset(&catalog));

        assert_eq!(map.get("slot1_engine"), Some(&(TAPE_ECHO.raw() as f32)));
        assert_eq!(map.get("slot1_bypass"), Some(&0.0));
        assert_eq!(map.get("slot1_param2"), Some(&0.62));
        assert_eq!(map.get("slot2_engine"), Some(&0.0));
        assert_eq!(map.get("slot2_bypass"), Some(&1.0));
        assert_eq!(map.get("slot4_engine"), Some(&(SPRING_REVERB.raw() as f32)));
        // Empty slots carry no parameter keys.
        assert!(map.get("slot2_param1").is_none());
    }

    #[test]
    fn round_trips_exactly() {
        let catalog = EngineCatalog::builtin();
        let original = sample_preset(&catalog);
        let flat: HashMap<String, f32> = to_plugin_params(&original).into_iter().collect();
        let parsed = from_plugin_params(&flat, &catalog).unwrap();
        assert_eq!(parsed.slots, original.slots);
    }

    #[test]
    fn missing_params_fall_back_to_schema_defaults() {
        let catalog = EngineCatalog::builtin();
        let mut flat = HashMap::new();
        flat.insert("slot1_engine".to_owned(), TAPE_ECHO.raw() as f32);
        flat.insert("slot1_bypass".to_owned(), 0.0);
        let parsed = from_plugin_params(&flat, &catalog).unwrap();
        let engine = catalog.get(TAPE_ECHO).unwrap();
        assert_eq!(parsed.slots[0].params, engine.default_params());
    }

    #[test]
    fn rejects_unknown_engine() {
        let catalog = EngineCatalog::builtin();
        let mut flat = HashMap::new();
        flat.insert("slot1_engine".to_owned(), 200.0);
        let err = from_plugin_params(&flat, &catalog).unwrap_err();
        assert_eq!(err, PluginFormatError::UnknownEngine { slot: 1, id: 200 });
    }

    #[test]
    fn rejects_out_of_range_param() {
        let catalog = EngineCatalog::builtin();
        let mut flat = HashMap::new();
        flat.insert("slot1_engine".to_owned(), TAPE_ECHO.raw() as f32);
        flat.insert("slot1_param1".to_owned(), 1.8);
        assert!(matches!(
            from_plugin_params(&flat, &catalog),
            Err(PluginFormatError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_fractional_engine_id() {
        let catalog = EngineCatalog::builtin();
        let mut flat = HashMap::new();
        flat.insert("slot1_engine".to_owned(), 34.5);
        assert!(matches!(
            from_plugin_params(&flat, &catalog),
            Err(PluginFormatError::FractionalEngine { .. })
        ));
    }
}
