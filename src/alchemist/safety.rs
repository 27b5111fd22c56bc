//! Parameter safety rails.
//!
//! The plugin will happily run a delay at 99% feedback into a resonant
//! filter on the edge of self-oscillation. These clamps keep generated
//! presets out of runaway-gain territory; every intervention is recorded
//! as a warning on the preset.

use crate::catalog::{EngineCatalog, EngineCategory};
use crate::preset::Preset;

const FEEDBACK_CEILING: f32 = 0.98;
const FEEDBACK_SAFE: f32 = 0.95;
const SHORT_TIME_FEEDBACK_LIMIT: f32 = 0.95;
const SHORT_TIME_FEEDBACK_SAFE: f32 = 0.85;
const SHORT_TIME_THRESHOLD: f32 = 0.2;
const RESONANCE_CEILING: f32 = 0.97;
const RESONANCE_SAFE: f32 = 0.9;

/// Applies all safety rules in place and returns the warnings produced.
pub fn apply_safety_clamps(preset: &mut Preset, catalog: &EngineCatalog) -> Vec<String> {
    let mut warnings = Vec::new();

    for (index, slot) in preset.slots.iter_mut().enumerate() {
        if !slot.is_active() {
            continue;
        }
        let Some(engine) = catalog.get(slot.engine_id) else {
            continue;
        };
        let slot_no = index + 1;

        // Out-of-range and non-finite values first, the combination
        // rules below assume sane inputs.
        for (p, value) in slot.params.iter_mut().enumerate() {
            if !value.is_finite() {
                let fallback = engine.parameters.get(p).map(|d| d.default).unwrap_or(0.5);
                warnings.push(format!(
                    "slot {slot_no} {} param {} was not a number, reset to {fallback}",
                    engine.name,
                    p + 1
                ));
                *value = fallback;
            } else if *value < 0.0 || *value > 1.0 {
                warnings.push(format!(
                    "slot {slot_no} {} param {} clamped from {value}",
                    engine.name,
                    p + 1
                ));
                *value = value.clamp(0.0, 1.0);
            }
        }

        let feedback = engine.param_index("Feedback");
        let time = engine.param_index("Time");

        // Short delay times with near-total feedback build up faster
        // than the limiter downstream can catch.
        if engine.category == EngineCategory::Delay {
            if let (Some(fb), Some(t)) = (feedback, time) {
                let short = slot.params.get(t).copied().unwrap_or(0.5) < SHORT_TIME_THRESHOLD;
                if short {
                    if let Some(value) = slot.params.get_mut(fb) {
                        if *value > SHORT_TIME_FEEDBACK_LIMIT {
                            warnings.push(format!(
                                "slot {slot_no} {}: feedback {value:.2} on a short delay, reduced to {SHORT_TIME_FEEDBACK_SAFE}",
                                engine.name
                            ));
                            *value = SHORT_TIME_FEEDBACK_SAFE;
                        }
                    }
                }
            }
        }

        if let Some(fb) = feedback {
            if let Some(value) = slot.params.get_mut(fb) {
                if *value > FEEDBACK_CEILING {
                    warnings.push(format!(
                        "slot {slot_no} {}: feedback {value:.2} risks runaway, reduced to {FEEDBACK_SAFE}",
                        engine.name
                    ));
                    *value = FEEDBACK_SAFE;
                }
            }
        }

        if let Some(res) = engine.param_index("Resonance") {
            if let Some(value) = slot.params.get_mut(res) {
                if *value > RESONANCE_CEILING {
                    warnings.push(format!(
                        "slot {slot_no} {}: resonance {value:.2} would self-oscillate, reduced to {RESONANCE_SAFE}",
                        engine.name
                    ));
                    *value = RESONANCE_SAFE;
                }
            }
        }
    }

    warnings
}
