use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::calculator::nudges;
use crate::calculator::values::{self, ValueHint};
use crate::catalog::EngineCatalog;
use crate::llm::{CompletionOptions, LlmError, LlmProvider, Message};
use crate::pipeline::StageResult;
use crate::preset::{Blueprint, Preset};

/// Prompts shorter than this skip the model refinement pass, the rule
/// tables cover them fine.
const MIN_WORDS_FOR_REFINEMENT: usize = 8;

/// How many creative tweaks from the model are honored per request.
const MAX_CREATIVE_TWEAKS: usize = 2;

#[derive(Debug, Clone)]
pub struct CalculatorConfig {
    /// Weight of the keyword target when blending toward it.
    pub blend: f32,
    /// Whether the consolidated model refinement call runs at all.
    pub refinement: bool,
    pub options: CompletionOptions,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            blend: 0.7,
            refinement: true,
            options: CompletionOptions {
                json_response: true,
                ..CompletionOptions::default()
            },
        }
    }
}

/// Third pipeline stage. Parameter-only refinement: keyword tendencies,
/// explicit numbers from the prompt, global mix scaling, and optionally
/// one consolidated model call for richer prompts. Engine assignments
/// are never touched here.
pub struct Calculator {
    catalog: Arc<EngineCatalog>,
    provider: Arc<dyn LlmProvider>,
    config: CalculatorConfig,
}

impl Calculator {
    pub fn new(
        catalog: Arc<EngineCatalog>,
        provider: Arc<dyn LlmProvider>,
        config: CalculatorConfig,
    ) -> Self {
        Self {
            catalog,
            provider,
            config,
        }
    }

    pub async fn apply_nudges(
        &self,
        mut preset: Preset,
        prompt: &str,
        blueprint: &Blueprint,
    ) -> StageResult<Preset> {
        let nudged = self.apply_keyword_nudges(&mut preset, prompt);
        let set = self.apply_value_hints(&mut preset, prompt);
        self.scale_mix_levels(&mut preset, prompt);
        debug!("Nudged {nudged} params from keywords, {set} from explicit values");

        if self.config.refinement && word_count(prompt) >= MIN_WORDS_FOR_REFINEMENT {
            match self.model_refinement(&mut preset, prompt, blueprint).await {
                Ok(adjusted) => debug!("Model refinement adjusted {adjusted} params"),
                Err(e) => {
                    warn!("Model refinement failed, keeping rule-derived values: {e}");
                    return StageResult::degraded(
                        preset,
                        "model refinement unavailable, kept rule-derived parameters".to_string(),
                    );
                }
            }
        }

        StageResult::Clean(preset)
    }

    /// Blends parameters toward each matching rule's targets. The blend
    /// keeps repeated keywords from slamming values to the extremes.
    fn apply_keyword_nudges(&self, preset: &mut Preset, prompt: &str) -> usize {
        let blend = self.config.blend.clamp(0.0, 1.0);
        let mut touched = 0;
        for rule in nudges::matching_rules(prompt) {
            let Some(engine) = self.catalog.get(rule.engine) else {
                continue;
            };
            for slot in preset
                .slots
                .iter_mut()
                .filter(|s| s.is_active() && s.engine_id == rule.engine)
            {
                for (param, target) in rule.params {
                    let Some(index) = engine.param_index(param) else {
                        continue;
                    };
                    if let Some(value) = slot.params.get_mut(index) {
                        *value = (blend * target + (1.0 - blend) * *value).clamp(0.0, 1.0);
                        touched += 1;
                    }
                }
            }
        }
        touched
    }

    /// Explicit numbers override whatever the keyword blend produced.
    fn apply_value_hints(&self, preset: &mut Preset, prompt: &str) -> usize {
        let hints = values::extract_values(prompt);
        let mut set = 0;
        for ValueHint {
            param,
            value,
            category,
        } in hints
        {
            for slot in preset.slots.iter_mut().filter(|s| s.is_active()) {
                let Some(engine) = self.catalog.get(slot.engine_id) else {
                    continue;
                };
                if let Some(wanted) = category {
                    if engine.category != wanted {
                        continue;
                    }
                }
                let Some(index) = engine.param_index(param) else {
                    continue;
                };
                if let Some(current) = slot.params.get_mut(index) {
                    *current = value;
                    set += 1;
                }
            }
        }
        set
    }

    /// "subtle" halves every active mix level, "extreme" and "heavy"
    /// push them halfway toward full wet.
    fn scale_mix_levels(&self, preset: &mut Preset, prompt: &str) {
        let normalized = prompt.to_lowercase();
        let words: Vec<&str> = normalized
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let subtle = words.contains(&"subtle") || words.contains(&"gentle");
        let extreme = words.contains(&"extreme") || words.contains(&"heavy");
        if subtle == extreme {
            return;
        }
        for slot in preset.slots.iter_mut().filter(|s| s.is_active()) {
            let Some(index) = self.catalog.get(slot.engine_id).and_then(|e| e.mix_index()) else {
                continue;
            };
            if let Some(mix) = slot.params.get_mut(index) {
                *mix = if subtle {
                    *mix * 0.5
                } else {
                    (*mix + (1.0 - *mix) * 0.5).clamp(0.0, 1.0)
                };
            }
        }
    }

    /// One consolidated completion asking for style-matched values plus
    /// up to two creative tweaks. Replaces what used to be separate
    /// calls per concern, the round trips dominate latency.
    async fn model_refinement(
        &self,
        preset: &mut Preset,
        prompt: &str,
        blueprint: &Blueprint,
    ) -> Result<usize, LlmError> {
        let messages = [
            Message::system(REFINEMENT_SYSTEM_PROMPT),
            Message::user(self.refinement_request(preset, prompt, blueprint)),
        ];
        let response = self.provider.complete(&messages, &self.config.options).await?;
        let wire: WireRefinement = serde_json::from_str(response.text().trim())
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let mut adjusted = 0;
        for adjustment in wire
            .adjustments
            .iter()
            .chain(wire.creative.iter().take(MAX_CREATIVE_TWEAKS))
        {
            if self.apply_adjustment(preset, adjustment) {
                adjusted += 1;
            }
        }
        Ok(adjusted)
    }

    fn refinement_request(&self, preset: &Preset, prompt: &str, blueprint: &Blueprint) -> String {
        let mut lines = String::new();
        for (index, slot) in preset.active_slots() {
            let Some(engine) = self.catalog.get(slot.engine_id) else {
                continue;
            };
            let character = blueprint
                .slots
                .iter()
                .find(|s| s.engine_id == slot.engine_id)
                .map(|s| s.character.as_str())
                .unwrap_or("");
            let params: Vec<String> = engine
                .parameters
                .iter()
                .zip(slot.params.iter())
                .map(|(descriptor, value)| format!("{}={:.2}", descriptor.name, value))
                .collect();
            lines.push_str(&format!(
                "slot {index}: {} ({character}) [{}]\n",
                engine.name,
                params.join(", ")
            ));
        }
        format!("Description: {prompt}\n\nCurrent chain:\n{lines}")
    }

    fn apply_adjustment(&self, preset: &mut Preset, adjustment: &WireAdjustment) -> bool {
        let Some(slot) = preset.slots.get_mut(adjustment.slot) else {
            return false;
        };
        if !slot.is_active() {
            return false;
        }
        let Some(index) = self
            .catalog
            .get(slot.engine_id)
            .and_then(|e| e.param_index(&adjustment.param))
        else {
            return false;
        };
        let Some(value) = slot.params.get_mut(index) else {
            return false;
        };
        if !adjustment.value.is_finite() {
            return false;
        }
        *value = adjustment.value.clamp(0.0, 1.0);
        true
    }
}

const REFINEMENT_SYSTEM_PROMPT: &str = r#"You fine-tune audio effect parameters. All values are normalized to [0.0, 1.0].
Given a sound description and the current chain, respond with JSON only:
{
  "adjustments": [{"slot": 0, "param": "Decay", "value": 0.8}],
  "creative": [{"slot": 1, "param": "Wow", "value": 0.4}]
}
"adjustments" move parameters toward the described style, "creative" holds at most two unexpected touches. Use the exact parameter names shown. Keep the lists short, only include parameters worth moving."#;

#[derive(Debug, Deserialize)]
struct WireRefinement {
    #[serde(default)]
    adjustments: Vec<WireAdjustment>,
    #[serde(default)]
    creative: Vec<WireAdjustment>,
}

#[derive(Debug, Deserialize)]
struct WireAdjustment {
    slot: usize,
    param: String,
    value: f32,
}

fn word_count(prompt: &str) -> usize {
    prompt.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        CLASSIC_COMPRESSOR, EngineCatalog, PLATE_REVERB, TAPE_ECHO,
    };
    use crate::llm::{CompletionResponse, FinishReason};
    use async_trait::async_trait;

    struct ScriptedProvider {
        response: Option<String>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model(&self) -> &str {
            "scripted"
        }

        async fn complete(
            &self,
            _messages: &[Message],
            _options: &CompletionOptions,
        ) -> Result<CompletionResponse, LlmError> {
            match &self.response {
                Some(text) => Ok(CompletionResponse {
                    message: Message::assistant(text.clone()),
                    finish_reason: FinishReason::Stop,
                    usage: None,
                }),
                None => Err(LlmError::Connection("scripted outage".to_string())),
            }
        }

        async fn health_check(&self) -> Result<(), LlmError> {
            Ok(())
        }
    }

    fn fixture() -> (Arc<EngineCatalog>, Preset, Blueprint) {
        let catalog = Arc::new(EngineCatalog::builtin());
        let mut blueprint = Blueprint::new("test chain");
        blueprint.push_engine(TAPE_ECHO, "echo");
        blueprint.push_engine(CLASSIC_COMPRESSOR, "glue");
        blueprint.push_engine(PLATE_REVERB, "space");
        let mut preset = Preset::empty();
        for (i, id) in [TAPE_ECHO, CLASSIC_COMPRESSOR, PLATE_REVERB].iter().enumerate() {
            preset.slots[i] = crate::preset::Slot::with_defaults(catalog.get(*id).unwrap());
        }
        (catalog, preset, blueprint)
    }

    fn calculator(catalog: Arc<EngineCatalog>, response: Option<&str>) -> Calculator {
        Calculator::new(
            catalog,
            Arc::new(ScriptedProvider {
                response: response.map(str::to_string),
            }),
            CalculatorConfig::default(),
        )
    }

    fn param(catalog: &EngineCatalog, preset: &Preset, slot: usize, name: &str) -> f32 {
        let engine = catalog.get(preset.slots[slot].engine_id).unwrap();
        preset.slots[slot].params[engine.param_index(name).unwrap()]
    }

    #[tokio::test]
    async fn keyword_nudges_blend_toward_targets() {
        let (catalog, preset, blueprint) = fixture();
        let calc = calculator(catalog.clone(), None);
        // Short prompt, no refinement call. Tape Echo Tone starts at
        // the 0.5 schema default, the "dark" target is 0.3.
        let result = calc.apply_nudges(preset, "dark echo", &blueprint).await;
        assert!(!result.is_degraded());
        let preset = result.into_value();
        let tone = param(&catalog, &preset, 0, "Tone");
        assert!((tone - 0.36).abs() < 1e-5, "tone was {tone}");
    }

    #[tokio::test]
    async fn explicit_values_override_keyword_blend() {
        let (catalog, preset, blueprint) = fixture();
        let calc = calculator(catalog.clone(), None);
        let result = calc
            .apply_nudges(preset, "dark echo, 35% feedback", &blueprint)
            .await;
        let preset = result.into_value();
        assert!((param(&catalog, &preset, 0, "Feedback") - 0.35).abs() < 1e-6);
    }

    #[tokio::test]
    async fn ratio_lands_on_dynamics_engines_only() {
        let (catalog, preset, blueprint) = fixture();
        let calc = calculator(catalog.clone(), None);
        let result = calc.apply_nudges(preset, "4:1 compression", &blueprint).await;
        let preset = result.into_value();
        assert!((param(&catalog, &preset, 1, "Ratio") - 3.0 / 19.0).abs() < 1e-6);
    }

    #[tokio::test]
    async fn subtle_halves_mix_levels() {
        let (catalog, preset, blueprint) = fixture();
        let before = param(&catalog, &preset, 0, "Mix");
        let calc = calculator(catalog.clone(), None);
        let result = calc.apply_nudges(preset, "subtle color", &blueprint).await;
        let preset = result.into_value();
        assert!((param(&catalog, &preset, 0, "Mix") - before * 0.5).abs() < 1e-6);
    }

    #[tokio::test]
    async fn heavy_pushes_mix_toward_wet() {
        let (catalog, preset, blueprint) = fixture();
        let before = param(&catalog, &preset, 0, "Mix");
        let calc = calculator(catalog.clone(), None);
        let result = calc.apply_nudges(preset, "heavy wash", &blueprint).await;
        let preset = result.into_value();
        let expected = before + (1.0 - before) * 0.5;
        assert!((param(&catalog, &preset, 0, "Mix") - expected).abs() < 1e-6);
    }

    #[tokio::test]
    async fn refinement_failure_degrades_but_keeps_rule_values() {
        let (catalog, preset, blueprint) = fixture();
        let calc = calculator(catalog.clone(), None);
        let result = calc
            .apply_nudges(
                preset,
                "a long detailed dark echo chamber with lots of atmosphere everywhere",
                &blueprint,
            )
            .await;
        assert!(result.is_degraded());
        let preset = result.into_value();
        // The keyword pass still ran before the model call failed.
        assert!((param(&catalog, &preset, 0, "Tone") - 0.36).abs() < 1e-5);
    }

    #[tokio::test]
    async fn refinement_applies_adjustments_and_caps_creative() {
        let (catalog, preset, blueprint) = fixture();
        let response = r#"{
            "adjustments": [{"slot": 2, "param": "Decay", "value": 0.9}],
            "creative": [
                {"slot": 0, "param": "Wow", "value": 0.5},
                {"slot": 0, "param": "Flutter", "value": 0.5},
                {"slot": 0, "param": "Age", "value": 0.9}
            ]
        }"#;
        let calc = calculator(catalog.clone(), Some(response));
        let result = calc
            .apply_nudges(
                preset,
                "a long detailed prompt that goes on about space and texture",
                &blueprint,
            )
            .await;
        assert!(!result.is_degraded());
        let preset = result.into_value();
        assert_eq!(param(&catalog, &preset, 2, "Decay"), 0.9);
        assert_eq!(param(&catalog, &preset, 0, "Wow"), 0.5);
        assert_eq!(param(&catalog, &preset, 0, "Flutter"), 0.5);
        // Third creative tweak is past the cap, Age keeps its default.
        assert_eq!(param(&catalog, &preset, 0, "Age"), 0.25);
    }

    #[tokio::test]
    async fn refinement_rejects_bad_slots_and_clamps() {
        let (catalog, preset, blueprint) = fixture();
        let response = r#"{
            "adjustments": [
                {"slot": 5, "param": "Decay", "value": 0.9},
                {"slot": 9, "param": "Decay", "value": 0.9},
                {"slot": 2, "param": "Nonsense", "value": 0.9},
                {"slot": 2, "param": "Decay", "value": 7.5}
            ]
        }"#;
        let calc = calculator(catalog.clone(), Some(response));
        let result = calc
            .apply_nudges(
                preset,
                "a long detailed prompt that goes on about space and texture",
                &blueprint,
            )
            .await;
        let preset = result.into_value();
        // Inactive slot, out-of-range slot and unknown param are all
        // ignored, the oversized value clamps to 1.0.
        assert_eq!(param(&catalog, &preset, 2, "Decay"), 1.0);
        assert!(!preset.slots[5].is_active());
    }

    #[tokio::test]
    async fn never_changes_engine_assignments() {
        let (catalog, preset, blueprint) = fixture();
        let engines_before = preset.active_engine_ids();
        let calc = calculator(catalog, None);
        let result = calc
            .apply_nudges(preset, "dark subtle 35% feedback 4:1 slapback", &blueprint)
            .await;
        assert_eq!(result.into_value().active_engine_ids(), engines_before);
    }
}
