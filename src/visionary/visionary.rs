use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::catalog::{self, EngineCatalog, EngineId};
use crate::llm::{CompletionOptions, LlmProvider, Message};
use crate::pipeline::StageResult;
use crate::preset::{Blueprint, Preset, SLOT_COUNT};
use crate::visionary::prompts;
use crate::visionary::routing::{route, CharacterProfile, PromptRoute};
use crate::visionary::schema::parse_blueprint;

/// Engines used to pad or replace a blueprint when nothing better is
/// known: a gentle compressor, an EQ, a chorus and a room. Safe on any
/// source material.
const GENERIC_ENGINES: [EngineId; 4] = [
    catalog::VINTAGE_OPTO_COMPRESSOR,
    catalog::PARAMETRIC_EQ,
    catalog::STEREO_CHORUS,
    catalog::PLATE_REVERB,
];

const MIN_ENGINES: usize = 4;

#[derive(Debug, Clone)]
pub struct VisionaryConfig {
    pub options: CompletionOptions,
}

impl Default for VisionaryConfig {
    fn default() -> Self {
        Self {
            options: CompletionOptions {
                json_response: true,
                ..CompletionOptions::default()
            },
        }
    }
}

/// First pipeline stage. Turns a free-text prompt into a [`Blueprint`]
/// by asking the language model which engines fit, then enforcing the
/// guardrails of the routed character profile. Never fails: when the
/// model is unreachable or answers garbage, a rule-derived blueprint is
/// returned with a degradation warning instead.
pub struct Visionary {
    catalog: Arc<EngineCatalog>,
    provider: Arc<dyn LlmProvider>,
    config: VisionaryConfig,
}

impl Visionary {
    pub fn new(
        catalog: Arc<EngineCatalog>,
        provider: Arc<dyn LlmProvider>,
        config: VisionaryConfig,
    ) -> Self {
        Self {
            catalog,
            provider,
            config,
        }
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    pub async fn get_blueprint(&self, prompt: &str) -> StageResult<Blueprint> {
        let prompt_route = route(prompt);
        let profile = match prompt_route {
            PromptRoute::RuleBased(profile) => {
                debug!("Prompt routed to '{}' character rules", profile.name);
                Some(profile)
            }
            PromptRoute::KnowledgeBased => {
                debug!("Prompt routed knowledge-based");
                None
            }
        };

        let messages = [
            Message::system(prompts::system_prompt(&self.catalog)),
            Message::user(prompts::user_prompt(prompt, profile)),
        ];

        let response = match self.provider.complete(&messages, &self.config.options).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Blueprint completion failed, falling back to rules: {e}");
                return StageResult::degraded(
                    self.fallback_blueprint(prompt, profile),
                    "language model unavailable, derived blueprint from rules".to_string(),
                );
            }
        };

        let parsed = match parse_blueprint(&response.text(), &self.catalog) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Blueprint response unusable ({e}), falling back to rules");
                return StageResult::degraded(
                    self.fallback_blueprint(prompt, profile),
                    "model response was not a usable blueprint, derived one from rules"
                        .to_string(),
                );
            }
        };
        if parsed.recovered {
            debug!("Recovered blueprint JSON from a wrapped response");
        }
        if parsed.dropped > 0 {
            debug!("Dropped {} blueprint slots with unusable engine ids", parsed.dropped);
        }

        let mut blueprint = parsed.blueprint;
        let mut warnings = Vec::new();

        if let Some(profile) = profile {
            let removed = retain_allowed(&mut blueprint, profile);
            if removed > 0 {
                warnings.push(format!(
                    "removed {removed} engines that clash with the '{}' character",
                    profile.name
                ));
            }
        }

        let padded = self.pad_to_minimum(&mut blueprint, profile);
        if padded > 0 {
            warnings.push(format!(
                "model picked too few engines, padded blueprint with {padded}"
            ));
        }

        if blueprint.overall_vibe.trim().is_empty() {
            blueprint.overall_vibe = profile
                .map(|p| p.vibe.to_string())
                .unwrap_or_else(|| prompt.to_string());
        }

        if warnings.is_empty() {
            StageResult::Clean(blueprint)
        } else {
            StageResult::Degraded(blueprint, warnings)
        }
    }

    /// Standalone convenience used outside the full pipeline: blueprint
    /// plus schema-default parameters, no retrieval behind it.
    pub async fn generate_complete_preset(&self, prompt: &str) -> StageResult<Preset> {
        let (blueprint, warnings) = self.get_blueprint(prompt).await.into_parts();
        let mut preset = Preset::default_for(&blueprint, &self.catalog);
        if warnings.is_empty() {
            StageResult::Clean(preset)
        } else {
            for warning in &warnings {
                preset.warn(warning.clone());
            }
            StageResult::Degraded(preset, warnings)
        }
    }

    fn fallback_blueprint(&self, prompt: &str, profile: Option<&CharacterProfile>) -> Blueprint {
        match profile {
            Some(profile) => {
                let mut blueprint = Blueprint::new(profile.vibe);
                for id in profile.preferred.iter().take(SLOT_COUNT) {
                    blueprint.push_engine(*id, profile.name);
                }
                self.pad_to_minimum(&mut blueprint, Some(profile));
                blueprint
            }
            None => {
                let mut blueprint = Blueprint::new(prompt);
                for id in GENERIC_ENGINES {
                    blueprint.push_engine(id, "default chain");
                }
                blueprint
            }
        }
    }

    /// Appends preferred then generic engines until the blueprint holds
    /// at least [`MIN_ENGINES`]. Returns how many were added.
    fn pad_to_minimum(&self, blueprint: &mut Blueprint, profile: Option<&CharacterProfile>) -> usize {
        let mut present: HashSet<EngineId> = blueprint.requested_ids();
        let forbidden: &[EngineId] = profile.map(|p| p.forbidden).unwrap_or(&[]);
        let preferred = profile.map(|p| p.preferred).unwrap_or(&[]);
        let mut added = 0;
        let candidates = preferred.iter().chain(GENERIC_ENGINES.iter());
        for id in candidates {
            if blueprint.active_count() >= MIN_ENGINES {
                break;
            }
            if present.contains(id) || forbidden.contains(id) {
                continue;
            }
            blueprint.push_engine(*id, "added to fill the chain");
            present.insert(*id);
            added += 1;
        }
        added
    }
}

fn retain_allowed(blueprint: &mut Blueprint, profile: &CharacterProfile) -> usize {
    let before = blueprint.active_count();
    blueprint
        .slots
        .retain(|slot| !profile.is_forbidden(slot.engine_id));
    before - blueprint.active_count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{
        EngineCatalog, LADDER_FILTER, MUFF_FUZZ, PARAMETRIC_EQ, SHIMMER_REVERB, TAPE_ECHO,
        VINTAGE_OPTO_COMPRESSOR, VINTAGE_TUBE_PREAMP,
    };
    use crate::llm::{CompletionResponse, FinishReason, LlmError};
    use async_trait::async_trait;

    /// Returns a canned response, or an error when no script is set.
    struct ScriptedProvider {
        response: Option<String>,
    }

    impl ScriptedProvider {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                response: Some(text.to_string()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { response: None })
        }
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

    fn visionary(provider: Arc<ScriptedProvider>) -> Visionary {
        Visionary::new(
            Arc::new(EngineCatalog::builtin()),
            provider,
            VisionaryConfig::default(),
        )
    }

    #[tokio::test]
    async fn clean_model_response_passes_through() {
        let provider = ScriptedProvider::replying(
            r#"{"slots":[{"engine_id":1},{"engine_id":7},{"engine_id":23},{"engine_id":39}],"overall_vibe":"studio polish"}"#,
        );
        let result = visionary(provider).get_blueprint("polished session sound").await;
        assert!(!result.is_degraded());
        let blueprint = result.into_value();
        assert_eq!(blueprint.active_count(), 4);
        assert_eq!(blueprint.overall_vibe, "studio polish");
    }

    #[tokio::test]
    async fn provider_outage_falls_back_to_profile_rules() {
        let result = visionary(ScriptedProvider::failing())
            .get_blueprint("burning molten lava leads")
            .await;
        assert!(result.is_degraded());
        let blueprint = result.into_value();
        assert!(blueprint.active_count() >= MIN_ENGINES);
        assert!(blueprint.contains_engine(MUFF_FUZZ));
        assert!(blueprint.contains_engine(VINTAGE_TUBE_PREAMP));
        assert!(!blueprint.contains_engine(SHIMMER_REVERB));
    }

    #[tokio::test]
    async fn provider_outage_without_profile_falls_back_generic() {
        let result = visionary(ScriptedProvider::failing())
            .get_blueprint("like that one record from 1973")
            .await;
        assert!(result.is_degraded());
        let blueprint = result.into_value();
        assert_eq!(blueprint.active_count(), GENERIC_ENGINES.len());
        assert!(blueprint.contains_engine(VINTAGE_OPTO_COMPRESSOR));
    }

    #[tokio::test]
    async fn forbidden_engines_are_filtered_for_rule_based_prompts() {
        // The model ignores the deny list and proposes shimmer and tape
        // echo for a molten prompt. Both must go, and the blueprint gets
        // padded back up to the minimum.
        let provider = ScriptedProvider::replying(
            r#"{"slots":[{"engine_id":42},{"engine_id":34},{"engine_id":20},{"engine_id":9}],"overall_vibe":"heat"}"#,
        );
        let result = visionary(provider).get_blueprint("scorched fire tone").await;
        assert!(result.is_degraded());
        let (blueprint, warnings) = result.into_parts();
        assert!(!blueprint.contains_engine(SHIMMER_REVERB));
        assert!(!blueprint.contains_engine(TAPE_ECHO));
        assert!(blueprint.contains_engine(MUFF_FUZZ));
        assert!(blueprint.contains_engine(LADDER_FILTER));
        assert!(blueprint.active_count() >= MIN_ENGINES);
        assert!(warnings.iter().any(|w| w.contains("clash")));
    }

    #[tokio::test]
    async fn sparse_model_response_is_padded() {
        let provider = ScriptedProvider::replying(
            r#"{"slots":[{"engine_id":7}],"overall_vibe":"thin"}"#,
        );
        let result = visionary(provider)
            .get_blueprint("just a touch of eq please")
            .await;
        assert!(result.is_degraded());
        let blueprint = result.into_value();
        assert!(blueprint.active_count() >= MIN_ENGINES);
        assert!(blueprint.contains_engine(PARAMETRIC_EQ));
    }

    #[tokio::test]
    async fn unusable_response_falls_back() {
        let provider = ScriptedProvider::replying("I am not able to help with that.");
        let result = visionary(provider).get_blueprint("frozen glacial pads").await;
        assert!(result.is_degraded());
        let blueprint = result.into_value();
        assert!(blueprint.active_count() >= MIN_ENGINES);
        assert!(!blueprint.contains_engine(VINTAGE_TUBE_PREAMP));
    }

    #[tokio::test]
    async fn complete_preset_uses_schema_defaults() {
        let provider = ScriptedProvider::replying(
            r#"{"slots":[{"engine_id":34},{"engine_id":15},{"engine_id":7},{"engine_id":39}],"overall_vibe":"worn"}"#,
        );
        let result = visionary(provider)
            .generate_complete_preset("worn tape warmth")
            .await;
        let preset = result.into_value();
        assert_eq!(preset.active_count(), 4);
        assert!(preset.has_engine(TAPE_ECHO));
        for (_, slot) in preset.active_slots() {
            assert!(slot.params.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }
}
