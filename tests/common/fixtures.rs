//! Test fixtures: a scripted model provider and a small retrieval corpus
//!
//! The scripted provider answers with canned texts in order, then fails
//! like an unreachable backend. That gives tests full control over what
//! "the model said" without any network involved.

use super::constants::*;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use trinity_server::catalog::{self, EngineCatalog};
use trinity_server::llm::{
    CompletionOptions, CompletionResponse, FinishReason, LlmError, LlmProvider, Message,
};
use trinity_server::oracle::{feature_vector, CorpusEntry, PresetCorpus};
use trinity_server::preset::{Preset, Slot};

/// Replays a fixed list of completion texts, one per call. Once the list
/// is exhausted every further call fails with a connection error, which
/// exercises the same degradation paths a dead backend would.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<String>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<String>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "canned"
    }

    async fn complete(
        &self,
        _messages: &[Message],
        _options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        let reply = self
            .replies
            .lock()
            .expect("scripted replies lock poisoned")
            .pop_front();
        match reply {
            Some(text) => Ok(CompletionResponse {
                message: Message::assistant(text),
                finish_reason: FinishReason::Stop,
                usage: None,
            }),
            None => Err(LlmError::Connection("script exhausted".to_owned())),
        }
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        Ok(())
    }
}

/// Builds the blueprint JSON the generation stage expects from the model.
pub fn blueprint_json(engines: &[(u8, &str)], vibe: &str) -> String {
    let slots: Vec<_> = engines
        .iter()
        .map(|(id, character)| json!({ "engine_id": id, "character": character }))
        .collect();
    json!({ "slots": slots, "overall_vibe": vibe }).to_string()
}

fn corpus_preset(catalog: &EngineCatalog, engines: &[catalog::EngineId]) -> Preset {
    let mut preset = Preset::empty();
    for (i, id) in engines.iter().enumerate() {
        let engine = catalog.get(*id).expect("fixture engine missing from catalog");
        preset.slots[i] = Slot::with_defaults(engine);
        // Planted marker, see CORPUS_MARKER_VALUE.
        preset.slots[i].params[0] = CORPUS_MARKER_VALUE;
    }
    preset
}

fn entry(
    catalog: &EngineCatalog,
    id: &str,
    name: &str,
    vibe: &str,
    engines: &[catalog::EngineId],
) -> CorpusEntry {
    let preset = corpus_preset(catalog, engines);
    let features = feature_vector(&preset, catalog);
    CorpusEntry {
        id: id.to_owned(),
        name: name.to_owned(),
        vibe: vibe.to_owned(),
        preset,
        features,
    }
}

/// Three reference presets with clearly separated engine sets, so tests
/// can predict which entry retrieval picks for a given blueprint.
pub fn create_test_corpus(catalog: &EngineCatalog) -> PresetCorpus {
    PresetCorpus::from_entries(vec![
        entry(
            catalog,
            CORPUS_WARM_TAPE_ID,
            "Warm Tape",
            "saturated vintage warmth",
            &[
                catalog::VINTAGE_OPTO_COMPRESSOR,
                catalog::VINTAGE_CONSOLE_EQ,
                catalog::VINTAGE_TUBE_PREAMP,
                catalog::TAPE_ECHO,
            ],
        ),
        entry(
            catalog,
            CORPUS_SHIMMER_PAD_ID,
            "Shimmer Pad",
            "wide glassy sustain",
            &[
                catalog::VINTAGE_OPTO_COMPRESSOR,
                catalog::STEREO_CHORUS,
                catalog::SHIMMER_REVERB,
                catalog::DIMENSION_EXPANDER,
            ],
        ),
        entry(
            catalog,
            CORPUS_GATED_DRUMS_ID,
            "Gated Drums",
            "explosive eighties punch",
            &[
                catalog::NOISE_GATE,
                catalog::TRANSIENT_SHAPER,
                catalog::PARAMETRIC_EQ,
                catalog::GATED_REVERB,
            ],
        ),
    ])
}
