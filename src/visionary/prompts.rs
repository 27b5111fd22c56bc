//! Prompt assembly for blueprint requests.
//!
//! The system prompt embeds the full engine list so the model picks ids
//! from the actual catalog instead of hallucinating them, and pins the
//! exact JSON shape the schema parser expects.

use crate::catalog::EngineCatalog;
use crate::visionary::routing::CharacterProfile;

pub fn system_prompt(catalog: &EngineCatalog) -> String {
    let mut engine_lines = String::new();
    for engine in catalog.iter().filter(|e| !e.id.is_none()) {
        engine_lines.push_str(&format!(
            "  {}: {} ({}) - {}\n",
            engine.id.raw(),
            engine.name,
            engine.category.label(),
            engine.hint
        ));
    }

    format!(
        r#"You are a sound designer translating a creative description into an audio effect blueprint.

Available engines (pick by numeric id):
{engine_lines}
Respond with JSON only, exactly this shape:
{{
  "slots": [
    {{"slot": 0, "engine_id": 15, "character": "warm drive"}},
    {{"slot": 1, "engine_id": 39, "character": "short dark space"}}
  ],
  "overall_vibe": "a few words capturing the sound"
}}

Rules:
- Use between 4 and 6 slots, each with a different engine id from the list.
- Order slots the way signal should flow (dynamics and EQ early, time effects late).
- "character" is a short phrase describing what that engine contributes.
- Do not invent engine ids. Do not wrap the JSON in markdown fences."#
    )
}

pub fn user_prompt(prompt: &str, profile: Option<&CharacterProfile>) -> String {
    match profile {
        Some(profile) => {
            let preferred = ids_list(profile.preferred);
            let forbidden = ids_list(profile.forbidden);
            format!(
                "Description: {prompt}\n\nThis calls for a \"{}\" character. \
                 Favor engine ids [{preferred}]. \
                 Never use engine ids [{forbidden}], they break the character.",
                profile.name
            )
        }
        None => format!(
            "Description: {prompt}\n\nLean on what you know about the referenced \
             artists, gear or places when picking engines."
        ),
    }
}

fn ids_list(ids: &[crate::catalog::EngineId]) -> String {
    ids.iter()
        .map(|id| id.raw().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
