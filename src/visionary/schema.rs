//! Blueprint wire schema.
//!
//! The model is told to answer with bare JSON but ships prose or markdown
//! fences often enough that we allow exactly one recovery attempt: extract
//! the outermost brace span and parse that. Anything else is an error the
//! caller turns into a fallback blueprint.

use serde::Deserialize;
use thiserror::Error;

use crate::catalog::{EngineCatalog, EngineId};
use crate::preset::{Blueprint, SLOT_COUNT};

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("response is not valid blueprint JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("response contains no JSON object")]
    NoJsonObject,
    #[error("blueprint has no usable slots")]
    NoUsableSlots,
}

#[derive(Debug, Deserialize)]
struct WireBlueprint {
    #[serde(default)]
    slots: Vec<WireSlot>,
    #[serde(default)]
    overall_vibe: String,
}

#[derive(Debug, Deserialize)]
struct WireSlot {
    // Engine ids arrive as whatever the model felt like. Signed so that
    // the -1 bypass convention some responses use deserializes cleanly.
    engine_id: i64,
    #[serde(default)]
    character: String,
}

#[derive(Debug)]
pub struct ParsedBlueprint {
    pub blueprint: Blueprint,
    /// True when the JSON had to be carved out of surrounding text.
    pub recovered: bool,
    /// Slots dropped for unknown or non-positive engine ids.
    pub dropped: usize,
}

pub fn parse_blueprint(text: &str, catalog: &EngineCatalog) -> Result<ParsedBlueprint, SchemaError> {
    let trimmed = text.trim();
    let (wire, recovered) = match serde_json::from_str::<WireBlueprint>(trimmed) {
        Ok(wire) => (wire, false),
        Err(first_err) => {
            let span = outermost_object(trimmed).ok_or(SchemaError::NoJsonObject)?;
            match serde_json::from_str::<WireBlueprint>(span) {
                Ok(wire) => (wire, true),
                Err(_) => return Err(SchemaError::Malformed(first_err)),
            }
        }
    };

    let mut blueprint = Blueprint::new(&wire.overall_vibe);
    let mut dropped = 0;
    for slot in wire.slots {
        if blueprint.active_count() >= SLOT_COUNT {
            dropped += 1;
            continue;
        }
        // Non-positive ids are the model bypassing a slot, not an error.
        if slot.engine_id <= 0 {
            continue;
        }
        let id = match u8::try_from(slot.engine_id) {
            Ok(raw) if catalog.contains(EngineId(raw)) => EngineId(raw),
            _ => {
                dropped += 1;
                continue;
            }
        };
        if blueprint.contains_engine(id) {
            dropped += 1;
            continue;
        }
        blueprint.push_engine(id, &slot.character);
    }

    if blueprint.active_count() == 0 {
        return Err(SchemaError::NoUsableSlots);
    }
    Ok(ParsedBlueprint {
        blueprint,
        recovered,
        dropped,
    })
}

/// Returns the span from the first `{` to its matching closing brace,
/// tracking string literals so braces inside values do not confuse the
/// balance count.
fn outermost_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
