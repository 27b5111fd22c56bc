mod prompts;
mod routing;
mod schema;
mod visionary;

pub use routing::{route, CharacterProfile, PromptRoute, PROFILES};
pub use schema::{parse_blueprint, ParsedBlueprint, SchemaError};
pub use visionary::{Visionary, VisionaryConfig};
