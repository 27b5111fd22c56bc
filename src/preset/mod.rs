mod blueprint;
mod plugin_format;
mod preset;

pub use blueprint::{Blueprint, BlueprintSlot};
pub use plugin_format::{from_plugin_params, to_plugin_params, PluginFormatError};
pub use preset::{Preset, PresetSource, Slot, SLOT_COUNT};
