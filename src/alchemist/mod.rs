mod alchemist;
mod naming;
mod required;
mod safety;
mod signal_chain;

pub use alchemist::Alchemist;
pub use naming::NameGenerator;
pub use required::{required_engines, RequiredEngineRule, REQUIRED_ENGINE_RULES};
pub use safety::apply_safety_clamps;
pub use signal_chain::{chain_rank, reorder_signal_chain, signal_flow_string};
