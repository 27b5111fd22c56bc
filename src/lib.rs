//! Trinity Preset Generation Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod alchemist;
pub mod calculator;
pub mod catalog;
pub mod config;
pub mod llm;
pub mod oracle;
pub mod pipeline;
pub mod preset;
pub mod server;
pub mod visionary;

// Re-export commonly used types for convenience
pub use pipeline::{GenerateOptions, TrinityPipeline};
pub use preset::{Blueprint, Preset};
pub use server::{run_server, RequestsLoggingLevel};
