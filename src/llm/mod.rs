//! LLM provider abstraction layer.
//!
//! A trait-based abstraction over chat-completion backends, so the
//! generation and refinement stages can work against OpenAI-compatible
//! services, a caching wrapper, or scripted providers in tests.

mod cache;
mod openai;
mod provider;
mod types;

pub use cache::CachedProvider;
pub use openai::{ApiKeySource, OpenAiProvider};
#[cfg(feature = "mock")]
pub use provider::MockLlmProvider;
pub use provider::{CompletionOptions, LlmError, LlmProvider, NullProvider};
pub use types::{CompletionResponse, FinishReason, Message, MessageRole, TokenUsage};
