//! In-memory LLM response cache.
//!
//! Repeated prompts are common when users iterate on a preset, and every
//! provider round trip costs seconds. Responses are cached by a content
//! hash of the full request; the lock only guards the map itself, never a
//! provider call, so concurrent distinct requests proceed in parallel.

use super::provider::{CompletionOptions, LlmError, LlmProvider};
use super::types::{CompletionResponse, Message, MessageRole};
use crate::server::metrics;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

const DEFAULT_CAPACITY: usize = 256;

struct CacheState {
    entries: HashMap<String, CompletionResponse>,
    order: VecDeque<String>,
}

pub struct CachedProvider {
    inner: Arc<dyn LlmProvider>,
    state: Mutex<CacheState>,
    capacity: usize,
}

impl CachedProvider {
    pub fn new(inner: Arc<dyn LlmProvider>) -> Self {
        Self::with_capacity(inner, DEFAULT_CAPACITY)
    }

    pub fn with_capacity(inner: Arc<dyn LlmProvider>, capacity: usize) -> Self {
        Self {
            inner,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
        }
    }

    fn cache_key(&self, messages: &[Message], options: &CompletionOptions) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.inner.model().as_bytes());
        for message in messages {
            hasher.update([match message.role {
                MessageRole::System => 0u8,
                MessageRole::User => 1,
                MessageRole::Assistant => 2,
            }]);
            hasher.update(message.content.as_bytes());
            hasher.update([0xff]);
        }
        hasher.update(options.temperature.to_le_bytes());
        hasher.update(options.max_tokens.unwrap_or(0).to_le_bytes());
        hasher.update([options.json_response as u8]);
        format!("{:x}", hasher.finalize())
    }
}

#[async_trait]
impl LlmProvider for CachedProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn model(&self) -> &str {
        self.inner.model()
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, LlmError> {
        let key = self.cache_key(messages, options);

        {
            let state = self.state.lock().await;
            if let Some(hit) = state.entries.get(&key) {
                debug!(key = %&key[..12], "LLM cache hit");
                metrics::record_llm_cache(true);
                return Ok(hit.clone());
            }
        }
        metrics::record_llm_cache(false);

        let response = self.inner.complete(messages, options).await?;

        let mut state = self.state.lock().await;
        if !state.entries.contains_key(&key) {
            state.order.push_back(key.clone());
            if state.order.len() > self.capacity {
                if let Some(evicted) = state.order.pop_front() {
                    state.entries.remove(&evicted);
                }
            }
        }
        state.entries.insert(key, response.clone());
        Ok(response)
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        self.inner.health_check().await
    }
}
