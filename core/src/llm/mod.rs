//! Model client abstraction
//!
//! The conversation driver only needs one operation: send the history and a
//! system prompt, get text back. [`ModelClient`] is that seam; [`LlmClient`]
//! is the HTTP implementation.

pub mod chat;
pub mod client;

pub use chat::{ChatMessage, MessageRole};
pub use client::LlmClient;

use crate::error::LlmError;
use async_trait::async_trait;
use std::time::Duration;

/// Default chat endpoint
pub const DEFAULT_ENDPOINT: &str = "https://chatjimmy.ai/api/chat";
/// Default model identifier
pub const DEFAULT_MODEL: &str = "llama3.1-8B";
/// Marker that starts the trailing statistics block in replies
pub const STATS_SENTINEL: &str = "<|stats|>";

/// Connection settings for [`LlmClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub url: String,
    pub model: String,
    pub top_k: u32,
    pub timeout: Duration,
    pub stats_sentinel: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            top_k: 8,
            timeout: Duration::from_secs(300),
            stats_sentinel: STATS_SENTINEL.to_string(),
        }
    }
}

/// One model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    /// Body exactly as received, kept for the transcript
    pub raw: String,
    /// Body with the statistics block removed, trimmed
    pub visible: String,
}

impl ModelReply {
    /// Split a raw body at the first `sentinel` and trim what precedes it
    pub fn from_raw(raw: impl Into<String>, sentinel: &str) -> Self {
        let raw = raw.into();
        let visible = match (sentinel.is_empty(), raw.find(sentinel)) {
            (false, Some(idx)) => &raw[..idx],
            _ => raw.as_str(),
        }
        .trim()
        .to_string();
        Self { raw, visible }
    }
}

/// Anything that can answer a conversation
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Short identifier for logs and the banner
    fn name(&self) -> &str;

    /// Send the full history with the current system prompt
    async fn send(&self, history: &[ChatMessage], system_prompt: &str)
        -> Result<ModelReply, LlmError>;
}
