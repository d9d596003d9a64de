//! HTTP model client
//!
//! Talks to a chat endpoint that takes the whole conversation plus a system
//! prompt and answers with plain text, optionally followed by a statistics
//! block which is stripped before the driver sees it.

use super::{ChatMessage, LlmConfig, ModelClient, ModelReply};
use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client as HttpClient};
use serde::Serialize;

/// Longest error body kept in [`LlmError::Status`]
const MAX_ERROR_BODY: usize = 500;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatOptions<'a> {
    selected_model: &'a str,
    system_prompt: &'a str,
    top_k: u32,
}

#[derive(Debug, Serialize)]
struct ChatPayload<'a> {
    messages: &'a [ChatMessage],
    #[serde(rename = "chatOptions")]
    chat_options: ChatOptions<'a>,
    attachment: Option<()>,
}

/// Main model client
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: LlmConfig,
    http_client: HttpClient,
}

impl LlmClient {
    /// Create a new client
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http_client = HttpClient::builder()
            .timeout(config.timeout)
            .user_agent(concat!("slate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn payload<'a>(
        &'a self,
        history: &'a [ChatMessage],
        system_prompt: &'a str,
    ) -> ChatPayload<'a> {
        ChatPayload {
            messages: history,
            chat_options: ChatOptions {
                selected_model: &self.config.model,
                system_prompt,
                top_k: self.config.top_k,
            },
            attachment: None,
        }
    }
}

#[async_trait]
impl ModelClient for LlmClient {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn send(
        &self,
        history: &[ChatMessage],
        system_prompt: &str,
    ) -> Result<ModelReply, LlmError> {
        tracing::debug!(
            url = %self.config.url,
            model = %self.config.model,
            messages = history.len(),
            prompt_chars = system_prompt.len(),
            "chat request"
        );

        let response = self
            .http_client
            .post(&self.config.url)
            .header(CONTENT_TYPE, "application/json")
            .json(&self.payload(history, system_prompt))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let body: String = text.chars().take(MAX_ERROR_BODY).collect();
            tracing::warn!(status = status.as_u16(), "chat request rejected");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply = ModelReply::from_raw(text, &self.config.stats_sentinel);
        tracing::debug!(
            raw_chars = reply.raw.len(),
            visible_chars = reply.visible.len(),
            "chat response"
        );
        Ok(reply)
    }
}
