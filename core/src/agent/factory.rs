//! Agent Factory
//!
//! Assembles an [`Agent`] from its collaborators, either piece by piece or
//! straight from a loaded [`Config`].

use crate::agent::blackboard::Blackboard;
use crate::agent::core::{Agent, EventCallback};
use crate::agent::operator::Operator;
use crate::agent::sandbox::Workspace;
use crate::agent::tool::ToolContext;
use crate::agent::tool_registry::ToolRegistry;
use crate::agent::transcript::SessionLog;
use crate::config::Config;
use crate::error::SlateError;
use crate::llm::{LlmClient, LlmConfig, ModelClient};
use crate::rate_limiter::RateLimiter;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Builder for creating agents
pub struct AgentBuilder {
    model: Arc<dyn ModelClient>,
    ctx: ToolContext,
    tool_registry: ToolRegistry,
    rate_limiter: RateLimiter,
    transcript: SessionLog,
    exit_keywords: Vec<String>,
    event_callback: Option<EventCallback>,
}

impl std::fmt::Debug for AgentBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentBuilder")
            .field("model", &self.model.name())
            .field("tools", &self.tool_registry)
            .field("rate_limiter", &self.rate_limiter)
            .field("exit_keywords", &self.exit_keywords)
            .finish()
    }
}

impl AgentBuilder {
    /// Start from a model and a tool context, with every built-in tool,
    /// the default rate limit and no transcript
    pub fn new(model: Arc<dyn ModelClient>, ctx: ToolContext) -> Self {
        Self {
            model,
            ctx,
            tool_registry: ToolRegistry::with_defaults(),
            rate_limiter: RateLimiter::default(),
            transcript: SessionLog::disabled(),
            exit_keywords: vec!["quit".to_string(), "exit".to_string()],
            event_callback: None,
        }
    }

    /// Wire everything up from configuration
    ///
    /// Creates the workspace and log directory, opens the transcript and
    /// builds the HTTP client.
    pub fn from_config(
        config: &Config,
        operator: Arc<dyn Operator>,
        cancellation: CancellationToken,
    ) -> Result<Self, SlateError> {
        config.validate().map_err(|e| SlateError::Config {
            message: format!("{:#}", e),
        })?;

        let workspace = Workspace::open(config.workspace_dir())?;
        let transcript = SessionLog::create(&config.log_dir(), workspace.root())?;
        let client = LlmClient::new(LlmConfig::from(&config.endpoint)).map_err(|e| {
            SlateError::Config {
                message: e.to_string(),
            }
        })?;

        let ctx = ToolContext::new(workspace, Blackboard::new(), operator)
            .with_max_read_chars(config.agent.max_read_chars)
            .with_command_output_file(config.agent.command_output_file.clone())
            .with_cancellation(cancellation);

        Ok(Self::new(Arc::new(client), ctx)
            .with_tool_registry(
                ToolRegistry::with_defaults().with_marker(config.agent.tool_marker.clone()),
            )
            .with_rate_limiter(RateLimiter::from_millis(config.agent.rate_limit_ms))
            .with_transcript(transcript)
            .with_exit_keywords(config.agent.exit_keywords.clone()))
    }

    /// Replace the tool registry
    pub fn with_tool_registry(mut self, registry: ToolRegistry) -> Self {
        self.tool_registry = registry;
        self
    }

    pub fn with_rate_limiter(mut self, rate_limiter: RateLimiter) -> Self {
        self.rate_limiter = rate_limiter;
        self
    }

    pub fn with_transcript(mut self, transcript: SessionLog) -> Self {
        self.transcript = transcript;
        self
    }

    pub fn with_exit_keywords(mut self, keywords: Vec<String>) -> Self {
        self.exit_keywords = keywords;
        self
    }

    /// Receive an [`crate::agent::AgentEvent`] for each executed tool call
    pub fn with_event_callback(mut self, callback: EventCallback) -> Self {
        self.event_callback = Some(callback);
        self
    }

    pub fn build(self) -> Agent {
        Agent::from_parts(
            self.model,
            self.tool_registry,
            self.ctx,
            self.rate_limiter,
            self.transcript,
            self.exit_keywords,
            self.event_callback,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::operator::ScriptedOperator;
    use tempfile::TempDir;

    #[test]
    fn test_from_config_prepares_directories() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.agent.workspace_dir = temp.path().join("ws");
        config.agent.log_dir = temp.path().join("logs");
        config.agent.tool_marker = "ACTION:".to_string();

        let agent = AgentBuilder::from_config(
            &config,
            Arc::new(ScriptedOperator::default()),
            CancellationToken::new(),
        )
        .unwrap()
        .build();

        assert!(temp.path().join("ws").is_dir());
        let log = agent.transcript_path().unwrap();
        assert!(log.starts_with(temp.path().join("logs")));
        assert_eq!(agent.tools().marker(), "ACTION:");
        assert_eq!(agent.model_name(), "llama3.1-8B");
        assert!(agent.system_prompt().contains("ACTION: read_file(\"path\")"));
    }

    #[test]
    fn test_builder_debug_names_model() {
        let temp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.agent.workspace_dir = temp.path().join("ws");
        config.agent.log_dir = temp.path().join("logs");

        let builder = AgentBuilder::from_config(
            &config,
            Arc::new(ScriptedOperator::default()),
            CancellationToken::new(),
        )
        .unwrap();
        assert!(format!("{builder:?}").contains("llama3.1-8B"));
    }

    #[test]
    fn test_from_config_rejects_invalid_config() {
        let mut config = Config::default();
        config.endpoint.url = String::new();
        let err = AgentBuilder::from_config(
            &config,
            Arc::new(ScriptedOperator::default()),
            CancellationToken::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SlateError::Config { .. }));
    }
}
