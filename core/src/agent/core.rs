//! Agent Core Implementation
//!
//! The conversation driver. Each user input starts a turn: the model is
//! called, and while its reply carries a tool-call line the call is executed
//! and the result is fed back as the next user message. The first reply
//! without a tool call ends the turn and is returned to the caller.

use crate::agent::prompt::SystemPrompt;
use crate::agent::protocol::find_tool_call_line;
use crate::agent::tool::ToolContext;
use crate::agent::tool_registry::ToolRegistry;
use crate::agent::transcript::SessionLog;
use crate::error::SlateError;
use crate::llm::{ChatMessage, ModelClient};
use crate::rate_limiter::{RateLimitStatus, RateLimiter};
use std::path::Path;
use std::sync::Arc;

/// Where the driver is in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    AwaitingUserInput,
    AwaitingModelResponse,
    ProcessingToolCall,
    Finished,
}

/// How a call to [`Agent::submit`] ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input; nothing happened
    Ignored,
    /// An exit keyword ended the session
    Exit,
    /// The host cancelled the session mid-turn
    Cancelled,
    /// Final reply of the turn, statistics block removed
    Reply(String),
}

/// Progress notifications emitted during a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// A tool call was executed
    ToolCall { line: String, result: String },
}

/// Callback for [`AgentEvent`]s
pub type EventCallback = Arc<dyn Fn(&AgentEvent) + Send + Sync>;

/// The core Agent that manages the tool loop.
pub struct Agent {
    model: Arc<dyn ModelClient>,
    tools: ToolRegistry,
    ctx: ToolContext,
    prompt: SystemPrompt,
    rate_limiter: RateLimiter,
    transcript: SessionLog,
    exit_keywords: Vec<String>,
    event_callback: Option<EventCallback>,

    history: Vec<ChatMessage>,
    state: AgentState,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("model", &self.model.name())
            .field("tools", &self.tools)
            .field("state", &self.state)
            .field("history_len", &self.history.len())
            .finish()
    }
}

impl Agent {
    pub(crate) fn from_parts(
        model: Arc<dyn ModelClient>,
        tools: ToolRegistry,
        ctx: ToolContext,
        rate_limiter: RateLimiter,
        transcript: SessionLog,
        exit_keywords: Vec<String>,
        event_callback: Option<EventCallback>,
    ) -> Self {
        let prompt = SystemPrompt::new(&tools, ctx.workspace.root(), &ctx.command_output_file);
        Self {
            model,
            tools,
            ctx,
            prompt,
            rate_limiter,
            transcript,
            exit_keywords,
            event_callback,
            history: Vec::new(),
            state: AgentState::AwaitingUserInput,
        }
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Conversation so far, oldest first
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn context(&self) -> &ToolContext {
        &self.ctx
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn transcript_path(&self) -> Option<&Path> {
        self.transcript.path()
    }

    /// The prompt the next model call would receive
    pub fn system_prompt(&self) -> String {
        self.prompt.render(&self.ctx.blackboard)
    }

    /// Model requests made so far and the pause applied before each
    pub fn rate_limit_status(&self) -> RateLimitStatus {
        self.rate_limiter.status()
    }

    fn is_exit_keyword(&self, input: &str) -> bool {
        self.exit_keywords
            .iter()
            .any(|keyword| keyword.eq_ignore_ascii_case(input))
    }

    fn emit(&self, event: AgentEvent) {
        if let Some(callback) = &self.event_callback {
            callback(&event);
        }
    }

    /// Run one user turn to completion
    pub async fn submit(&mut self, input: &str) -> Result<TurnOutcome, SlateError> {
        if self.state == AgentState::Finished {
            return Err(SlateError::SessionFinished);
        }

        let input = input.trim();
        if input.is_empty() {
            return Ok(TurnOutcome::Ignored);
        }
        if self.is_exit_keyword(input) {
            tracing::info!("exit keyword received");
            self.finish();
            return Ok(TurnOutcome::Exit);
        }

        self.transcript.user(input);
        self.history.push(ChatMessage::user(input));
        self.state = AgentState::AwaitingModelResponse;

        loop {
            if self.ctx.is_cancelled() {
                tracing::info!("session cancelled mid-turn");
                self.finish();
                return Ok(TurnOutcome::Cancelled);
            }

            self.rate_limiter.acquire().await;
            let system_prompt = self.prompt.render(&self.ctx.blackboard);
            let reply = match self.model.send(&self.history, &system_prompt).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!(error = %e, model = self.model.name(), "model call failed");
                    self.finish();
                    return Err(SlateError::Transport(e));
                }
            };
            self.transcript.assistant_raw(&reply.raw);

            let Some(line) = find_tool_call_line(&reply.visible, self.tools.marker()) else {
                self.history.push(ChatMessage::assistant(reply.visible.clone()));
                self.state = AgentState::AwaitingUserInput;
                return Ok(TurnOutcome::Reply(reply.visible));
            };

            self.state = AgentState::ProcessingToolCall;
            let line = line.to_string();
            let result = self.tools.dispatch(&self.ctx, &line).await;
            self.transcript.tool(&line, &result);
            self.emit(AgentEvent::ToolCall {
                line,
                result: result.clone(),
            });

            self.history.push(ChatMessage::assistant(reply.visible));
            self.history.push(ChatMessage::user(result));
            self.state = AgentState::AwaitingModelResponse;
        }
    }

    /// End the session and close the transcript; safe to call repeatedly
    pub fn finish(&mut self) {
        if self.state != AgentState::Finished {
            tracing::info!(messages = self.history.len(), "session finished");
        }
        self.state = AgentState::Finished;
        self.transcript.finish();
    }
}
