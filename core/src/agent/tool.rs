use crate::agent::blackboard::Blackboard;
use crate::agent::operator::Operator;
use crate::agent::sandbox::Workspace;
use crate::error::ToolError;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Default cap on characters returned by `read_file` and `run_command`
pub const DEFAULT_MAX_READ_CHARS: usize = 50_000;

/// Default name of the file the operator writes command output into
pub const DEFAULT_COMMAND_OUTPUT_FILE: &str = "output.txt";

/// Everything a tool may touch while executing.
///
/// One context per session; the blackboard handle and workspace are shared
/// with prompt assembly so the model always sees the same state the tools do.
#[derive(Clone)]
pub struct ToolContext {
    pub workspace: Workspace,
    pub blackboard: Blackboard,
    pub operator: Arc<dyn Operator>,
    /// Cancels a pending operator rendezvous
    pub cancellation: CancellationToken,
    pub max_read_chars: usize,
    pub command_output_file: String,
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("workspace", &self.workspace)
            .field("blackboard_len", &self.blackboard.len())
            .field("cancellation", &self.cancellation)
            .field("max_read_chars", &self.max_read_chars)
            .field("command_output_file", &self.command_output_file)
            .finish()
    }
}

impl ToolContext {
    pub fn new(workspace: Workspace, blackboard: Blackboard, operator: Arc<dyn Operator>) -> Self {
        Self {
            workspace,
            blackboard,
            operator,
            cancellation: CancellationToken::new(),
            max_read_chars: DEFAULT_MAX_READ_CHARS,
            command_output_file: DEFAULT_COMMAND_OUTPUT_FILE.to_string(),
        }
    }

    pub fn with_max_read_chars(mut self, max: usize) -> Self {
        self.max_read_chars = max;
        self
    }

    pub fn with_command_output_file(mut self, name: impl Into<String>) -> Self {
        self.command_output_file = name.into();
        self
    }

    /// Use a host-provided token so the host can abort a pending rendezvous
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}

/// A trait for tools that can be executed by the agent.
///
/// Tools receive the positional string arguments parsed from a
/// `TOOL_CALL:` line and return the text that goes back to the model.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The name of the tool (e.g., "read_file")
    fn name(&self) -> &str;

    /// A brief description of what the tool does
    fn description(&self) -> &str;

    /// Argument list as shown to the model, e.g. "(path, content)"
    fn usage(&self) -> &'static str;

    /// Execute the tool with the provided arguments
    async fn call(&self, ctx: &ToolContext, args: &[String]) -> Result<String, ToolError>;
}

/// Fetch a required positional argument
pub fn required_arg<'a>(
    tool: &dyn Tool,
    args: &'a [String],
    index: usize,
) -> Result<&'a str, ToolError> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| ToolError::MissingArgument {
            tool: tool.name().to_string(),
            usage: tool.usage(),
        })
}

/// Truncate to at most `max` characters without splitting a code point
pub fn truncate_chars(text: &mut String, max: usize) {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_chars_respects_code_points() {
        let mut text = "héllo wörld".to_string();
        truncate_chars(&mut text, 4);
        assert_eq!(text, "héll");

        let mut short = "abc".to_string();
        truncate_chars(&mut short, 10);
        assert_eq!(short, "abc");
    }
}
