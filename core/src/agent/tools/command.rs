//! Human-in-the-loop command tool.
//!
//! The agent cannot execute anything itself. `run_command` asks the operator
//! to run something, blocks the session until they confirm, then reads back
//! whatever they left in the side-channel file.

use crate::agent::operator::CommandRequest;
use crate::agent::tool::{required_arg, Tool, ToolContext};
use crate::agent::tools::fs::read_lossy;
use crate::error::ToolError;
use async_trait::async_trait;

/// A tool that delegates command execution to the operator.
#[derive(Debug, Default)]
pub struct RunCommandTool;

impl RunCommandTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for RunCommandTool {
    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Ask the user to run a command or program for you. Provide a clear description of what you need them to run (e.g. \"please run: python fizzbuzz.py 15\"). This pauses the program and waits for the user."
    }

    fn usage(&self) -> &'static str {
        "(description)"
    }

    async fn call(&self, ctx: &ToolContext, args: &[String]) -> Result<String, ToolError> {
        let description = required_arg(self, args, 0)?;
        let file_name = ctx.command_output_file.as_str();
        let output_path = ctx.workspace.locate(file_name).await?;

        // Start from an empty file so stale output is never mistaken for new
        tokio::fs::write(&output_path, "")
            .await
            .map_err(|e| ToolError::io("preparing", file_name, e))?;

        let request = CommandRequest {
            description: description.to_string(),
            workspace: ctx.workspace.root().to_path_buf(),
            output_path: output_path.clone(),
        };

        tracing::info!(operator = ctx.operator.name(), description, "waiting for operator");
        tokio::select! {
            signalled = ctx.operator.rendezvous(&request) => {
                signalled.map_err(|e| ToolError::io("waiting for the operator on", file_name, e))?;
            }
            _ = ctx.cancellation.cancelled() => {
                return Err(ToolError::Cancelled { tool: self.name().to_string() });
            }
        }

        let output = match read_lossy(&output_path, ctx.max_read_chars).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "could not read command output");
                String::new()
            }
        };

        if output.trim().is_empty() {
            Ok(format!(
                "[User ran command. {} is empty (no output or user did not write output).]",
                file_name
            ))
        } else {
            Ok(format!(
                "[User ran command. Output in {}. Contents:]:\n{}",
                file_name, output
            ))
        }
    }
}
