use crate::agent::tool::{required_arg, Tool, ToolContext};
use crate::error::ToolError;
use async_trait::async_trait;

/// Result text when nothing has been written yet
pub const EMPTY_BLACKBOARD: &str = "[Blackboard is empty]";

/// Overwrite the session blackboard.
#[derive(Debug, Default)]
pub struct BlackboardWriteTool;

impl BlackboardWriteTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for BlackboardWriteTool {
    fn name(&self) -> &str {
        "blackboard_write"
    }

    fn description(&self) -> &str {
        "Overwrite the blackboard with new content. The blackboard persists across the entire conversation and is always visible to you even as older messages scroll out of context."
    }

    fn usage(&self) -> &'static str {
        "(content)"
    }

    async fn call(&self, ctx: &ToolContext, args: &[String]) -> Result<String, ToolError> {
        let content = required_arg(self, args, 0)?;
        ctx.blackboard.write(content);
        tracing::debug!(len = content.len(), "blackboard overwritten");
        Ok(format!("[Blackboard updated]\n{}", content))
    }
}

/// Read the session blackboard.
#[derive(Debug, Default)]
pub struct BlackboardReadTool;

impl BlackboardReadTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for BlackboardReadTool {
    fn name(&self) -> &str {
        "blackboard_read"
    }

    fn description(&self) -> &str {
        "Read the current blackboard contents."
    }

    fn usage(&self) -> &'static str {
        "()"
    }

    async fn call(&self, ctx: &ToolContext, _args: &[String]) -> Result<String, ToolError> {
        Ok(match ctx.blackboard.read() {
            Some(content) => format!("[Blackboard contents]:\n{}", content),
            None => EMPTY_BLACKBOARD.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::blackboard::Blackboard;
    use crate::agent::operator::ScriptedOperator;
    use crate::agent::sandbox::Workspace;
    use std::sync::Arc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let temp = TempDir::new().unwrap();
        let ctx = ToolContext::new(
            Workspace::open(temp.path()).unwrap(),
            Blackboard::new(),
            Arc::new(ScriptedOperator::default()),
        );

        let read = BlackboardReadTool::new();
        assert_eq!(read.call(&ctx, &[]).await.unwrap(), EMPTY_BLACKBOARD);

        let write = BlackboardWriteTool::new();
        let result = write
            .call(&ctx, &["task: fizzbuzz\n[ ] write it".to_string()])
            .await
            .unwrap();
        assert_eq!(result, "[Blackboard updated]\ntask: fizzbuzz\n[ ] write it");
        assert_eq!(
            read.call(&ctx, &[]).await.unwrap(),
            "[Blackboard contents]:\ntask: fizzbuzz\n[ ] write it"
        );
    }

    #[tokio::test]
    async fn test_write_requires_content() {
        let temp = TempDir::new().unwrap();
        let ctx = ToolContext::new(
            Workspace::open(temp.path()).unwrap(),
            Blackboard::new(),
            Arc::new(ScriptedOperator::default()),
        );
        ctx.blackboard.write("unchanged");

        let err = BlackboardWriteTool::new().call(&ctx, &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "blackboard_write requires (content).");
        assert_eq!(ctx.blackboard.read().as_deref(), Some("unchanged"));
    }
}
