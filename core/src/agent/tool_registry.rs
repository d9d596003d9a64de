//! Tool registry and dispatcher
//!
//! Maps tool names to implementations and turns one tool-call line into the
//! text the model sees next. Every outcome, including parse failures and
//! unknown names, comes back as a string; nothing here ends the session.

use crate::agent::protocol::{parse_tool_call, ToolCall, TOOL_CALL_MARKER};
use crate::agent::tool::{Tool, ToolContext};
use crate::agent::tools::{
    BlackboardReadTool, BlackboardWriteTool, DeleteDirTool, DeleteFileTool, ListFilesTool,
    MakeDirTool, ReadFileTool, RunCommandTool, WriteFileTool,
};
use crate::error::ToolError;
use std::collections::HashMap;
use std::sync::Arc;

/// Registered tools, kept in registration order for listings
#[derive(Clone)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
    marker: String,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.order)
            .field("marker", &self.marker)
            .finish()
    }
}

impl ToolRegistry {
    /// Create an empty registry using the default `TOOL_CALL:` marker
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            order: Vec::new(),
            marker: TOOL_CALL_MARKER.to_string(),
        }
    }

    /// Registry with every built-in tool
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_defaults();
        registry
    }

    /// Use a different tool-call marker
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    fn register_defaults(&mut self) {
        self.register(Arc::new(ReadFileTool::new()));
        self.register(Arc::new(WriteFileTool::new()));
        self.register(Arc::new(DeleteFileTool::new()));
        self.register(Arc::new(DeleteDirTool::new()));
        self.register(Arc::new(MakeDirTool::new()));
        self.register(Arc::new(ListFilesTool::new()));
        self.register(Arc::new(RunCommandTool::new()));
        self.register(Arc::new(BlackboardWriteTool::new()));
        self.register(Arc::new(BlackboardReadTool::new()));
    }

    /// Register a tool; a later registration under the same name replaces it
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        if self.tools.insert(name.clone(), tool).is_none() {
            self.order.push(name);
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Tool names in registration order
    pub fn tool_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Tools in registration order
    pub fn tools(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.order.iter().filter_map(|name| self.tools.get(name))
    }

    /// Execute an already parsed call
    pub async fn execute(&self, ctx: &ToolContext, call: &ToolCall) -> Result<String, ToolError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| ToolError::UnknownTool {
                name: call.name.clone(),
                available: self.order.join(", "),
            })?;
        tool.call(ctx, &call.args).await
    }

    /// Parse and execute one tool-call line, always producing result text
    pub async fn dispatch(&self, ctx: &ToolContext, line: &str) -> String {
        let outcome = match parse_tool_call(line, &self.marker) {
            Ok(call) => {
                tracing::debug!(tool = %call.name, args = call.args.len(), "dispatching tool call");
                self.execute(ctx, &call).await
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(error = %e, "tool call failed");
                e.to_observation()
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::blackboard::Blackboard;
    use crate::agent::operator::ScriptedOperator;
    use crate::agent::sandbox::Workspace;
    use tempfile::TempDir;

    fn context() -> (TempDir, ToolContext) {
        let temp = TempDir::new().unwrap();
        let workspace = Workspace::open(temp.path().join("workspace")).unwrap();
        let ctx = ToolContext::new(
            workspace,
            Blackboard::new(),
            Arc::new(ScriptedOperator::default()),
        );
        (temp, ctx)
    }

    #[test]
    fn test_default_tools_in_order() {
        let registry = ToolRegistry::with_defaults();
        assert_eq!(
            registry.tool_names(),
            vec![
                "read_file",
                "write_file",
                "delete_file",
                "delete_dir",
                "make_dir",
                "list_files",
                "run_command",
                "blackboard_write",
                "blackboard_read",
            ]
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_lists_valid_names() {
        let (_temp, ctx) = context();
        let registry = ToolRegistry::with_defaults();
        let result = registry.dispatch(&ctx, "TOOL_CALL: rm_rf(\"/\")").await;
        assert!(result.starts_with("[Error]: Unknown tool call: rm_rf."));
        assert!(result.contains("read_file, write_file"));
        assert!(result.contains("blackboard_read"));
    }

    #[tokio::test]
    async fn test_malformed_call_becomes_text() {
        let (_temp, ctx) = context();
        let registry = ToolRegistry::with_defaults();
        let result = registry.dispatch(&ctx, "TOOL_CALL: read_file(\"a.txt\"").await;
        assert!(result.starts_with("[Error]: Malformed tool call"));
    }

    #[tokio::test]
    async fn test_scenario_write_then_read() {
        let (_temp, ctx) = context();
        let registry = ToolRegistry::with_defaults();
        registry
            .dispatch(&ctx, r#"TOOL_CALL: write_file("notes.txt", "hello\nworld")"#)
            .await;
        let result = registry
            .dispatch(&ctx, r#"TOOL_CALL: read_file("notes.txt")"#)
            .await;
        assert_eq!(result, "[File contents of notes.txt]:\nhello\nworld");
    }

    #[tokio::test]
    async fn test_write_read_unescapes_backslashes_and_tabs() {
        let (_temp, ctx) = context();
        let registry = ToolRegistry::with_defaults();
        registry
            .dispatch(&ctx, r#"TOOL_CALL: write_file("t.txt", "a\tb\\c")"#)
            .await;
        let on_disk = std::fs::read_to_string(ctx.workspace.root().join("t.txt")).unwrap();
        assert_eq!(on_disk, "a\tb\\c");
    }

    #[tokio::test]
    async fn test_blackboard_last_write_wins_across_other_calls() {
        let (_temp, ctx) = context();
        let registry = ToolRegistry::with_defaults();
        registry
            .dispatch(&ctx, r#"TOOL_CALL: blackboard_write("plan A")"#)
            .await;
        registry
            .dispatch(&ctx, r#"TOOL_CALL: blackboard_write("plan B")"#)
            .await;
        registry.dispatch(&ctx, r#"TOOL_CALL: make_dir("src")"#).await;
        registry
            .dispatch(&ctx, r#"TOOL_CALL: write_file("src/a.txt", "x")"#)
            .await;
        registry.dispatch(&ctx, r#"TOOL_CALL: list_files(".")"#).await;

        let result = registry.dispatch(&ctx, "TOOL_CALL: blackboard_read()").await;
        assert_eq!(result, "[Blackboard contents]:\nplan B");
    }

    #[tokio::test]
    async fn test_path_escape_is_reported_not_raised() {
        let (_temp, ctx) = context();
        let registry = ToolRegistry::with_defaults();
        let result = registry
            .dispatch(&ctx, r#"TOOL_CALL: read_file("/etc/passwd")"#)
            .await;
        assert!(result.starts_with("[Error]: Path escapes working directory"));
    }

    #[tokio::test]
    async fn test_custom_marker() {
        let (_temp, ctx) = context();
        let registry = ToolRegistry::with_defaults().with_marker("ACTION:");
        let result = registry.dispatch(&ctx, "ACTION: blackboard_read()").await;
        assert_eq!(result, "[Blackboard is empty]");
    }
}
