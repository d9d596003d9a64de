//! System prompt assembly
//!
//! The instruction block is rendered once per session from the registered
//! tools. The blackboard section is appended fresh on every model call so the
//! model always sees the latest note, however much history the provider drops.

use crate::agent::blackboard::Blackboard;
use crate::agent::tool_registry::ToolRegistry;
use std::fmt::Write as _;
use std::path::Path;

/// Shown in place of the blackboard before anything has been written
pub const EMPTY_BLACKBOARD_NOTICE: &str = "(empty - you should write your task and plan here)";

/// Renders the system prompt for each model call
#[derive(Debug, Clone)]
pub struct SystemPrompt {
    base: String,
}

impl SystemPrompt {
    /// Build the fixed instruction block
    pub fn new(registry: &ToolRegistry, workspace: &Path, command_output_file: &str) -> Self {
        let marker = registry.marker();
        let mut base = String::new();

        base.push_str("You are a helpful assistant with file access inside a working directory.\n\n");
        let _ = writeln!(base, "All file operations are sandboxed to: {}", workspace.display());
        base.push_str(
            "Use only relative paths (e.g. \"notes.txt\", \"subdir/file.txt\"). Absolute paths are not allowed.\n\n",
        );

        base.push_str("## Tools\n\n");
        for tool in registry.tools() {
            let _ = write!(base, "{}{} - {}", tool.name(), tool.usage(), tool.description());
            if tool.name() == "run_command" {
                let _ = write!(
                    base,
                    " The user will put any output into \"{file}\" in the working directory, which you can then read with read_file(\"{file}\"). Always write your code to a file FIRST, then use this tool to ask the user to run it.",
                    file = command_output_file
                );
            }
            base.push('\n');
        }

        base.push_str("\nWhen you want to use a tool, respond with exactly one of these formats on its own line:\n");
        for tool in registry.tools() {
            let _ = writeln!(base, "{} {}{}", marker, tool.name(), example_args(tool.usage()));
        }

        base.push_str("\n## Rules\n");
        base.push_str("- Only call ONE tool at a time. Never chain tool calls with semicolons.\n");
        base.push_str("- Do NOT delete files or directories unless the user explicitly asks you to.\n");
        base.push_str("- IMPORTANT: At the start of every conversation, BEFORE doing anything else, use blackboard_write() to record: (1) what the user is asking you to do, (2) your plan to accomplish it, (3) a checklist you can refer back to. This keeps you on track.\n");
        base.push_str("- Before each tool call, re-read the blackboard to remind yourself what you're doing and why.\n");
        base.push_str("- After completing a step, update the blackboard to check it off.");

        Self { base }
    }

    /// Full prompt for the next model call
    pub fn render(&self, blackboard: &Blackboard) -> String {
        let content = blackboard
            .read()
            .unwrap_or_else(|| EMPTY_BLACKBOARD_NOTICE.to_string());
        format!("{}\n\n## Current Blackboard\n{}", self.base, content)
    }
}

/// `(path, content)` becomes `("path", "content")`
fn example_args(usage: &str) -> String {
    let inner = usage.trim().trim_start_matches('(').trim_end_matches(')');
    let args: Vec<String> = inner
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(|a| format!("\"{}\"", a))
        .collect();
    format!("({})", args.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> SystemPrompt {
        SystemPrompt::new(
            &ToolRegistry::with_defaults(),
            Path::new("/tmp/slate/workspace"),
            "output.txt",
        )
    }

    #[test]
    fn test_empty_blackboard_notice() {
        let text = prompt().render(&Blackboard::new());
        assert!(text.ends_with("## Current Blackboard\n(empty - you should write your task and plan here)"));
    }

    #[test]
    fn test_blackboard_content_is_injected() {
        let blackboard = Blackboard::new();
        blackboard.write("task: fizzbuzz");
        let text = prompt().render(&blackboard);
        assert!(text.ends_with("\n\n## Current Blackboard\ntask: fizzbuzz"));
    }

    #[test]
    fn test_lists_every_tool_with_example() {
        let text = prompt().render(&Blackboard::new());
        assert!(text.contains("All file operations are sandboxed to: /tmp/slate/workspace"));
        assert!(text.contains("read_file(path) - Read a file's contents."));
        assert!(text.contains("TOOL_CALL: write_file(\"path\", \"content\")"));
        assert!(text.contains("TOOL_CALL: blackboard_read()"));
        assert!(text.contains("read_file(\"output.txt\")"));
    }

    #[test]
    fn test_example_args() {
        assert_eq!(example_args("()"), "()");
        assert_eq!(example_args("(path, content)"), "(\"path\", \"content\")");
    }
}
