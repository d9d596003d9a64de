//! Directory listing tool for agents.
//!
//! Lists the immediate children of a workspace directory, one per line,
//! tagged `FILE` or `DIR` and sorted by name.

use crate::agent::tool::{Tool, ToolContext};
use crate::error::ToolError;
use async_trait::async_trait;

/// Result text for a directory with no entries
pub const EMPTY_LISTING: &str = "[Directory is empty]";

/// A tool for listing files and directories.
#[derive(Debug, Default)]
pub struct ListFilesTool;

impl ListFilesTool {
    pub fn new() -> Self {
        Self
    }
}

struct FileEntry {
    name: String,
    is_dir: bool,
}

#[async_trait]
impl Tool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List files and directories. Use \".\" for the root."
    }

    fn usage(&self) -> &'static str {
        "(path)"
    }

    async fn call(&self, ctx: &ToolContext, args: &[String]) -> Result<String, ToolError> {
        let raw = args.first().map(String::as_str).unwrap_or(".");
        let path = ctx.workspace.locate(raw).await?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| ToolError::from_io("listing", raw, e))?;
        if !metadata.is_dir() {
            return Err(ToolError::TypeMismatch {
                path: raw.to_string(),
                found: "a file",
                expected: "a directory",
                hint: "Use read_file() instead.",
            });
        }

        let mut read_dir = tokio::fs::read_dir(&path)
            .await
            .map_err(|e| ToolError::from_io("listing", raw, e))?;
        let mut entries = Vec::new();
        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| ToolError::io("listing", raw, e))?
        {
            // Follow symlinks so a linked directory is reported as DIR
            let is_dir = tokio::fs::metadata(entry.path())
                .await
                .map(|m| m.is_dir())
                .unwrap_or(false);
            entries.push(FileEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }

        if entries.is_empty() {
            return Ok(EMPTY_LISTING.to_string());
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        let lines: Vec<String> = entries
            .iter()
            .map(|entry| {
                let tag = if entry.is_dir { "DIR " } else { "FILE" };
                format!("  {}  {}", tag, entry.name)
            })
            .collect();

        tracing::debug!(path = raw, entries = entries.len(), "listed directory");
        Ok(format!("[Listing]:\n{}", lines.join("\n")))
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

    #[tokio::test]
    async fn test_empty_directory_marker() {
        let (_temp, ctx) = context();
        let result = ListFilesTool::new().call(&ctx, &[]).await.unwrap();
        assert_eq!(result, EMPTY_LISTING);
    }

    #[tokio::test]
    async fn test_lists_immediate_children_sorted() {
        let (_temp, ctx) = context();
        let root = ctx.workspace.root();
        std::fs::write(root.join("zeta.txt"), "z").unwrap();
        std::fs::write(root.join("alpha.txt"), "a").unwrap();
        std::fs::create_dir_all(root.join("middle").join("nested")).unwrap();

        let result = ListFilesTool::new()
            .call(&ctx, &[".".to_string()])
            .await
            .unwrap();
        assert_eq!(
            result,
            "[Listing]:\n  FILE  alpha.txt\n  DIR   middle\n  FILE  zeta.txt"
        );
    }

    #[tokio::test]
    async fn test_list_subdirectory() {
        let (_temp, ctx) = context();
        let sub = ctx.workspace.root().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("inner.txt"), "i").unwrap();

        let result = ListFilesTool::new()
            .call(&ctx, &["sub".to_string()])
            .await
            .unwrap();
        assert_eq!(result, "[Listing]:\n  FILE  inner.txt");
    }

    #[tokio::test]
    async fn test_list_file_or_missing() {
        let (_temp, ctx) = context();
        std::fs::write(ctx.workspace.root().join("a.txt"), "a").unwrap();

        let err = ListFilesTool::new()
            .call(&ctx, &["a.txt".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::TypeMismatch { .. }));

        let err = ListFilesTool::new()
            .call(&ctx, &["nowhere".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound { .. }));
    }
}
