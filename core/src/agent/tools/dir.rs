//! Directory tools - create and recursively delete directories

use crate::agent::tool::{required_arg, Tool, ToolContext};
use crate::error::ToolError;
use async_trait::async_trait;

/// A tool for creating a directory and any missing parents.
#[derive(Debug, Default)]
pub struct MakeDirTool;

impl MakeDirTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for MakeDirTool {
    fn name(&self) -> &str {
        "make_dir"
    }

    fn description(&self) -> &str {
        "Create a directory (and any parents)."
    }

    fn usage(&self) -> &'static str {
        "(path)"
    }

    async fn call(&self, ctx: &ToolContext, args: &[String]) -> Result<String, ToolError> {
        let raw = required_arg(self, args, 0)?;
        let path = ctx.workspace.locate(raw).await?;

        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| ToolError::io("creating directory", raw, e))?;
        Ok(format!("[Created directory {}]", raw))
    }
}

/// A tool for deleting a directory and everything inside it.
#[derive(Debug, Default)]
pub struct DeleteDirTool;

impl DeleteDirTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for DeleteDirTool {
    fn name(&self) -> &str {
        "delete_dir"
    }

    fn description(&self) -> &str {
        "Delete a directory and everything inside it."
    }

    fn usage(&self) -> &'static str {
        "(path)"
    }

    async fn call(&self, ctx: &ToolContext, args: &[String]) -> Result<String, ToolError> {
        // A missing argument would resolve to the root; reject it the same way.
        let raw = args.first().map(String::as_str).unwrap_or("");
        let path = ctx.workspace.locate(raw).await?;
        if ctx.workspace.is_root(&path) {
            return Err(ToolError::RootProtected);
        }

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| ToolError::from_io("deleting directory", raw, e))?;
        if !metadata.is_dir() {
            return Err(ToolError::TypeMismatch {
                path: raw.to_string(),
                found: "a file",
                expected: "a directory",
                hint: "Use delete_file() instead.",
            });
        }

        tokio::fs::remove_dir_all(&path)
            .await
            .map_err(|e| ToolError::io("deleting directory", raw, e))?;
        Ok(format!("[Deleted directory {} and all contents]", raw))
    }
}
