//! File tools - read, write and delete single files inside the workspace

use crate::agent::tool::{required_arg, truncate_chars, Tool, ToolContext};
use crate::error::ToolError;
use async_trait::async_trait;
use std::io::Write;
use std::path::Path;
use tokio::io::AsyncReadExt;

/// Upper bound on bytes needed to produce `chars` characters of UTF-8
fn byte_budget(chars: usize) -> u64 {
    (chars as u64).saturating_mul(4)
}

/// Read at most `max_chars` characters, replacing invalid UTF-8
pub(crate) async fn read_lossy(path: &Path, max_chars: usize) -> std::io::Result<String> {
    let file = tokio::fs::File::open(path).await?;
    let mut bytes = Vec::new();
    file.take(byte_budget(max_chars))
        .read_to_end(&mut bytes)
        .await?;
    let mut content = String::from_utf8_lossy(&bytes).into_owned();
    truncate_chars(&mut content, max_chars);
    Ok(content)
}

/// Expand `\n`, `\t`, `\\`, `\"` and `\'` in one left-to-right pass.
///
/// Unknown escapes are kept verbatim, backslash included.
pub fn unescape_content(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// A tool for reading file contents.
#[derive(Debug, Default)]
pub struct ReadFileTool;

impl ReadFileTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read a file's contents."
    }

    fn usage(&self) -> &'static str {
        "(path)"
    }

    async fn call(&self, ctx: &ToolContext, args: &[String]) -> Result<String, ToolError> {
        let raw = required_arg(self, args, 0)?;
        let path = ctx.workspace.locate(raw).await?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| ToolError::from_io("reading", raw, e))?;
        if metadata.is_dir() {
            return Err(ToolError::TypeMismatch {
                path: raw.to_string(),
                found: "a directory",
                expected: "a file",
                hint: "Use list_files() instead.",
            });
        }

        let content = read_lossy(&path, ctx.max_read_chars)
            .await
            .map_err(|e| ToolError::from_io("reading", raw, e))?;
        Ok(format!("[File contents of {}]:\n{}", raw, content))
    }
}

/// Mode for newly created files before the umask applies
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o666;

fn write_onto_directory(raw: &str) -> ToolError {
    ToolError::TypeMismatch {
        path: raw.to_string(),
        found: "a directory",
        expected: "a file",
        hint: "Write to a file path inside that directory instead.",
    }
}

/// Stage `bytes` next to `path` and rename over it.
///
/// An existing file keeps its permissions; a new one gets the umask default.
fn replace_file(path: &Path, bytes: &[u8], raw: &str) -> Result<(), ToolError> {
    let existing = match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => return Err(write_onto_directory(raw)),
        Ok(meta) => Some(meta.permissions()),
        Err(_) => None,
    };
    let parent = match path.parent() {
        Some(parent) if parent.is_dir() => parent,
        _ => {
            return Err(ToolError::MissingParent {
                path: raw.to_string(),
            })
        }
    };

    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(NEW_FILE_MODE));
    }
    let mut staged = builder
        .tempfile_in(parent)
        .map_err(|e| ToolError::io("writing", raw, e))?;
    if let Some(permissions) = existing {
        staged
            .as_file()
            .set_permissions(permissions)
            .map_err(|e| ToolError::io("writing", raw, e))?;
    }
    staged
        .write_all(bytes)
        .and_then(|()| staged.flush())
        .map_err(|e| ToolError::io("writing", raw, e))?;
    staged
        .persist(path)
        .map_err(|e| ToolError::io("writing", raw, e.error))?;
    Ok(())
}

/// A tool for creating or overwriting a file.
///
/// The new content lands in a temporary file next to the target and is then
/// renamed over it, so readers only ever see the old or the new content.
#[derive(Debug, Default)]
pub struct WriteFileTool;

impl WriteFileTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file (creates or overwrites). Parent directory must exist."
    }

    fn usage(&self) -> &'static str {
        "(path, content)"
    }

    async fn call(&self, ctx: &ToolContext, args: &[String]) -> Result<String, ToolError> {
        let raw = required_arg(self, args, 0)?;
        let content = unescape_content(required_arg(self, args, 1)?);
        let path = ctx.workspace.locate(raw).await?;

        if ctx.workspace.is_root(&path) {
            return Err(write_onto_directory(raw));
        }

        let target = path.clone();
        let bytes = content.clone().into_bytes();
        let owned = raw.to_string();
        tokio::task::spawn_blocking(move || replace_file(&target, &bytes, &owned))
            .await
            .map_err(|e| ToolError::io("writing", raw, std::io::Error::other(e)))??;

        tracing::debug!(path = %path.display(), chars = content.chars().count(), "wrote file");
        Ok(format!("[Wrote {} chars to {}]", content.chars().count(), raw))
    }
}

/// A tool for deleting a single file.
#[derive(Debug, Default)]
pub struct DeleteFileTool;

impl DeleteFileTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Tool for DeleteFileTool {
    fn name(&self) -> &str {
        "delete_file"
    }

    fn description(&self) -> &str {
        "Delete a file (not a directory)."
    }

    fn usage(&self) -> &'static str {
        "(path)"
    }

    async fn call(&self, ctx: &ToolContext, args: &[String]) -> Result<String, ToolError> {
        let raw = required_arg(self, args, 0)?;
        let path = ctx.workspace.locate(raw).await?;

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| ToolError::from_io("deleting", raw, e))?;
        if metadata.is_dir() {
            return Err(ToolError::TypeMismatch {
                path: raw.to_string(),
                found: "a directory",
                expected: "a file",
                hint: "Use delete_dir() instead.",
            });
        }

        tokio::fs::remove_file(&path)
            .await
            .map_err(|e| ToolError::from_io("deleting", raw, e))?;
        Ok(format!("[Deleted {}]", raw))
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

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_unescape_content() {
        assert_eq!(unescape_content(r"hello\nworld"), "hello\nworld");
        assert_eq!(unescape_content(r"a\tb"), "a\tb");
        assert_eq!(unescape_content(r"C:\\temp"), r"C:\temp");
        assert_eq!(unescape_content(r"literal \\n stays"), r"literal \n stays");
        assert_eq!(unescape_content(r#"say \"hi\""#), r#"say "hi""#);
        assert_eq!(unescape_content(r"keep \d and trailing \"), r"keep \d and trailing \");
    }

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let (_temp, ctx) = context();
        let written = WriteFileTool::new()
            .call(&ctx, &args(&["notes.txt", r"hello\nworld"]))
            .await
            .unwrap();
        assert_eq!(written, "[Wrote 11 chars to notes.txt]");

        let on_disk = std::fs::read_to_string(ctx.workspace.root().join("notes.txt")).unwrap();
        assert_eq!(on_disk.lines().collect::<Vec<_>>(), vec!["hello", "world"]);

        let read = ReadFileTool::new()
            .call(&ctx, &args(&["notes.txt"]))
            .await
            .unwrap();
        assert_eq!(read, "[File contents of notes.txt]:\nhello\nworld");
    }

    #[tokio::test]
    async fn test_write_overwrites_whole_content() {
        let (_temp, ctx) = context();
        let tool = WriteFileTool::new();
        tool.call(&ctx, &args(&["a.txt", "a much longer first version"]))
            .await
            .unwrap();
        tool.call(&ctx, &args(&["a.txt", "short"])).await.unwrap();

        let on_disk = std::fs::read_to_string(ctx.workspace.root().join("a.txt")).unwrap();
        assert_eq!(on_disk, "short");
    }

    #[tokio::test]
    async fn test_write_requires_existing_parent() {
        let (_temp, ctx) = context();
        let err = WriteFileTool::new()
            .call(&ctx, &args(&["missing/dir/a.txt", "x"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::MissingParent { .. }));
        assert!(!ctx.workspace.root().join("missing").exists());
    }

    #[tokio::test]
    async fn test_write_requires_content() {
        let (_temp, ctx) = context();
        let err = WriteFileTool::new()
            .call(&ctx, &args(&["a.txt"]))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "write_file requires (path, content).");
    }

    #[tokio::test]
    async fn test_write_onto_directory_is_type_mismatch() {
        let (_temp, ctx) = context();
        std::fs::create_dir(ctx.workspace.root().join("adir")).unwrap();
        let err = WriteFileTool::new()
            .call(&ctx, &args(&["adir", "x"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::TypeMismatch { .. }));
        assert_eq!(
            err.to_observation(),
            "[Error]: 'adir' is a directory, not a file. Write to a file path inside that directory instead."
        );
        assert!(!err.to_observation().contains("delete_dir"));
        assert!(ctx.workspace.root().join("adir").is_dir());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_overwrite_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp, ctx) = context();
        let script = ctx.workspace.root().join("run.sh");
        std::fs::write(&script, "echo old").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        WriteFileTool::new()
            .call(&ctx, &args(&["run.sh", "echo new"]))
            .await
            .unwrap();

        let mode = std::fs::metadata(&script).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o755);
        assert_eq!(std::fs::read_to_string(&script).unwrap(), "echo new");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_new_file_is_not_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp, ctx) = context();
        WriteFileTool::new()
            .call(&ctx, &args(&["fresh.txt", "x"]))
            .await
            .unwrap();

        let mode = std::fs::metadata(ctx.workspace.root().join("fresh.txt"))
            .unwrap()
            .permissions()
            .mode();
        // Group and others gain read access under any common umask
        assert_ne!(mode & 0o777, 0o600);
        assert_eq!(mode & 0o600, 0o600);
    }

    #[tokio::test]
    async fn test_read_truncates_and_replaces_invalid_bytes() {
        let (_temp, ctx) = context();
        let ctx = ctx.with_max_read_chars(5);
        std::fs::write(ctx.workspace.root().join("bin.dat"), b"ab\xffcdefgh").unwrap();

        let read = ReadFileTool::new()
            .call(&ctx, &args(&["bin.dat"]))
            .await
            .unwrap();
        assert_eq!(read, "[File contents of bin.dat]:\nab\u{fffd}cd");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let (_temp, ctx) = context();
        let err = ReadFileTool::new()
            .call(&ctx, &args(&["nope.txt"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_read_outside_workspace_rejected() {
        let (_temp, ctx) = context();
        let err = ReadFileTool::new()
            .call(&ctx, &args(&["../secret.txt"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::PathEscape { .. }));
    }

    #[tokio::test]
    async fn test_delete_file_on_directory_leaves_it_untouched() {
        let (_temp, ctx) = context();
        let dir = ctx.workspace.root().join("adir");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("keep.txt"), "keep").unwrap();

        let err = DeleteFileTool::new()
            .call(&ctx, &args(&["adir"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::TypeMismatch { .. }));
        assert!(err.to_observation().contains("delete_dir()"));
        assert_eq!(std::fs::read_to_string(dir.join("keep.txt")).unwrap(), "keep");
    }

    #[tokio::test]
    async fn test_delete_file() {
        let (_temp, ctx) = context();
        let file = ctx.workspace.root().join("gone.txt");
        std::fs::write(&file, "bye").unwrap();

        let result = DeleteFileTool::new()
            .call(&ctx, &args(&["gone.txt"]))
            .await
            .unwrap();
        assert_eq!(result, "[Deleted gone.txt]");
        assert!(!file.exists());

        let err = DeleteFileTool::new()
            .call(&ctx, &args(&["gone.txt"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::NotFound { .. }));
    }
}
