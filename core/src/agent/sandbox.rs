//! Workspace sandbox
//!
//! Every path a tool receives is resolved here. Resolution is lexical first
//! (`.` and `..` collapsed without touching storage), compared against the
//! root by path components, then checked once more against the canonical form
//! of whatever part of the path already exists so a symlink cannot lead out.

use crate::error::{SlateError, ToolError};
use std::path::{Component, Path, PathBuf};

const QUOTE_CHARS: &[char] = &['"', '\''];

/// The rooted directory all file tools are confined to
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open (creating if needed) a workspace rooted at `root`
    pub fn open(root: impl AsRef<Path>) -> Result<Self, SlateError> {
        let root = root.as_ref();
        std::fs::create_dir_all(root).map_err(|source| SlateError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        let root = root.canonicalize().map_err(|source| SlateError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `path` is the workspace root itself
    pub fn is_root(&self, path: &Path) -> bool {
        path == self.root
    }

    /// Resolve a model-supplied path to an absolute path inside the workspace
    pub fn resolve(&self, raw: &str) -> Result<PathBuf, ToolError> {
        let cleaned = raw.trim().trim_matches(QUOTE_CHARS).trim();
        if cleaned.is_empty() || cleaned == "." {
            return Ok(self.root.clone());
        }

        let joined = normalize_lexically(&self.root.join(cleaned));
        if !joined.starts_with(&self.root) {
            tracing::debug!(path = raw, "rejected path outside workspace");
            return Err(ToolError::PathEscape {
                path: raw.to_string(),
            });
        }

        self.check_existing_ancestor(&joined, raw)?;
        Ok(joined)
    }

    /// [`Self::resolve`] on the blocking pool, for use inside async tool calls
    pub async fn locate(&self, raw: &str) -> Result<PathBuf, ToolError> {
        let workspace = self.clone();
        let owned = raw.to_string();
        tokio::task::spawn_blocking(move || workspace.resolve(&owned))
            .await
            .map_err(|e| ToolError::io("resolving", raw, std::io::Error::other(e)))?
    }

    /// Canonicalize the deepest existing ancestor and make sure it stays inside
    fn check_existing_ancestor(&self, path: &Path, raw: &str) -> Result<(), ToolError> {
        for ancestor in path.ancestors() {
            if ancestor.symlink_metadata().is_err() {
                continue;
            }
            return match ancestor.canonicalize() {
                Ok(real) if real.starts_with(&self.root) => Ok(()),
                // Dangling symlinks cannot be followed anywhere yet
                Err(_) if ancestor.is_symlink() => Ok(()),
                Err(e) => Err(ToolError::from_io("resolving", raw, e)),
                Ok(_) => {
                    tracing::debug!(path = raw, "rejected path leaving workspace through a link");
                    Err(ToolError::PathEscape {
                        path: raw.to_string(),
                    })
                }
            };
        }
        Ok(())
    }
}

/// Collapse `.` and `..` components without consulting the filesystem
fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
