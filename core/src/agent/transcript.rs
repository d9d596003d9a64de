//! Session transcript
//!
//! One plain-text file per run recording user input, raw model replies and
//! executed tool calls. Write failures are reported through `tracing` and
//! otherwise ignored; losing the transcript never ends a session.

use crate::error::SlateError;
use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Transcript file name for a session started now
pub fn session_file_name() -> String {
    format!("session_{}.log", Local::now().format("%Y%m%d_%H%M%S"))
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

/// Append-only session log
#[derive(Debug)]
pub struct SessionLog {
    file: Option<File>,
    path: Option<PathBuf>,
    finished: bool,
}

impl SessionLog {
    /// Create `session_YYYYMMDD_HHMMSS.log` in `log_dir` and write the header
    pub fn create(log_dir: &Path, workspace: &Path) -> Result<Self, SlateError> {
        std::fs::create_dir_all(log_dir).map_err(|source| SlateError::Io {
            path: log_dir.to_path_buf(),
            source,
        })?;

        let path = log_dir.join(session_file_name());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| SlateError::Io {
                path: path.clone(),
                source,
            })?;

        let mut log = Self {
            file: Some(file),
            path: Some(path),
            finished: false,
        };
        log.write_lines(&[
            &format!("=== Session started {} ===", timestamp()),
            &format!("Working directory: {}", workspace.display()),
            "",
        ]);
        tracing::info!(path = ?log.path, "session transcript opened");
        Ok(log)
    }

    /// A log that records nothing
    pub fn disabled() -> Self {
        Self {
            file: None,
            path: None,
            finished: false,
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn user(&mut self, input: &str) {
        self.write_lines(&["--- USER ---", input, ""]);
    }

    pub fn assistant_raw(&mut self, raw: &str) {
        self.write_lines(&["--- ASSISTANT (raw) ---", raw, ""]);
    }

    pub fn tool(&mut self, call: &str, result: &str) {
        self.write_lines(&[
            "--- TOOL DETECTED ---",
            &format!("Call: {}", call),
            &format!("Result: {}", result),
            "",
        ]);
    }

    /// Write the closing line; later calls are no-ops
    pub fn finish(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.write_lines(&[&format!("\n=== Session ended {} ===", timestamp())]);
        self.file = None;
    }

    fn write_lines(&mut self, lines: &[&str]) {
        let Some(file) = self.file.as_mut() else {
            return;
        };

        let mut block = String::new();
        for line in lines {
            block.push_str(line);
            block.push('\n');
        }

        if let Err(e) = file.write_all(block.as_bytes()).and_then(|_| file.flush()) {
            tracing::warn!(error = %e, path = ?self.path, "failed to write session transcript");
        }
    }
}

impl Drop for SessionLog {
    fn drop(&mut self) {
        self.finish();
    }
}
