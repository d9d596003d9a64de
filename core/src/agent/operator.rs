//! Human operator rendezvous
//!
//! `run_command` hands a request to an [`Operator`] and waits until the
//! operator says they are done. Whatever they put in the side-channel file by
//! then is the command's output.

use async_trait::async_trait;
use console::Style;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::PathBuf;

/// What the model asked the operator to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub description: String,
    pub workspace: PathBuf,
    /// Absolute path of the side-channel file
    pub output_path: PathBuf,
}

/// Someone who can run commands on the agent's behalf
#[async_trait]
pub trait Operator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Present the request and return once the operator signals completion.
    ///
    /// There is no timeout; callers race this against their cancellation token.
    async fn rendezvous(&self, request: &CommandRequest) -> io::Result<()>;
}

/// Terminal operator - prints the request and waits for Enter on stdin
#[derive(Debug, Default)]
pub struct TerminalOperator;

impl TerminalOperator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Operator for TerminalOperator {
    fn name(&self) -> &'static str {
        "terminal-operator"
    }

    async fn rendezvous(&self, request: &CommandRequest) -> io::Result<()> {
        let rule = "=".repeat(60);
        let bold = Style::new().bold().yellow();
        let output_name = request
            .output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        println!();
        println!("{}", rule);
        println!("  {} {}", bold.apply_to("AGENT REQUEST:"), request.description);
        println!("  Working dir: {}", request.workspace.display());
        println!("  Put any output into: {}", output_name);
        println!("{}", rule);
        print!("  Press Enter when done...");
        io::stdout().flush()?;

        let read = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            io::stdin().read_line(&mut line)
        })
        .await
        .map_err(io::Error::other)??;
        println!();

        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed while waiting for the operator",
            ));
        }
        Ok(())
    }
}

/// Non-interactive operator for tests and embedding.
///
/// Each rendezvous writes the next scripted output (if any) into the
/// side-channel file, then returns immediately.
#[derive(Debug, Default)]
pub struct ScriptedOperator {
    outputs: Mutex<VecDeque<Option<String>>>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedOperator {
    pub fn new(outputs: impl IntoIterator<Item = Option<String>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into_iter().collect()),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Descriptions received so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl Operator for ScriptedOperator {
    fn name(&self) -> &'static str {
        "scripted-operator"
    }

    async fn rendezvous(&self, request: &CommandRequest) -> io::Result<()> {
        self.seen.lock().push(request.description.clone());
        let next = self.outputs.lock().pop_front().flatten();
        if let Some(output) = next {
            tokio::fs::write(&request.output_path, output).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_scripted_operator_writes_output() {
        let temp = TempDir::new().unwrap();
        let request = CommandRequest {
            description: "please run: python hello.py".to_string(),
            workspace: temp.path().to_path_buf(),
            output_path: temp.path().join("output.txt"),
        };

        let operator = ScriptedOperator::new([Some("hello\n".to_string()), None]);
        operator.rendezvous(&request).await.unwrap();
        assert_eq!(std::fs::read_to_string(&request.output_path).unwrap(), "hello\n");

        std::fs::write(&request.output_path, "").unwrap();
        operator.rendezvous(&request).await.unwrap();
        assert_eq!(std::fs::read_to_string(&request.output_path).unwrap(), "");

        assert_eq!(operator.requests().len(), 2);
    }
}
