//! Structured error types for Slate
//!
//! Tool errors are recoverable: the dispatcher renders them as text and hands
//! them back to the model. Transport errors end the session.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while parsing or executing a single tool call
#[derive(Error, Debug)]
pub enum ToolError {
    // =========================================================================
    // Sandbox Errors
    // =========================================================================
    /// Resolved path lies outside the workspace root
    #[error("Path escapes working directory: '{path}'")]
    PathEscape { path: String },

    /// The workspace root itself may not be removed
    #[error("Cannot delete the root working directory.")]
    RootProtected,

    // =========================================================================
    // Filesystem Errors
    // =========================================================================
    /// Target file or directory does not exist
    #[error("'{path}' not found")]
    NotFound { path: String },

    /// Parent directory of a file to be written does not exist
    #[error("Parent directory of '{path}' does not exist. Create it with make_dir() first.")]
    MissingParent { path: String },

    /// File operation on a directory, or directory operation on a file
    #[error("'{path}' is {found}, not {expected}. {hint}")]
    TypeMismatch {
        path: String,
        found: &'static str,
        expected: &'static str,
        hint: &'static str,
    },

    /// Any other I/O failure
    #[error("Error {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// The tool-call line could not be parsed
    #[error("Malformed tool call: {reason}")]
    MalformedCall { reason: String },

    /// No tool registered under this name
    #[error("Unknown tool call: {name}. Available tools: {available}.")]
    UnknownTool { name: String, available: String },

    /// A required positional argument was not supplied
    #[error("{tool} requires {usage}.")]
    MissingArgument { tool: String, usage: &'static str },

    // =========================================================================
    // Rendezvous Errors
    // =========================================================================
    /// The human-in-the-loop wait was cancelled by the host
    #[error("{tool} was cancelled before the operator signalled completion")]
    Cancelled { tool: String },
}

impl ToolError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedCall {
            reason: reason.into(),
        }
    }

    pub fn io(action: &'static str, path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Map an I/O error, promoting `NotFound` to its own variant
    pub fn from_io(action: &'static str, path: impl Into<String>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound { path }
        } else {
            Self::io(action, path, source)
        }
    }

    /// Text form handed back to the model as the tool result
    pub fn to_observation(&self) -> String {
        format!("[Error]: {}", self)
    }
}

/// Errors raised by a model client
#[derive(Error, Debug)]
pub enum LlmError {
    /// Connection, TLS, timeout or body decoding failure
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Client could not be constructed or the reply was unusable
    #[error("{0}")]
    Other(String),
}

/// Primary error type for Slate sessions
#[derive(Error, Debug)]
pub enum SlateError {
    /// The model could not be reached or did not answer; ends the session
    #[error("model transport failed: {0}")]
    Transport(#[from] LlmError),

    /// Invalid configuration
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// Workspace or log directory could not be prepared
    #[error("cannot prepare {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input submitted after an exit keyword ended the session
    #[error("session already finished")]
    SessionFinished,
}

impl SlateError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => {
                format!("Could not get a response from the model ({}). Ending session.", self)
            }
            Self::Config { message } => format!("Configuration problem: {}", message),
            Self::Io { path, .. } => format!("Cannot use {}: {}", path.display(), self),
            Self::SessionFinished => "The session has ended.".to_string(),
        }
    }
}
