//! Slate core library
//!
//! Everything except the terminal front end: the sandboxed tools, the
//! tool-call protocol, the conversation driver, the model client and
//! configuration.

pub mod agent;
pub mod config;
pub mod error;
pub mod llm;
pub mod rate_limiter;

// Re-exports for convenience
pub use agent::core::Agent;
pub use agent::factory::AgentBuilder;
pub use config::Config;
pub use error::{LlmError, SlateError, ToolError};
