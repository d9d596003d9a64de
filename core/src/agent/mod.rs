//! Agent - sandboxed file agent driven by a text tool protocol
//!
//! # Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  DRIVER           core::Agent                               │
//! │  - one user turn = model calls until a reply has no tool    │
//! │  - at most one tool call acted on per reply                 │
//! ├─────────────────────────────────────────────────────────────┤
//! │  DISPATCH         tool_registry::ToolRegistry               │
//! │  - protocol: TOOL_CALL: name("arg", ...) parsing            │
//! │  - every outcome rendered as text for the model             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TOOLS            tools::*                                  │
//! │  - filesystem, run_command rendezvous, blackboard           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  STATE            sandbox::Workspace, blackboard::Blackboard│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use slate_core::agent::{AgentBuilder, TerminalOperator, TurnOutcome};
//! use slate_core::config::Config;
//!
//! let config = Config::load_or_default()?;
//! let mut agent = AgentBuilder::from_config(
//!     &config,
//!     Arc::new(TerminalOperator::new()),
//!     CancellationToken::new(),
//! )?
//! .build();
//!
//! if let TurnOutcome::Reply(text) = agent.submit("write fizzbuzz in python").await? {
//!     println!("Bot: {}", text);
//! }
//! ```

#![forbid(unsafe_code)]

pub mod blackboard;
pub mod core;
pub mod factory;
pub mod operator;
pub mod prompt;
pub mod protocol;
pub mod sandbox;
pub mod tool;
pub mod tool_registry;
pub mod tools;
pub mod transcript;

pub use blackboard::Blackboard;
pub use self::core::{Agent, AgentEvent, AgentState, EventCallback, TurnOutcome};
pub use factory::AgentBuilder;
pub use operator::{CommandRequest, Operator, ScriptedOperator, TerminalOperator};
pub use prompt::SystemPrompt;
pub use protocol::{find_tool_call_line, parse_tool_call, ToolCall, TOOL_CALL_MARKER};
pub use sandbox::Workspace;
pub use tool::{Tool, ToolContext};
pub use tool_registry::ToolRegistry;
pub use transcript::SessionLog;
