//! Built-in tool implementations for the agent.
//!
//! # Tool Categories
//! - **Filesystem**: read, write and delete files; create, delete and list directories
//! - **Operator**: ask the human to run a command
//! - **Blackboard**: overwrite and read the session blackboard

pub mod blackboard;
pub mod command;
pub mod dir;
pub mod fs;
pub mod list_files;

pub use blackboard::{BlackboardReadTool, BlackboardWriteTool};
pub use command::RunCommandTool;
pub use dir::{DeleteDirTool, MakeDirTool};
pub use fs::{DeleteFileTool, ReadFileTool, WriteFileTool};
pub use list_files::ListFilesTool;
