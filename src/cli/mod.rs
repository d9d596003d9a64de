//! CLI argument parsing using clap 4.x derive macros

use clap::{ArgAction, Parser, Subcommand};
use slate_core::config::Config;
use std::path::PathBuf;

/// A terminal agent that edits a sandboxed workspace and keeps its plan on a blackboard
///
/// Without a subcommand, starts an interactive session.
#[derive(Parser, Debug)]
#[command(name = "slate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file (default: ./slate.toml, then the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Sandbox directory for all file tools
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Directory for session transcripts
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Model identifier sent to the endpoint
    #[arg(short, long)]
    pub model: Option<String>,

    /// Chat endpoint URL
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Write the default configuration to the user config directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Apply command-line overrides on top of file values
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(workspace) = &self.workspace {
            config.agent.workspace_dir = workspace.clone();
        }
        if let Some(log_dir) = &self.log_dir {
            config.agent.log_dir = log_dir.clone();
        }
        if let Some(model) = &self.model {
            config.endpoint.model = model.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.endpoint.url = endpoint.clone();
        }
    }

    /// Default filter when `RUST_LOG` is unset
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_file_values() {
        let cli = Cli::parse_from([
            "slate",
            "--workspace",
            "/tmp/ws",
            "--model",
            "llama3.1-70B",
            "-vv",
        ]);
        let mut config = Config::default();
        cli.apply_overrides(&mut config);

        assert_eq!(config.agent.workspace_dir, PathBuf::from("/tmp/ws"));
        assert_eq!(config.endpoint.model, "llama3.1-70B");
        assert_eq!(config.endpoint.url, "https://chatjimmy.ai/api/chat");
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::parse_from(["slate", "config", "init", "--force"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                cmd: ConfigCommand::Init { force: true }
            })
        ));

        let cli = Cli::parse_from(["slate", "config", "show"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                cmd: ConfigCommand::Show
            })
        ));
    }
}
