//! Configuration Store
//!
//! Loading, saving and resolving the TOML configuration.

use crate::llm::{LlmConfig, DEFAULT_ENDPOINT, DEFAULT_MODEL, STATS_SENTINEL};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

/// Complete Slate configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Model service
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Session behavior
    #[serde(default)]
    pub agent: AgentConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let content = self.to_toml()?;
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load the file found by [`super::find_config_file`], or defaults
    pub fn load_or_default() -> anyhow::Result<Self> {
        match super::find_config_file() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Reject values the session cannot run with
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.endpoint.url.trim().is_empty() {
            anyhow::bail!("endpoint.url must not be empty");
        }
        if self.agent.tool_marker.trim().is_empty() {
            anyhow::bail!("agent.tool_marker must not be empty");
        }
        let mut components = Path::new(&self.agent.command_output_file).components();
        let plain_name = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if self.agent.command_output_file.trim().is_empty() || !plain_name {
            anyhow::bail!(
                "agent.command_output_file must be a plain file name, got '{}'",
                self.agent.command_output_file
            );
        }
        Ok(())
    }

    /// Workspace root, relative paths taken from the working directory
    pub fn workspace_dir(&self) -> PathBuf {
        resolve_dir(&self.agent.workspace_dir)
    }

    /// Transcript directory, relative paths taken from the working directory
    pub fn log_dir(&self) -> PathBuf {
        resolve_dir(&self.agent.log_dir)
    }
}

fn resolve_dir(dir: &Path) -> PathBuf {
    if dir.is_absolute() {
        return dir.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(dir),
        Err(_) => dir.to_path_buf(),
    }
}

/// Model endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_top_k")]
    pub top_k: u32,

    /// Whole-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Everything from this marker onward is dropped from replies
    #[serde(default = "default_stats_sentinel")]
    pub stats_sentinel: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            model: default_model(),
            top_k: default_top_k(),
            timeout_secs: default_timeout_secs(),
            stats_sentinel: default_stats_sentinel(),
        }
    }
}

impl From<&EndpointConfig> for LlmConfig {
    fn from(endpoint: &EndpointConfig) -> Self {
        LlmConfig {
            url: endpoint.url.clone(),
            model: endpoint.model.clone(),
            top_k: endpoint.top_k,
            timeout: Duration::from_secs(endpoint.timeout_secs),
            stats_sentinel: endpoint.stats_sentinel.clone(),
        }
    }
}

fn default_url() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_top_k() -> u32 {
    8
}

fn default_timeout_secs() -> u64 {
    300
}

fn default_stats_sentinel() -> String {
    STATS_SENTINEL.to_string()
}

/// Session settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Sandbox root
    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: PathBuf,

    /// Where session transcripts go
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Pause before every model call
    #[serde(default = "default_rate_limit_ms")]
    pub rate_limit_ms: u64,

    /// Cap for `read_file` and `run_command` output
    #[serde(default = "default_max_read_chars")]
    pub max_read_chars: usize,

    /// Side-channel file for `run_command`, inside the workspace
    #[serde(default = "default_command_output_file")]
    pub command_output_file: String,

    #[serde(default = "default_tool_marker")]
    pub tool_marker: String,

    /// Inputs that end the session, compared case-insensitively
    #[serde(default = "default_exit_keywords")]
    pub exit_keywords: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            workspace_dir: default_workspace_dir(),
            log_dir: default_log_dir(),
            rate_limit_ms: default_rate_limit_ms(),
            max_read_chars: default_max_read_chars(),
            command_output_file: default_command_output_file(),
            tool_marker: default_tool_marker(),
            exit_keywords: default_exit_keywords(),
        }
    }
}

fn default_workspace_dir() -> PathBuf {
    PathBuf::from("workspace")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_rate_limit_ms() -> u64 {
    500
}

fn default_max_read_chars() -> usize {
    crate::agent::tool::DEFAULT_MAX_READ_CHARS
}

fn default_command_output_file() -> String {
    crate::agent::tool::DEFAULT_COMMAND_OUTPUT_FILE.to_string()
}

fn default_tool_marker() -> String {
    crate::agent::protocol::TOOL_CALL_MARKER.to_string()
}

fn default_exit_keywords() -> Vec<String> {
    vec!["quit".to_string(), "exit".to_string()]
}
