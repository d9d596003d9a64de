//! `slate` - a terminal agent confined to a sandboxed workspace
//!
//! The model edits files through `TOOL_CALL:` lines, keeps its plan on a
//! blackboard that is re-sent with every request, and asks the person at the
//! terminal whenever something has to be executed.

use anyhow::{bail, Context, Result};
use clap::Parser;
use console::Style;
use std::time::Duration;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{Cli, Commands, ConfigCommand};
use slate_core::config::{default_config_path, Config};

mod cli;
mod terminal;

/// Main entry point
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    let result = runtime.block_on(run(cli));
    // A pending stdin read cannot be cancelled; don't wait on it.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

fn init_tracing(cli: &Cli) {
    // Logs go to stderr so they never interleave with the prompt on stdout
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default().context("Failed to load configuration")?,
    };
    cli.apply_overrides(&mut config);

    match &cli.command {
        Some(Commands::Config { cmd }) => match cmd {
            ConfigCommand::Show => {
                print!("{}", config.to_toml()?);
            }
            ConfigCommand::Init { force } => {
                let path = default_config_path().context("Could not determine config directory")?;
                if path.exists() && !force {
                    bail!(
                        "{} already exists (use --force to overwrite)",
                        path.display()
                    );
                }
                Config::default().save(&path)?;
                let green = Style::new().green();
                println!("{} {}", green.apply_to("Wrote"), path.display());
            }
        },
        None => {
            tracing::info!(
                workspace = %config.workspace_dir().display(),
                model = %config.endpoint.model,
                "starting session"
            );
            terminal::run(&config).await?;
        }
    }

    Ok(())
}
