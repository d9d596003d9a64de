//! Interactive terminal session
//!
//! Line-oriented REPL: read a line, hand it to the agent, print the reply.
//! Tool calls are echoed as they happen. Ctrl-C or end of input ends the
//! session cleanly.

use anyhow::{Context, Result};
use console::Style;
use slate_core::agent::{Agent, AgentBuilder, AgentEvent, TerminalOperator, TurnOutcome};
use slate_core::config::Config;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

/// Run an interactive session until exit, end of input or Ctrl-C
pub async fn run(config: &Config) -> Result<()> {
    let cancellation = CancellationToken::new();
    let dim = Style::new().dim();

    let mut agent = AgentBuilder::from_config(
        config,
        Arc::new(TerminalOperator::new()),
        cancellation.clone(),
    )
    .context("Failed to start session")?
    .with_event_callback(Arc::new(move |event: &AgentEvent| match event {
        AgentEvent::ToolCall { line, .. } => {
            println!("  {} {}", dim.apply_to("[tool]"), line);
        }
    }))
    .build();

    print_banner(&agent, config);

    let signal_token = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let result = repl(&mut agent, &cancellation).await;
    agent.finish();
    let status = agent.rate_limit_status();
    tracing::info!(
        model_requests = status.requests,
        delay_ms = status.delay.as_millis() as u64,
        "session closed"
    );
    result
}

async fn repl(agent: &mut Agent, cancellation: &CancellationToken) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let bot = Style::new().cyan().bold();
    let error = Style::new().red();

    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read input")?,
            _ = cancellation.cancelled() => None,
        };
        let Some(line) = line else {
            println!("\nBye!");
            return Ok(());
        };

        let outcome = tokio::select! {
            outcome = agent.submit(&line) => outcome,
            _ = cancellation.cancelled() => Ok(TurnOutcome::Cancelled),
        };

        match outcome {
            Ok(TurnOutcome::Ignored) => continue,
            Ok(TurnOutcome::Exit) => {
                println!("Bye!");
                return Ok(());
            }
            Ok(TurnOutcome::Cancelled) => {
                println!("\nBye!");
                return Ok(());
            }
            Ok(TurnOutcome::Reply(text)) => {
                println!("{} {}\n", bot.apply_to("Bot:"), text);
            }
            Err(e) => {
                eprintln!("{}", error.apply_to(e.user_message()));
                return Err(e).context("Session ended");
            }
        }
    }
}

fn print_banner(agent: &Agent, config: &Config) {
    let title = Style::new().bold();
    let quit = config
        .agent
        .exit_keywords
        .first()
        .map(String::as_str)
        .unwrap_or("quit");

    println!("{}", title.apply_to(format!("Slate agent ({})", agent.model_name())));
    println!("Working directory: {}", agent.context().workspace.root().display());
    if let Some(path) = agent.transcript_path() {
        println!("Session log: {}", path.display());
    }
    println!("Tools: {}", agent.tools().tool_names().join(", "));
    println!("Type '{}' to exit.\n", quit);
}
