//! Helmsman CLI: interactive REPL and single-message mode.

use anyhow::Context;
use async_trait::async_trait;
use clap::Parser;
use helmsman_agent::{OrchestrationLoop, TurnOutcome};
use helmsman_config::AppConfig;
use helmsman_core::{AgentEvent, ApprovalGate, AutoApprove};
use helmsman_providers::OpenAiCompatClient;
use std::io::Write;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant with access to tools. \
Use them when they help answer the user's request.";

#[derive(Parser, Debug)]
#[command(name = "helmsman", version, about = "A tool-using conversational agent")]
struct Cli {
    /// Send a single message and exit instead of starting the REPL
    #[arg(short, long)]
    message: Option<String>,

    /// Override the configured model
    #[arg(long, env = "HELMSMAN_MODEL")]
    model: Option<String>,

    /// Override the system prompt
    #[arg(long)]
    system: Option<String>,

    /// Approve all sensitive tool calls without prompting
    #[arg(long)]
    yes: bool,
}

/// Prompts on stdin for sensitive tool calls.
struct StdinApprovalGate;

#[async_trait]
impl ApprovalGate for StdinApprovalGate {
    async fn request(&self, tool_name: &str, arguments: &serde_json::Value) -> bool {
        let prompt = format!(
            "\n  {tool_name} wants to run with {arguments}\n  Allow? [y/N] "
        );
        let answer = tokio::task::spawn_blocking(move || {
            print!("{prompt}");
            let _ = std::io::stdout().flush();
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).ok();
            line
        })
        .await
        .unwrap_or_default();
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("helmsman=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load().context("Failed to load configuration")?;
    if let Some(model) = cli.model {
        config.default_model = model;
    }

    let api_key = config.api_key.clone().context(
        "No API key configured. Set HELMSMAN_API_KEY (or GROQ_API_KEY), \
         or add api_key to ~/.helmsman/config.toml",
    )?;
    let client = Arc::new(OpenAiCompatClient::new(
        "helmsman",
        config.api_url.clone(),
        api_key,
    ));

    let system_prompt = cli
        .system
        .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

    let mut agent = OrchestrationLoop::new(client, system_prompt, &config)
        .with_registry(helmsman_tools::default_registry());
    agent = if cli.yes {
        agent.with_approval_gate(Arc::new(AutoApprove))
    } else {
        agent.with_approval_gate(Arc::new(StdinApprovalGate))
    };

    spawn_event_printer(&agent);

    match cli.message {
        Some(message) => run_single(&mut agent, &message).await,
        None => run_repl(&mut agent).await,
    }
}

/// Print tool lifecycle events as they happen.
fn spawn_event_printer(agent: &OrchestrationLoop) {
    let mut events = agent.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event.as_ref() {
                AgentEvent::ToolStarted { tool_name, .. } => {
                    eprintln!("  [tool] {tool_name} ...");
                }
                AgentEvent::ToolFinished {
                    tool_name,
                    success,
                    duration_ms,
                    ..
                } => {
                    let mark = if *success { "ok" } else { "failed" };
                    eprintln!("  [tool] {tool_name} {mark} ({duration_ms}ms)");
                }
                AgentEvent::ContextCompacted {
                    messages_collapsed,
                    tokens_before,
                    tokens_after,
                    ..
                } => {
                    eprintln!(
                        "  [context] compacted {messages_collapsed} messages \
                         ({tokens_before} -> {tokens_after} tokens)"
                    );
                }
                _ => {}
            }
        }
    });
}

async fn run_single(agent: &mut OrchestrationLoop, message: &str) -> anyhow::Result<()> {
    match agent.run_turn(message).await? {
        TurnOutcome::Final(answer) => {
            println!("{answer}");
            Ok(())
        }
        TurnOutcome::MaxIterations(n) => {
            anyhow::bail!("Turn aborted after {n} tool iterations")
        }
    }
}

async fn run_repl(agent: &mut OrchestrationLoop) -> anyhow::Result<()> {
    println!("helmsman. Type a message, /stats, /clear, or /quit");
    let stdin = std::io::stdin();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break; // EOF
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input {
            "/quit" | "/exit" => break,
            "/clear" => {
                agent.reset();
                println!("Conversation cleared.");
            }
            "/stats" => {
                let stats = agent.stats();
                println!(
                    "messages: {} | tokens: {}/{} ({:.1}%) | summarizations: {}",
                    stats.total_messages,
                    stats.total_tokens,
                    stats.max_tokens,
                    stats.utilization_pct,
                    stats.summarization_count
                );
            }
            _ => match agent.run_turn(input).await {
                Ok(TurnOutcome::Final(answer)) => println!("{answer}"),
                Ok(TurnOutcome::MaxIterations(n)) => {
                    println!("(turn aborted after {n} tool iterations)");
                }
                Err(e) => eprintln!("error: {e}"),
            },
        }
    }

    Ok(())
}
