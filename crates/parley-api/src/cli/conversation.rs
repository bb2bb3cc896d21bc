//! `send`, `add` and `reset`: the commands that change the conversation.

use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use parley_core::conversation::TurnOptions;
use parley_types::llm::{CallOptions, MessageRole, ModelSelection};
use parley_types::turn::{NewTurn, Turn};

use crate::state::AppState;

/// Output settings shared by the handlers.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    fn styled(self) -> bool {
        !self.json && !self.quiet
    }
}

fn role_label(role: MessageRole) -> String {
    match role {
        MessageRole::System => style("system").yellow().bold().to_string(),
        MessageRole::User => style("you").green().bold().to_string(),
        MessageRole::Assistant => style("assistant").cyan().bold().to_string(),
    }
}

/// Send a turn to the LLM and print the stored reply.
pub async fn send(
    state: &AppState,
    content: String,
    role: MessageRole,
    model: ModelSelection,
    prompt: String,
    out: Output,
) -> Result<()> {
    let options = TurnOptions {
        role,
        call: CallOptions::with_model(model),
        prompt,
    };

    let spinner = out.styled().then(|| {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message("Thinking...");
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner
    });

    let result = state.conversation.process_turn_with(content, &options).await;
    if let Some(spinner) = &spinner {
        spinner.finish_and_clear();
    }
    state.conversation.flush_request_log().await;

    let reply = result?;
    print_turn(&reply, out)
}

/// Append a turn without calling the LLM.
pub async fn add(state: &AppState, content: String, role: MessageRole, out: Output) -> Result<()> {
    let turn = state
        .conversation
        .add_raw_turn(NewTurn::new(role, content))
        .await?;

    if out.json {
        println!("{}", serde_json::to_string_pretty(&turn)?);
    } else if !out.quiet {
        println!(
            "  {} Stored {} turn #{}",
            style("✓").green().bold(),
            turn.role,
            turn.id
        );
    }
    Ok(())
}

/// Clear both stores and print what the history looks like afterwards.
pub async fn reset(state: &AppState, out: Output) -> Result<()> {
    let turns = state.conversation.reset_conversation().await?;

    if out.json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
        return Ok(());
    }
    if out.quiet {
        return Ok(());
    }

    println!();
    println!("  {} Conversation reset", style("✓").green().bold());
    match turns.first() {
        Some(welcome) => {
            println!();
            println!("  {} {}", role_label(welcome.role), welcome.content);
        }
        None => println!(
            "  {} No welcome prompt found; history is empty.",
            style("i").blue().bold()
        ),
    }
    println!();
    Ok(())
}

fn print_turn(turn: &Turn, out: Output) -> Result<()> {
    if out.json {
        println!("{}", serde_json::to_string_pretty(turn)?);
    } else if out.quiet {
        println!("{}", turn.content);
    } else {
        println!();
        println!("  {}", role_label(turn.role));
        for line in turn.content.lines() {
            println!("  {line}");
        }
        println!();
    }
    Ok(())
}
