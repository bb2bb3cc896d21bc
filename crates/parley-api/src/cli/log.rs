//! `history` and `requests`: read-only views of the two stores.

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use parley_types::llm::MessageRole;

use crate::state::AppState;

/// Longest content preview shown in a table cell, in characters.
const PREVIEW_CHARS: usize = 80;

fn preview(text: &str) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > PREVIEW_CHARS {
        let cut: String = flat.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        flat
    }
}

fn local_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::White))
            .collect::<Vec<_>>(),
    );
    table
}

/// Print the conversation history, oldest first.
pub async fn history(state: &AppState, limit: Option<usize>, json: bool) -> Result<()> {
    let turns = state.conversation.get_all_turns(limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
        return Ok(());
    }

    if turns.is_empty() {
        println!();
        println!(
            "  {} No messages yet. Start with: {}",
            style("i").blue().bold(),
            style("parley send \"hello\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = new_table(&["#", "Role", "Content", "Time"]);
    for turn in &turns {
        let role_cell = match turn.role {
            MessageRole::System => Cell::new("system").fg(Color::Yellow),
            MessageRole::User => Cell::new("user").fg(Color::Green),
            MessageRole::Assistant => Cell::new("assistant").fg(Color::Cyan),
        };
        table.add_row(vec![
            Cell::new(turn.id).fg(Color::DarkGrey),
            role_cell,
            Cell::new(preview(&turn.content)),
            Cell::new(local_time(&turn.timestamp)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Print request log entries, newest first.
pub async fn requests(state: &AppState, limit: Option<usize>, json: bool) -> Result<()> {
    if !state.config.storage.request_log && !json {
        println!();
        println!(
            "  {} Request logging is disabled ({} in config.toml).",
            style("i").blue().bold(),
            style("storage.request_log = false").yellow()
        );
        println!();
        return Ok(());
    }

    let entries = state.conversation.get_request_log(limit).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!("  {} No requests logged yet.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = new_table(&["#", "Title", "Model", "Tokens", "Time"]);
    for entry in &entries {
        let model = entry.content.request["model"].as_str().unwrap_or("-").to_string();
        let tokens = entry.content.response["usage"]["total_tokens"]
            .as_u64()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(entry.id).fg(Color::DarkGrey),
            Cell::new(&entry.title).fg(Color::Cyan),
            Cell::new(model),
            Cell::new(tokens),
            Cell::new(local_time(&entry.timestamp)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_flattens_whitespace() {
        assert_eq!(preview("line one\n\nline   two"), "line one line two");
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let long = "word ".repeat(40);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS);
        assert!(p.ends_with("..."));
    }
}
