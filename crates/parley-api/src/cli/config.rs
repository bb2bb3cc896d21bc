//! `config`: show the effective configuration.

use std::path::Path;

use anyhow::Result;
use console::style;

use parley_types::config::ParleyConfig;

const REDACTED: &str = "[REDACTED]";

/// Copy of `config` safe to print.
pub fn redacted(config: &ParleyConfig) -> ParleyConfig {
    let mut shown = config.clone();
    if shown.llm.api_key.is_some() {
        shown.llm.api_key = Some(REDACTED.to_string());
    }
    shown
}

pub fn show(data_dir: &Path, config: &ParleyConfig, json: bool) -> Result<()> {
    let shown = redacted(config);

    if json {
        let value = serde_json::json!({
            "data_dir": data_dir,
            "config": shown,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Data directory: {}",
        style("⚙").bold(),
        style(data_dir.display()).cyan()
    );
    if let Err(e) = config.llm.validate() {
        println!("  {} {e}", style("!").yellow().bold());
    }
    println!();
    println!("{}", toml::to_string_pretty(&shown)?);
    Ok(())
}
