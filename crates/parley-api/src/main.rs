//! Parley CLI entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, loads configuration, wires the conversation service
//! and dispatches to the command handlers.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::conversation::Output;
use cli::{Cli, Commands};
use parley_observe::tracing_setup::{init_tracing, shutdown_tracing};
use state::{AppState, load_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,parley_core=debug,parley_infra=debug",
        _ => "trace",
    };
    if let Err(e) = init_tracing(filter, cli.otel) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parley", &mut std::io::stdout());
        return Ok(());
    }

    let (data_dir, config) = load_environment().await?;

    // Showing the configuration must work even when it is incomplete
    if let Commands::Config = &cli.command {
        return cli::config::show(&data_dir, &config, cli.json);
    }

    let state = AppState::from_config(data_dir, config)?;
    let out = Output {
        json: cli.json,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Send {
            content,
            role,
            additional,
            model,
            prompt,
        } => {
            let selection = cli::model_selection(additional, model);
            cli::conversation::send(&state, content, role, selection, prompt, out).await?;
        }

        Commands::Add { content, role } => {
            cli::conversation::add(&state, content, role, out).await?;
        }

        Commands::History { limit } => {
            cli::log::history(&state, limit, cli.json).await?;
        }

        Commands::Requests { limit } => {
            cli::log::requests(&state, limit, cli.json).await?;
        }

        Commands::Reset => {
            cli::conversation::reset(&state, out).await?;
        }

        Commands::Config | Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
