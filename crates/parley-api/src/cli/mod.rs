//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. Commands are single verbs
//! (`parley send`, `parley history`).

pub mod config;
pub mod conversation;
pub mod log;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use parley_types::llm::{MessageRole, ModelSelection};

/// Chat with an LLM from the terminal, keeping the conversation on disk.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send a message and print the assistant's reply.
    Send {
        /// Message content.
        content: String,

        /// Role of the message.
        #[arg(long, default_value = "user")]
        role: MessageRole,

        /// Use the configured additional model.
        #[arg(long, conflicts_with = "model")]
        additional: bool,

        /// Use this model identifier for the call.
        #[arg(long)]
        model: Option<String>,

        /// Name of the prompt to use as the system message.
        #[arg(long, default_value = "system")]
        prompt: String,
    },

    /// Append a message to the history without calling the LLM.
    Add {
        /// Message content.
        content: String,

        /// Role of the message.
        #[arg(long, default_value = "user")]
        role: MessageRole,
    },

    /// Show the conversation history, oldest first.
    #[command(alias = "log")]
    History {
        /// Show only the most recent N turns.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show raw LLM request/response log entries, newest first.
    Requests {
        /// Show only the most recent N entries.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Clear the history and request log, then seed the welcome message.
    Reset,

    /// Print the effective configuration (API key redacted).
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Model selection from the `send` flags.
pub fn model_selection(additional: bool, model: Option<String>) -> ModelSelection {
    match (additional, model) {
        (_, Some(name)) => ModelSelection::Named(name),
        (true, None) => ModelSelection::Additional,
        (false, None) => ModelSelection::Primary,
    }
}
