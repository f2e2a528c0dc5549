pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "roomscout",
    about = "Roomscout operator CLI",
    long_about = "Run hotel searches from the terminal, inspect effective configuration, and check runtime readiness.",
    after_help = "Examples:\n  roomscout ask \"Find a cheap hotel in Paris next weekend\"\n  roomscout chat\n  roomscout doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Start an interactive multi-turn hotel search conversation")]
    Chat,
    #[command(about = "Run a single hotel search turn and print the recommendation")]
    Ask {
        #[arg(help = "Natural language hotel search query")]
        query: String,
    },
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, LLM credential readiness, and catalog dataset presence")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Chat => commands::chat::run(),
        Command::Ask { query } => commands::ask::run(&query),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => {
            commands::CommandResult { exit_code: 0, output: commands::doctor::run(json) }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
