use std::io::{self, BufRead, Write};

use roomscout_core::config::{AppConfig, LoadOptions};
use roomscout_core::Role;

use super::CommandResult;

/// Interactive multi-turn conversation. History is threaded from each
/// returned state into the next turn, so follow-up answers ("December
/// 20 to 22, 2 guests") combine with earlier context. A completed
/// recommendation starts a fresh conversation.
pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("chat", "config_validation", error.to_string(), 2);
        }
    };

    let workflow = match super::build_workflow(&config) {
        Ok(workflow) => workflow,
        Err(error) => return CommandResult::failure("chat", "llm_setup", error.to_string(), 3),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "chat",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                5,
            );
        }
    };

    println!("roomscout chat - describe the hotel you are looking for (exit to quit)");

    let stdin = io::stdin();
    let mut history = Vec::new();
    let mut turns = 0u32;

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                return CommandResult::failure("chat", "io", error.to_string(), 5);
            }
        }

        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            break;
        }

        let state = runtime.block_on(workflow.run_turn(message, history));
        turns += 1;

        let reply = state
            .conversation_history
            .iter()
            .rev()
            .find(|turn| turn.role == Role::Assistant)
            .map(|turn| turn.content.as_str())
            .unwrap_or(state.analysis.as_str());
        println!("{reply}");

        if let Some(cheapest) = &state.cheapest_option {
            println!("\nCheapest option:\n{}", cheapest.compact_line());
        }

        if state.conversation_complete {
            println!("\n(conversation complete - ask about another trip to start over)");
            history = Vec::new();
        } else {
            // Clarifications and failed searches keep the transcript
            // so the next message can build on it.
            history = state.conversation_history;
        }
    }

    CommandResult::success("chat", format!("session closed after {turns} turn(s)"))
}
