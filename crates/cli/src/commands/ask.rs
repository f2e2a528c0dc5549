use roomscout_core::config::{AppConfig, LoadOptions};
use roomscout_core::Role;

use super::CommandResult;

/// Runs a single workflow turn with no prior history. A turn that
/// pauses for clarification is still a successful command; the
/// clarification question is the output.
pub fn run(query: &str) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure("ask", "config_validation", error.to_string(), 2);
        }
    };

    let workflow = match super::build_workflow(&config) {
        Ok(workflow) => workflow,
        Err(error) => return CommandResult::failure("ask", "llm_setup", error.to_string(), 3),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "ask",
                "runtime",
                format!("failed to initialize async runtime: {error}"),
                5,
            );
        }
    };

    let state = runtime.block_on(workflow.run_turn(query, Vec::new()));

    if let Some(error) = &state.error {
        if state.needs_user_input {
            return CommandResult::success("ask", format!("needs clarification: {error}"));
        }
        return CommandResult::failure("ask", "workflow", error.clone(), 4);
    }

    let prose = state
        .conversation_history
        .iter()
        .rev()
        .find(|turn| turn.role == Role::Assistant)
        .map(|turn| turn.content.clone())
        .unwrap_or_else(|| state.analysis.clone());

    let message = match &state.cheapest_option {
        Some(cheapest) => format!("{prose}\n\nCheapest option:\n{}", cheapest.compact_line()),
        None => prose,
    };

    CommandResult::success("ask", message)
}
