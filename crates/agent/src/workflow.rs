//! The workflow controller: sequences extraction, aggregation, and
//! selection for one conversational turn.

use std::sync::Arc;

use tracing::{debug, info, warn};

use roomscout_core::workflow::stage::{advance, Stage, StageEvent};
use roomscout_core::{ConversationTurn, WorkflowState};
use roomscout_providers::aggregate::ProviderSet;

use crate::extract::{ExtractionOutcome, IntentExtractor};
use crate::llm::LlmClient;
use crate::recommend::{RecommendError, RecommendationSelector};

/// Runs the three-stage hotel search pipeline. Owns no conversation
/// state of its own: history is carried by the caller and threaded
/// through each turn.
pub struct HotelSearchWorkflow {
    llm: Arc<dyn LlmClient>,
    providers: ProviderSet,
    extractor: IntentExtractor,
    selector: RecommendationSelector,
}

impl HotelSearchWorkflow {
    pub fn new(llm: Arc<dyn LlmClient>, providers: ProviderSet) -> Self {
        Self {
            llm,
            providers,
            extractor: IntentExtractor::new(),
            selector: RecommendationSelector::new(),
        }
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Executes one turn. Never returns an error: every failure is
    /// converted at its stage boundary into error text on the
    /// returned state, so the transcript only ever sees curated
    /// messages.
    pub async fn run_turn(
        &self,
        utterance: &str,
        prior_history: Vec<ConversationTurn>,
    ) -> WorkflowState {
        let mut state = WorkflowState::begin_turn(utterance, prior_history);
        let mut stage = step(Stage::Start, StageEvent::UtteranceReceived);

        // Stage 1: intent extraction. The new utterance is the last
        // history entry; everything before it is prior context.
        info!(event_name = "workflow.parse_intent", stage = ?stage, "parsing user query");
        let prior_turns = &state.conversation_history[..state.conversation_history.len() - 1];
        let request =
            match self.extractor.extract(self.llm.as_ref(), utterance, prior_turns).await {
                Ok(ExtractionOutcome::Clarify { message, analysis }) => {
                    stage = step(stage, StageEvent::ClarificationRequested);
                    debug!(stage = ?stage, "turn paused for clarification");
                    return state.with_clarification(message, analysis);
                }
                Ok(ExtractionOutcome::Parsed { request, analysis }) => {
                    stage = step(stage, StageEvent::IntentParsed);
                    state = state.with_request(request.clone(), analysis);
                    request
                }
                Err(error) => {
                    warn!(event_name = "workflow.parse_intent_failed", error = %error, "extraction stage fault");
                    return state.with_error("Failed to parse query", "Parse error");
                }
            };

        // Stage 2: concurrent provider aggregation. History is not
        // touched here, so a failed search leaves the transcript
        // exactly as it was before the stage ran.
        info!(event_name = "workflow.search_providers", stage = ?stage, "searching hotel providers");
        match self.providers.search_all(&request).await {
            Ok(results) => {
                stage = step(stage, StageEvent::ResultsReady);
                state = state.with_results(results);
            }
            Err(error) => {
                stage = step(stage, StageEvent::ProvidersFailed);
                warn!(event_name = "workflow.search_failed", stage = ?stage, error = %error, "aggregation stage fault");
                return state.with_error(error.user_message(), error.analysis());
            }
        }

        // Stage 3: recommendation selection.
        info!(event_name = "workflow.select_cheapest", stage = ?stage, "selecting cheapest option");
        match self.selector.recommend(self.llm.as_ref(), &state.search_results).await {
            Ok((cheapest, prose)) => {
                stage = step(stage, StageEvent::RecommendationReady);
                info!(
                    event_name = "workflow.turn_complete",
                    stage = ?stage,
                    provider = %cheapest.provider,
                    price = cheapest.price,
                    "workflow completed"
                );
                state.with_recommendation(cheapest, prose)
            }
            Err(RecommendError::Selection(error)) => {
                stage = step(stage, StageEvent::SelectionFailed);
                debug!(stage = ?stage, error = %error, "selection found nothing usable");
                state.with_error(error.user_message(), error.analysis())
            }
            Err(RecommendError::Llm(error)) => {
                stage = step(stage, StageEvent::SelectionFailed);
                warn!(event_name = "workflow.analysis_failed", stage = ?stage, error = %error, "selection stage fault");
                state.with_error("Failed to analyze results", "Analysis error")
            }
        }
    }
}

/// The controller and the transition table are kept in lockstep; a
/// rejected transition here is a bug, logged loudly while the turn
/// continues with its current stage.
fn step(current: Stage, event: StageEvent) -> Stage {
    advance(current, event).unwrap_or_else(|error| {
        tracing::error!(error = %error, "workflow transition rejected");
        current
    })
}
