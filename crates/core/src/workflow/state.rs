use serde::{Deserialize, Serialize};

use crate::domain::conversation::ConversationTurn;
use crate::domain::listing::{ProviderResults, RoomListing};
use crate::domain::search::SearchRequest;

/// The aggregate state threaded through one workflow turn and handed
/// back to the presentation layer.
///
/// The state is updated by value: each stage consumes the previous
/// state and returns a new one with specific fields replaced, so no
/// stage ever observes a partially updated record. Only `history`
/// survives across turns, and only because the caller passes it back
/// into the next turn.
///
/// Invariants:
/// - `needs_user_input` implies no provider search ran this turn.
/// - `error` and a completed recommendation are mutually exclusive.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    pub search_request: Option<SearchRequest>,
    pub search_results: Vec<ProviderResults>,
    pub cheapest_option: Option<RoomListing>,
    pub analysis: String,
    pub error: Option<String>,
    pub conversation_history: Vec<ConversationTurn>,
    pub needs_user_input: bool,
    pub conversation_complete: bool,
}

impl WorkflowState {
    /// Starts a turn: the new user utterance is appended to the
    /// carried-forward history before any stage runs.
    pub fn begin_turn(utterance: &str, mut prior_history: Vec<ConversationTurn>) -> Self {
        prior_history.push(ConversationTurn::user(utterance));
        Self {
            search_request: None,
            search_results: Vec::new(),
            cheapest_option: None,
            analysis: utterance.to_string(),
            error: None,
            conversation_history: prior_history,
            needs_user_input: false,
            conversation_complete: false,
        }
    }

    /// Extraction succeeded; the request drives the search stage.
    pub fn with_request(mut self, request: SearchRequest, analysis: impl Into<String>) -> Self {
        self.search_request = Some(request);
        self.analysis = analysis.into();
        self
    }

    /// Extraction paused the turn for user clarification. The
    /// clarification message becomes an assistant turn so the caller
    /// can render it and solicit the next utterance.
    pub fn with_clarification(
        mut self,
        message: impl Into<String>,
        analysis: impl Into<String>,
    ) -> Self {
        let message = message.into();
        self.conversation_history.push(ConversationTurn::assistant(message.clone()));
        self.error = Some(message);
        self.analysis = analysis.into();
        self.needs_user_input = true;
        self
    }

    pub fn with_results(mut self, results: Vec<ProviderResults>) -> Self {
        let total: usize = results.iter().map(|result| result.total_results).sum();
        self.analysis = format!("Found {} hotels across {} providers", total, results.len());
        self.search_results = results;
        self
    }

    /// Selection succeeded: the turn is complete and the prose
    /// recommendation joins the transcript.
    pub fn with_recommendation(mut self, cheapest: RoomListing, prose: impl Into<String>) -> Self {
        let prose = prose.into();
        self.conversation_history.push(ConversationTurn::assistant(prose.clone()));
        self.cheapest_option = Some(cheapest);
        self.analysis = prose;
        self.conversation_complete = true;
        self
    }

    /// A stage failed; the turn ends with error text and a short
    /// diagnostic analysis. History is left untouched.
    pub fn with_error(mut self, error: impl Into<String>, analysis: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self.analysis = analysis.into();
        self
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
