//! Conversational endpoint. One POST is one workflow turn; the full
//! state comes back so the client can thread history into the next
//! request.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use roomscout_agent::HotelSearchWorkflow;
use roomscout_core::ConversationTurn;

#[derive(Clone)]
pub struct ChatState {
    pub workflow: Arc<HotelSearchWorkflow>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

pub fn router(workflow: Arc<HotelSearchWorkflow>) -> Router {
    Router::new().route("/api/chat", post(chat)).with_state(ChatState { workflow })
}

/// Workflow-level failures are part of the returned state, so this
/// handler only ever rejects requests with no message at all.
pub async fn chat(State(state): State<ChatState>, Json(request): Json<ChatRequest>) -> Response {
    if request.message.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Message is required" })))
            .into_response();
    }

    let correlation_id = Uuid::new_v4();
    info!(
        event_name = "api.chat.turn_start",
        correlation_id = %correlation_id,
        history_turns = request.history.len(),
        "processing chat turn"
    );

    let outcome = state.workflow.run_turn(&request.message, request.history).await;

    info!(
        event_name = "api.chat.turn_finished",
        correlation_id = %correlation_id,
        complete = outcome.conversation_complete,
        needs_user_input = outcome.needs_user_input,
        error = outcome.error.as_deref().unwrap_or(""),
        "chat turn finished"
    );

    (StatusCode::OK, Json(outcome)).into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::Json;

    use roomscout_agent::{HotelSearchWorkflow, LlmClient, LlmError};
    use roomscout_core::WorkflowState;
    use roomscout_providers::aggregate::ProviderSet;

    use super::{chat, ChatRequest, ChatState};

    struct CannedLlm {
        responses: Vec<&'static str>,
        calls: std::sync::atomic::AtomicUsize,
    }

    #[async_trait]
    impl LlmClient for CannedLlm {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            let index = self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            self.responses
                .get(index)
                .map(|response| response.to_string())
                .ok_or(LlmError::EmptyResponse)
        }
    }

    fn workflow(responses: Vec<&'static str>) -> ChatState {
        let llm = Arc::new(CannedLlm { responses, calls: Default::default() });
        ChatState {
            workflow: Arc::new(HotelSearchWorkflow::new(
                llm,
                ProviderSet::with_default_mocks(false),
            )),
        }
    }

    async fn body_of(response: axum::response::Response) -> WorkflowState {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        serde_json::from_slice(&bytes).expect("workflow state json")
    }

    #[tokio::test]
    async fn blank_message_is_rejected() {
        let state = workflow(vec![]);
        let response = chat(
            State(state),
            Json(ChatRequest { message: "   ".to_string(), history: Vec::new() }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn successful_turn_returns_the_full_workflow_state() {
        let state = workflow(vec![
            r#"{"destination":"Paris","checkIn":"2026-09-04","checkOut":"2026-09-06","guests":2,"rooms":1,"needsClarification":false}"#,
            "Budget Stay is your best value at $75 per night.",
        ]);

        let response = chat(
            State(state),
            Json(ChatRequest {
                message: "Find a hotel in Paris".to_string(),
                history: Vec::new(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let outcome = body_of(response).await;
        assert!(outcome.conversation_complete);
        assert_eq!(outcome.cheapest_option.expect("cheapest").price, 75.0);
    }

    #[tokio::test]
    async fn workflow_failures_are_data_not_http_errors() {
        // Scripted responses run out before the extraction call, which
        // surfaces as a parse failure inside the state.
        let state = workflow(vec![]);

        let response = chat(
            State(state),
            Json(ChatRequest {
                message: "Find a hotel in Paris".to_string(),
                history: Vec::new(),
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let outcome = body_of(response).await;
        assert_eq!(outcome.error.as_deref(), Some("Failed to parse query"));
    }
}
