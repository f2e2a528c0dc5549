//! Intent extraction: the latest user utterance (plus conversation
//! context) becomes either a complete `SearchRequest` or a
//! clarification question that pauses the turn.

use chrono::{Duration, NaiveDate, Utc};
use serde::Deserialize;

use roomscout_core::domain::conversation::render_transcript;
use roomscout_core::{ConversationTurn, SearchRequest};

use crate::llm::{LlmClient, LlmError};

/// Shown when the collaborator's response cannot be parsed at all.
/// Unparsable output is a recoverable condition, never a fault.
pub const FALLBACK_CLARIFICATION: &str =
    "Could not parse your hotel search request. Please provide destination, dates, and number of guests.";

const CLARIFY_ANALYSIS: &str = "Query needs clarification";
const UNPARSABLE_ANALYSIS: &str = "Failed to parse query";

#[derive(Clone, Debug, PartialEq)]
pub enum ExtractionOutcome {
    /// The model asked for more information (or its answer was not
    /// usable); `message` goes back to the user verbatim.
    Clarify { message: String, analysis: String },
    /// A complete request, defaults applied.
    Parsed { request: SearchRequest, analysis: String },
}

#[derive(Clone, Debug, Default)]
pub struct IntentExtractor;

/// The schema the collaborator is instructed to return.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractionPayload {
    destination: Option<String>,
    check_in: Option<String>,
    check_out: Option<String>,
    guests: Option<u32>,
    rooms: Option<u32>,
    #[serde(default)]
    needs_clarification: bool,
    clarification_message: Option<String>,
}

impl IntentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub async fn extract(
        &self,
        llm: &dyn LlmClient,
        latest_utterance: &str,
        history: &[ConversationTurn],
    ) -> Result<ExtractionOutcome, LlmError> {
        let system_prompt = build_system_prompt(history);
        let response = llm.complete(&system_prompt, latest_utterance).await?;
        Ok(self.interpret(&response))
    }

    /// Parses the collaborator's textual response. Every malformed
    /// shape funnels into the fallback clarification.
    fn interpret(&self, response: &str) -> ExtractionOutcome {
        let json = strip_code_fence(response);
        let payload: ExtractionPayload = match serde_json::from_str(json.trim()) {
            Ok(payload) => payload,
            Err(_) => return unparsable(),
        };

        if payload.needs_clarification {
            let message = payload
                .clarification_message
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_CLARIFICATION.to_string());
            return ExtractionOutcome::Clarify {
                message,
                analysis: CLARIFY_ANALYSIS.to_string(),
            };
        }

        let destination = match payload.destination {
            Some(destination) if !destination.trim().is_empty() => destination,
            _ => return unparsable(),
        };

        let (check_in, check_out) = match (
            parse_date(payload.check_in.as_deref()),
            parse_date(payload.check_out.as_deref()),
        ) {
            (Ok(check_in), Ok(check_out)) => resolve_dates(check_in, check_out),
            _ => return unparsable(),
        };

        let request = SearchRequest {
            destination,
            check_in,
            check_out,
            guests: payload.guests.unwrap_or(1).max(1),
            rooms: payload.rooms.unwrap_or(1).max(1),
        };
        let analysis = request.summary();

        ExtractionOutcome::Parsed { request, analysis }
    }
}

fn unparsable() -> ExtractionOutcome {
    ExtractionOutcome::Clarify {
        message: FALLBACK_CLARIFICATION.to_string(),
        analysis: UNPARSABLE_ANALYSIS.to_string(),
    }
}

/// Missing check-in defaults to tomorrow, missing check-out to the day
/// after check-in. Computed against wall-clock now at extraction time.
fn resolve_dates(check_in: Option<NaiveDate>, check_out: Option<NaiveDate>) -> (NaiveDate, NaiveDate) {
    let check_in = check_in.unwrap_or_else(|| Utc::now().date_naive() + Duration::days(1));
    let check_out = check_out.unwrap_or(check_in + Duration::days(1));
    (check_in, check_out)
}

fn parse_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ()> {
    match raw {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ()),
    }
}

fn build_system_prompt(history: &[ConversationTurn]) -> String {
    let has_context = !history.is_empty();
    let mut prompt = String::new();

    if has_context {
        prompt.push_str(
            "You are a hotel search assistant. Continue this conversation by extracting hotel search parameters.\n\n",
        );
        prompt.push_str("Previous conversation context:\n");
        prompt.push_str(&render_transcript(history));
        prompt.push_str("\n\n");
    } else {
        prompt.push_str(
            "You are a hotel search assistant. Parse the user's natural language query and extract hotel search parameters.\n\n",
        );
    }

    prompt.push_str(
        "Extract the following information:\n\
         - destination: The city/location they want to stay\n\
         - checkIn: Check-in date (convert to YYYY-MM-DD format, use context if dates mentioned previously)\n\
         - checkOut: Check-out date (convert to YYYY-MM-DD format, use context if dates mentioned previously)\n\
         - guests: Number of guests (default to 1 if not specified, use context if mentioned previously)\n\
         - rooms: Number of rooms (default to 1 if not specified, use context if mentioned previously)\n\n",
    );

    if has_context {
        prompt.push_str(
            "Use the conversation history to fill in missing information. If the user is providing additional details (like dates), combine them with previous information.\n\n",
        );
    } else {
        prompt.push_str("If any required information is missing, ask for clarification.\n\n");
    }

    prompt.push_str(
        "Respond ONLY with a JSON object in this exact format:\n\
         {\n\
           \"destination\": \"string\",\n\
           \"checkIn\": \"YYYY-MM-DD\",\n\
           \"checkOut\": \"YYYY-MM-DD\",\n\
           \"guests\": number,\n\
           \"rooms\": number,\n\
           \"needsClarification\": boolean,\n\
           \"clarificationMessage\": \"string (only if needsClarification is true)\"\n\
         }",
    );

    prompt
}

/// Models routinely wrap JSON in a fenced code block; strip one if
/// present anywhere in the response.
fn strip_code_fence(raw: &str) -> &str {
    let Some(open) = raw.find("```") else {
        return raw;
    };

    let mut inner = &raw[open + 3..];
    if let Some(rest) = inner.strip_prefix("json") {
        inner = rest;
    }
    match inner.find("```") {
        Some(close) => &inner[..close],
        None => inner,
    }
}
