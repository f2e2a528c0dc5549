use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stages of one conversational search turn.
///
/// `NeedsClarification`, `SearchFailed`, `SelectionFailed`, and `Done`
/// are terminal for the turn; the next user utterance starts again at
/// `Start` with the accumulated history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Start,
    ParsingIntent,
    NeedsClarification,
    Searching,
    SearchFailed,
    Selecting,
    SelectionFailed,
    Done,
}

impl Stage {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::NeedsClarification | Self::SearchFailed | Self::SelectionFailed | Self::Done
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageEvent {
    UtteranceReceived,
    ClarificationRequested,
    IntentParsed,
    ProvidersFailed,
    ResultsReady,
    SelectionFailed,
    RecommendationReady,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("invalid workflow transition from {stage:?} using event {event:?}")]
pub struct StageTransitionError {
    pub stage: Stage,
    pub event: StageEvent,
}

/// The guarded transition table for the turn state machine.
pub fn advance(current: Stage, event: StageEvent) -> Result<Stage, StageTransitionError> {
    use Stage::{
        Done, NeedsClarification, ParsingIntent, Searching, SearchFailed, Selecting,
        SelectionFailed, Start,
    };
    use StageEvent::{
        ClarificationRequested, IntentParsed, ProvidersFailed, RecommendationReady, ResultsReady,
        UtteranceReceived,
    };

    let next = match (current, event) {
        (Start, UtteranceReceived) => ParsingIntent,
        (ParsingIntent, ClarificationRequested) => NeedsClarification,
        (ParsingIntent, IntentParsed) => Searching,
        (Searching, ProvidersFailed) => SearchFailed,
        (Searching, ResultsReady) => Selecting,
        (Selecting, StageEvent::SelectionFailed) => SelectionFailed,
        (Selecting, RecommendationReady) => Done,
        _ => return Err(StageTransitionError { stage: current, event }),
    };

    Ok(next)
}
