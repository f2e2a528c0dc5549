use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One message in the conversation transcript.
///
/// Turns are append-only; insertion order is meaningful because the
/// most recent user turn drives the next extraction call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into(), timestamp: Utc::now() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into(), timestamp: Utc::now() }
    }
}

/// Renders turns as `role: content` lines for prompt context.
pub fn render_transcript(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .map(|turn| format!("{}: {}", turn.role.as_str(), turn.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{render_transcript, ConversationTurn};

    #[test]
    fn transcript_preserves_insertion_order() {
        let turns = vec![
            ConversationTurn::user("Find me a hotel in Tokyo"),
            ConversationTurn::assistant("Which dates are you traveling?"),
            ConversationTurn::user("December 20 to 22, 2 guests"),
        ];

        let rendered = render_transcript(&turns);
        assert_eq!(
            rendered,
            "user: Find me a hotel in Tokyo\nassistant: Which dates are you traveling?\nuser: December 20 to 22, 2 guests"
        );
    }

    #[test]
    fn empty_history_renders_empty() {
        assert!(render_transcript(&[]).is_empty());
    }
}
