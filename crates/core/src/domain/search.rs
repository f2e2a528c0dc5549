use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Structured search parameters extracted from the conversation.
///
/// Produced once per turn by the intent extractor and never mutated
/// afterwards; a later turn replaces the whole value if the user
/// changes their mind.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub destination: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub rooms: u32,
}

impl SearchRequest {
    /// A request is searchable only with a non-empty destination.
    pub fn has_destination(&self) -> bool {
        !self.destination.trim().is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "Searching for hotels in {} from {} to {} for {} guests in {} room(s)",
            self.destination, self.check_in, self.check_out, self.guests, self.rooms
        )
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::SearchRequest;

    fn request(destination: &str) -> SearchRequest {
        SearchRequest {
            destination: destination.to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 12, 20).expect("valid date"),
            check_out: NaiveDate::from_ymd_opt(2026, 12, 22).expect("valid date"),
            guests: 2,
            rooms: 1,
        }
    }

    #[test]
    fn blank_destination_is_not_searchable() {
        assert!(!request("   ").has_destination());
        assert!(request("Tokyo").has_destination());
    }

    #[test]
    fn summary_lists_all_parameters() {
        let summary = request("Tokyo").summary();
        assert_eq!(
            summary,
            "Searching for hotels in Tokyo from 2026-12-20 to 2026-12-22 for 2 guests in 1 room(s)"
        );
    }
}
