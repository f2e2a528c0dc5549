use serde::{Deserialize, Serialize};

use crate::domain::search::SearchRequest;

/// A single bookable room offer returned by one booking provider.
///
/// Created fresh per provider call and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomListing {
    pub id: String,
    pub hotel_name: String,
    pub room_type: String,
    pub price: f64,
    pub currency: String,
    pub description: String,
    pub amenities: Vec<String>,
    pub provider: String,
    pub rating: f64,
    pub location: String,
    pub availability: bool,
}

impl RoomListing {
    /// One-line rendering used when listing alternatives in prompts.
    pub fn compact_line(&self) -> String {
        format!(
            "- {} ({}): ${}/night - {} - {}/5",
            self.hotel_name, self.room_type, self.price, self.provider, self.rating
        )
    }
}

/// Everything one provider returned for a single search, together with
/// an echo of the request that produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderResults {
    pub provider: String,
    pub listings: Vec<RoomListing>,
    pub total_results: usize,
    pub search_request: SearchRequest,
}

impl ProviderResults {
    pub fn new(provider: impl Into<String>, listings: Vec<RoomListing>, request: SearchRequest) -> Self {
        let total_results = listings.len();
        Self { provider: provider.into(), listings, total_results, search_request: request }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{ProviderResults, RoomListing};
    use crate::domain::search::SearchRequest;

    fn listing() -> RoomListing {
        RoomListing {
            id: "test-1".to_string(),
            hotel_name: "Grand Plaza Hotel".to_string(),
            room_type: "Standard Room".to_string(),
            price: 120.0,
            currency: "USD".to_string(),
            description: "Comfortable room with city view".to_string(),
            amenities: vec!["Free WiFi".to_string()],
            provider: "Booking.com".to_string(),
            rating: 4.2,
            location: "Paris".to_string(),
            availability: true,
        }
    }

    #[test]
    fn compact_line_matches_prompt_format() {
        assert_eq!(
            listing().compact_line(),
            "- Grand Plaza Hotel (Standard Room): $120/night - Booking.com - 4.2/5"
        );
    }

    #[test]
    fn provider_results_count_listings() {
        let request = SearchRequest {
            destination: "Paris".to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 9, 4).expect("valid date"),
            check_out: NaiveDate::from_ymd_opt(2026, 9, 6).expect("valid date"),
            guests: 1,
            rooms: 1,
        };
        let results = ProviderResults::new("Booking.com", vec![listing(), listing()], request);
        assert_eq!(results.total_results, 2);
        assert_eq!(results.provider, "Booking.com");
    }
}
