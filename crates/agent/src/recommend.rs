//! Recommendation selection: deterministic cheapest-listing pick plus
//! an LLM-written justification.

use thiserror::Error;

use roomscout_core::{ProviderResults, RoomListing, SelectionError};

use crate::llm::{LlmClient, LlmError};

#[derive(Debug, Error)]
pub enum RecommendError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Flattens all listings preserving source order and returns the one
/// with the strictly lowest price. Replacement happens only on a
/// strict less-than comparison, so the first listing encountered wins
/// ties regardless of how many providers share the minimum.
pub fn pick_cheapest(results: &[ProviderResults]) -> Result<&RoomListing, SelectionError> {
    if results.is_empty() {
        return Err(SelectionError::NoResults);
    }

    let mut cheapest: Option<&RoomListing> = None;
    for result in results {
        for candidate in &result.listings {
            match cheapest {
                Some(current) if candidate.price < current.price => cheapest = Some(candidate),
                Some(_) => {}
                None => cheapest = Some(candidate),
            }
        }
    }

    cheapest.ok_or(SelectionError::NoListings)
}

#[derive(Clone, Debug, Default)]
pub struct RecommendationSelector;

impl RecommendationSelector {
    pub fn new() -> Self {
        Self
    }

    /// Returns the cheapest listing together with the collaborator's
    /// prose, verbatim, as the turn's analysis.
    pub async fn recommend(
        &self,
        llm: &dyn LlmClient,
        results: &[ProviderResults],
    ) -> Result<(RoomListing, String), RecommendError> {
        let cheapest = pick_cheapest(results)?.clone();

        let user_prompt = build_user_prompt(&cheapest, results);
        let prose = llm.complete(SYSTEM_PROMPT, &user_prompt).await?;

        Ok((cheapest, prose))
    }
}

const SYSTEM_PROMPT: &str = "You are a hotel recommendation expert. Analyze the hotel search results and provide a comprehensive recommendation focusing on the cheapest option.\n\n\
    Include:\n\
    1. Summary of the cheapest option with key details\n\
    2. Brief comparison with other options\n\
    3. Value proposition and what makes this a good choice\n\
    4. Any important considerations for the traveler\n\n\
    Be concise but informative.";

fn build_user_prompt(cheapest: &RoomListing, results: &[ProviderResults]) -> String {
    let alternatives = results
        .iter()
        .flat_map(|result| result.listings.iter())
        .map(RoomListing::compact_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Here are the hotel search results:\n\n\
         Cheapest Option:\n\
         - Hotel: {}\n\
         - Room: {}\n\
         - Price: ${} per night\n\
         - Provider: {}\n\
         - Rating: {}/5\n\
         - Amenities: {}\n\n\
         All Available Options:\n\
         {}\n\n\
         Provide your analysis and recommendation.",
        cheapest.hotel_name,
        cheapest.room_type,
        cheapest.price,
        cheapest.provider,
        cheapest.rating,
        cheapest.amenities.join(", "),
        alternatives
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use roomscout_core::{ProviderResults, RoomListing, SearchRequest, SelectionError};

    use super::{build_user_prompt, pick_cheapest};

    fn request() -> SearchRequest {
        SearchRequest {
            destination: "Paris".to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 9, 4).expect("valid date"),
            check_out: NaiveDate::from_ymd_opt(2026, 9, 6).expect("valid date"),
            guests: 1,
            rooms: 1,
        }
    }

    fn listing(id: &str, price: f64) -> RoomListing {
        RoomListing {
            id: id.to_string(),
            hotel_name: format!("Hotel {id}"),
            room_type: "Standard Room".to_string(),
            price,
            currency: "USD".to_string(),
            description: "A room".to_string(),
            amenities: vec!["Free WiFi".to_string()],
            provider: "Test".to_string(),
            rating: 4.0,
            location: "Paris".to_string(),
            availability: true,
        }
    }

    fn results(groups: &[&[(&str, f64)]]) -> Vec<ProviderResults> {
        groups
            .iter()
            .enumerate()
            .map(|(index, listings)| {
                ProviderResults::new(
                    format!("provider-{index}"),
                    listings.iter().map(|(id, price)| listing(id, *price)).collect(),
                    request(),
                )
            })
            .collect()
    }

    #[test]
    fn lowest_price_wins_regardless_of_position() {
        let results = results(&[
            &[("a", 120.0), ("b", 280.0)],
            &[("c", 95.0), ("d", 150.0)],
            &[("e", 75.0), ("f", 200.0)],
        ]);

        let cheapest = pick_cheapest(&results).expect("cheapest listing exists");
        assert_eq!(cheapest.id, "e");
        assert_eq!(cheapest.price, 75.0);
    }

    #[test]
    fn first_listing_in_flattened_order_wins_ties() {
        let results = results(&[&[("a", 90.0), ("b", 50.0)], &[("c", 50.0)]]);
        let cheapest = pick_cheapest(&results).expect("cheapest listing exists");
        assert_eq!(cheapest.id, "b");
    }

    #[test]
    fn empty_result_set_and_empty_listings_report_distinct_errors() {
        assert_eq!(pick_cheapest(&[]), Err(SelectionError::NoResults));

        let empty = results(&[&[], &[]]);
        assert_eq!(pick_cheapest(&empty), Err(SelectionError::NoListings));
    }

    #[test]
    fn prompt_lists_cheapest_details_and_all_alternatives() {
        let results = results(&[&[("a", 120.0)], &[("b", 75.0)]]);
        let cheapest = pick_cheapest(&results).expect("cheapest listing exists");
        let prompt = build_user_prompt(cheapest, &results);

        assert!(prompt.contains("- Hotel: Hotel b"));
        assert!(prompt.contains("- Price: $75 per night"));
        assert!(prompt.contains("- Hotel a (Standard Room): $120/night - Test - 4/5"));
        assert!(prompt.ends_with("Provide your analysis and recommendation."));
    }
}
