//! Retrieval endpoints over the room catalog.
//!
//! `POST /api/rag-search` runs a free-text similarity query; `GET
//! /api/rag-search` runs an attribute search, optionally seeded by a
//! free-text query. Both return the matched vectors plus LLM prose
//! about them.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use roomscout_agent::{LlmClient, LlmError};
use roomscout_catalog::{HotelCatalog, HotelVector, SearchCriteria};

const SIMPLE_QUERY_LIMIT: usize = 5;
const ADVANCED_QUERY_LIMIT: usize = 10;
const ANALYST_ROLE: &str = "You are a hotel recommendation expert.";

#[derive(Clone)]
pub struct RagState {
    pub catalog: Arc<HotelCatalog>,
    pub llm: Arc<dyn LlmClient>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RagRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagParams {
    pub q: Option<String>,
    pub location: Option<String>,
    pub max_price: Option<f64>,
    pub min_rating: Option<f64>,
    /// Comma-separated list.
    pub amenities: Option<String>,
    pub room_type: Option<String>,
}

pub fn router(catalog: Arc<HotelCatalog>, llm: Arc<dyn LlmClient>) -> Router {
    Router::new()
        .route("/api/rag-search", post(rag_search).get(advanced_search))
        .with_state(RagState { catalog, llm })
}

pub async fn rag_search(State(state): State<RagState>, Json(request): Json<RagRequest>) -> Response {
    let Some(query) = request.query.filter(|query| !query.trim().is_empty()) else {
        return (StatusCode::BAD_REQUEST, Json(json!({ "error": "Query or criteria is required" })))
            .into_response();
    };

    let correlation_id = Uuid::new_v4();
    let results = state.catalog.search(&query, SIMPLE_QUERY_LIMIT);
    info!(
        event_name = "api.rag.query",
        correlation_id = %correlation_id,
        results = results.len(),
        "similarity search complete"
    );

    match simple_analysis(state.llm.as_ref(), &query, &results).await {
        Ok(analysis) => Json(json!({
            "success": true,
            "data": {
                "query": query,
                "results": results,
                "analysis": analysis,
            },
        }))
        .into_response(),
        Err(error) => search_failure(correlation_id, error),
    }
}

pub async fn advanced_search(
    State(state): State<RagState>,
    Query(params): Query<RagParams>,
) -> Response {
    let criteria = SearchCriteria {
        location: params.location.clone(),
        max_price: params.max_price,
        min_rating: params.min_rating,
        amenities: params
            .amenities
            .as_deref()
            .map(|raw| raw.split(',').map(str::to_string).collect())
            .unwrap_or_default(),
        room_type: params.room_type.clone(),
    };

    if params.q.is_none() && criteria.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "At least one search parameter is required" })),
        )
            .into_response();
    }

    let correlation_id = Uuid::new_v4();

    // A free-text query seeds the candidate set via similarity search;
    // attribute criteria then narrow it.
    let results: Vec<&HotelVector> = match &params.q {
        Some(query) => {
            let seeded = state.catalog.search(query, ADVANCED_QUERY_LIMIT);
            filter_vectors(seeded, &criteria)
        }
        None => state.catalog.search_by_criteria(&criteria),
    };
    info!(
        event_name = "api.rag.advanced_query",
        correlation_id = %correlation_id,
        results = results.len(),
        "criteria search complete"
    );

    let criteria_json = criteria_json(&params);
    match advanced_analysis(state.llm.as_ref(), &criteria_json, &results).await {
        Ok(analysis) => Json(json!({
            "success": true,
            "data": {
                "criteria": criteria_json,
                "results": results,
                "analysis": analysis,
            },
        }))
        .into_response(),
        Err(error) => search_failure(correlation_id, error),
    }
}

fn search_failure(correlation_id: Uuid, error: LlmError) -> Response {
    warn!(
        event_name = "api.rag.failed",
        correlation_id = %correlation_id,
        error = %error,
        "search analysis failed"
    );
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Failed to process search request" })),
    )
        .into_response()
}

fn filter_vectors<'a>(
    vectors: Vec<&'a HotelVector>,
    criteria: &SearchCriteria,
) -> Vec<&'a HotelVector> {
    vectors.into_iter().filter(|vector| criteria.matches(&vector.listing)).collect()
}

fn criteria_json(params: &RagParams) -> Value {
    let mut criteria = Map::new();
    if let Some(q) = &params.q {
        criteria.insert("query".to_string(), json!(q));
    }
    if let Some(location) = &params.location {
        criteria.insert("location".to_string(), json!(location));
    }
    if let Some(max_price) = params.max_price {
        criteria.insert("maxPrice".to_string(), json!(max_price));
    }
    if let Some(min_rating) = params.min_rating {
        criteria.insert("minRating".to_string(), json!(min_rating));
    }
    if let Some(amenities) = &params.amenities {
        criteria
            .insert("amenities".to_string(), json!(amenities.split(',').collect::<Vec<_>>()));
    }
    if let Some(room_type) = &params.room_type {
        criteria.insert("roomType".to_string(), json!(room_type));
    }
    Value::Object(criteria)
}

fn describe(results: &[&HotelVector]) -> String {
    results
        .iter()
        .enumerate()
        .map(|(index, vector)| {
            let listing = &vector.listing;
            format!(
                "{}. {} - {}\n   Price: ${} {}\n   Location: {}\n   Rating: {}/5\n   Provider: {}\n   Amenities: {}\n   Description: {}",
                index + 1,
                listing.hotel_name,
                listing.room_type,
                listing.price,
                listing.currency,
                listing.location,
                listing.rating,
                listing.provider,
                listing.amenities.join(", "),
                listing.description,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

async fn simple_analysis(
    llm: &dyn LlmClient,
    query: &str,
    results: &[&HotelVector],
) -> Result<String, LlmError> {
    let prompt = format!(
        "Analyze the search results and provide a helpful response to the user's query.\n\n\
         User Query: \"{query}\"\n\n\
         Available Hotels:\n{}\n\n\
         Provide a helpful analysis that:\n\
         1. Addresses the user's specific query\n\
         2. Highlights the best options based on their needs\n\
         3. Mentions key features like price, location, amenities\n\
         4. Gives a clear recommendation if appropriate\n\n\
         Keep the response conversational and helpful.",
        describe(results)
    );
    llm.complete(ANALYST_ROLE, &prompt).await
}

async fn advanced_analysis(
    llm: &dyn LlmClient,
    criteria: &Value,
    results: &[&HotelVector],
) -> Result<String, LlmError> {
    let criteria_pretty =
        serde_json::to_string_pretty(criteria).unwrap_or_else(|_| criteria.to_string());
    let prompt = format!(
        "Analyze these hotel search results based on the following criteria:\n\n\
         Search Criteria: {criteria_pretty}\n\n\
         Found Hotels ({}):\n{}\n\n\
         Provide a comprehensive analysis that:\n\
         1. Summarizes the search results\n\
         2. Highlights the best options based on the criteria\n\
         3. Provides price range and value analysis\n\
         4. Mentions any notable features or considerations\n\
         5. Gives clear recommendations if appropriate",
        results.len(),
        describe(results)
    );
    llm.complete(ANALYST_ROLE, &prompt).await
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::extract::{Query, State};
    use axum::http::StatusCode;
    use axum::Json;
    use serde_json::Value;

    use roomscout_agent::{LlmClient, LlmError};
    use roomscout_catalog::HotelCatalog;
    use roomscout_core::RoomListing;

    use super::{advanced_search, rag_search, RagParams, RagRequest, RagState};

    struct StaticLlm(&'static str);

    #[async_trait]
    impl LlmClient for StaticLlm {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenLlm;

    #[async_trait]
    impl LlmClient for BrokenLlm {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            Err(LlmError::Request("connection refused".to_string()))
        }
    }

    fn listing(id: &str, hotel: &str, price: f64, rating: f64, location: &str) -> RoomListing {
        RoomListing {
            id: id.to_string(),
            hotel_name: hotel.to_string(),
            room_type: "Standard Room".to_string(),
            price,
            currency: "USD".to_string(),
            description: "A comfortable room".to_string(),
            amenities: vec!["Free WiFi".to_string()],
            provider: "Booking.com".to_string(),
            rating,
            location: location.to_string(),
            availability: true,
        }
    }

    fn state(llm: Arc<dyn LlmClient>) -> RagState {
        let catalog = HotelCatalog::from_listings(vec![
            listing("a", "Grand Plaza", 120.0, 4.5, "Paris"),
            listing("b", "Budget Stay", 75.0, 3.8, "Paris"),
            listing("c", "Luxury Resort", 280.0, 4.8, "Tokyo"),
        ]);
        RagState { catalog: Arc::new(catalog), llm }
    }

    async fn body_of(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn post_without_a_query_is_rejected() {
        let response =
            rag_search(State(state(Arc::new(StaticLlm("unused")))), Json(RagRequest::default()))
                .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn post_returns_ranked_results_and_analysis() {
        let response = rag_search(
            State(state(Arc::new(StaticLlm("Budget Stay fits a tight budget.")))),
            Json(RagRequest { query: Some("cheap hotel in paris".to_string()) }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["query"], "cheap hotel in paris");
        assert_eq!(body["data"]["results"].as_array().expect("results").len(), 3);
        assert_eq!(body["data"]["analysis"], "Budget Stay fits a tight budget.");
    }

    #[tokio::test]
    async fn get_without_parameters_is_rejected() {
        let response = advanced_search(
            State(state(Arc::new(StaticLlm("unused")))),
            Query(RagParams::default()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_filters_by_criteria() {
        let response = advanced_search(
            State(state(Arc::new(StaticLlm("Two rooms in Paris fit the budget.")))),
            Query(RagParams {
                location: Some("paris".to_string()),
                max_price: Some(150.0),
                ..RagParams::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        let results = body["data"]["results"].as_array().expect("results");
        assert_eq!(results.len(), 2);
        assert_eq!(body["data"]["criteria"]["location"], "paris");
        assert_eq!(body["data"]["criteria"]["maxPrice"], 150.0);
    }

    #[tokio::test]
    async fn get_with_a_query_narrows_the_seeded_results_by_criteria() {
        let response = advanced_search(
            State(state(Arc::new(StaticLlm("Only the Tokyo resort remains.")))),
            Query(RagParams {
                q: Some("resort".to_string()),
                location: Some("tokyo".to_string()),
                min_rating: Some(4.6),
                ..RagParams::default()
            }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_of(response).await;
        let results = body["data"]["results"].as_array().expect("results");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["hotelName"], "Luxury Resort");
    }

    #[tokio::test]
    async fn llm_failure_maps_to_an_opaque_500() {
        let response = rag_search(
            State(state(Arc::new(BrokenLlm))),
            Json(RagRequest { query: Some("anything".to_string()) }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body["error"], "Failed to process search request");
    }
}
