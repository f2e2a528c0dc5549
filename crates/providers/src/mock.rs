//! Mock booking providers. In production these would be real
//! partner APIs; each one here returns a fixed pair of listings for
//! whatever destination is asked for, after an optional simulated
//! network delay.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use roomscout_core::{ProviderResults, RoomListing, SearchRequest};

use crate::{HotelProvider, ProviderError};

#[derive(Clone, Debug)]
pub struct BookingComProvider {
    latency: Duration,
}

#[derive(Clone, Debug)]
pub struct ExpediaProvider {
    latency: Duration,
}

#[derive(Clone, Debug)]
pub struct HotelsComProvider {
    latency: Duration,
}

impl BookingComProvider {
    pub fn new(simulate_latency: bool) -> Self {
        Self { latency: latency_of(simulate_latency, 1_000) }
    }
}

impl ExpediaProvider {
    pub fn new(simulate_latency: bool) -> Self {
        Self { latency: latency_of(simulate_latency, 1_200) }
    }
}

impl HotelsComProvider {
    pub fn new(simulate_latency: bool) -> Self {
        Self { latency: latency_of(simulate_latency, 800) }
    }
}

fn latency_of(simulate_latency: bool, millis: u64) -> Duration {
    if simulate_latency {
        Duration::from_millis(millis)
    } else {
        Duration::ZERO
    }
}

fn listing(
    id: &str,
    hotel_name: &str,
    room_type: &str,
    price: f64,
    description: &str,
    amenities: &[&str],
    provider: &str,
    rating: f64,
    location: &str,
) -> RoomListing {
    RoomListing {
        id: id.to_string(),
        hotel_name: hotel_name.to_string(),
        room_type: room_type.to_string(),
        price,
        currency: "USD".to_string(),
        description: description.to_string(),
        amenities: amenities.iter().map(|amenity| amenity.to_string()).collect(),
        provider: provider.to_string(),
        rating,
        location: location.to_string(),
        availability: true,
    }
}

#[async_trait]
impl HotelProvider for BookingComProvider {
    fn name(&self) -> &'static str {
        "Booking.com"
    }

    async fn search(&self, request: &SearchRequest) -> Result<ProviderResults, ProviderError> {
        sleep(self.latency).await;

        let listings = vec![
            listing(
                "booking-1",
                "Grand Plaza Hotel",
                "Standard Room",
                120.0,
                "Comfortable room with city view",
                &["Free WiFi", "Air Conditioning", "Mini Bar"],
                self.name(),
                4.2,
                &request.destination,
            ),
            listing(
                "booking-2",
                "Luxury Resort & Spa",
                "Deluxe Suite",
                280.0,
                "Luxurious suite with ocean view",
                &["Free WiFi", "Spa Access", "Ocean View", "Balcony"],
                self.name(),
                4.8,
                &request.destination,
            ),
        ];

        Ok(ProviderResults::new(self.name(), listings, request.clone()))
    }
}

#[async_trait]
impl HotelProvider for ExpediaProvider {
    fn name(&self) -> &'static str {
        "Expedia"
    }

    async fn search(&self, request: &SearchRequest) -> Result<ProviderResults, ProviderError> {
        sleep(self.latency).await;

        let listings = vec![
            listing(
                "expedia-1",
                "Business Inn",
                "Executive Room",
                95.0,
                "Modern room perfect for business travelers",
                &["Free WiFi", "Business Center", "Gym"],
                self.name(),
                4.0,
                &request.destination,
            ),
            listing(
                "expedia-2",
                "Boutique Hotel Downtown",
                "Premium Room",
                150.0,
                "Stylish room in the heart of downtown",
                &["Free WiFi", "Rooftop Bar", "Concierge"],
                self.name(),
                4.5,
                &request.destination,
            ),
        ];

        Ok(ProviderResults::new(self.name(), listings, request.clone()))
    }
}

#[async_trait]
impl HotelProvider for HotelsComProvider {
    fn name(&self) -> &'static str {
        "Hotels.com"
    }

    async fn search(&self, request: &SearchRequest) -> Result<ProviderResults, ProviderError> {
        sleep(self.latency).await;

        let listings = vec![
            listing(
                "hotels-1",
                "Budget Stay",
                "Economy Room",
                75.0,
                "Clean and affordable accommodation",
                &["Free WiFi", "Parking"],
                self.name(),
                3.8,
                &request.destination,
            ),
            listing(
                "hotels-2",
                "Family Resort",
                "Family Suite",
                200.0,
                "Spacious suite perfect for families",
                &["Free WiFi", "Pool", "Kids Club", "Restaurant"],
                self.name(),
                4.3,
                &request.destination,
            ),
        ];

        Ok(ProviderResults::new(self.name(), listings, request.clone()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use roomscout_core::SearchRequest;

    use super::{BookingComProvider, ExpediaProvider, HotelsComProvider};
    use crate::HotelProvider;

    fn request() -> SearchRequest {
        SearchRequest {
            destination: "Paris".to_string(),
            check_in: NaiveDate::from_ymd_opt(2026, 9, 4).expect("valid date"),
            check_out: NaiveDate::from_ymd_opt(2026, 9, 6).expect("valid date"),
            guests: 2,
            rooms: 1,
        }
    }

    #[tokio::test]
    async fn each_mock_returns_two_listings_for_the_destination() {
        let providers: Vec<Box<dyn HotelProvider>> = vec![
            Box::new(BookingComProvider::new(false)),
            Box::new(ExpediaProvider::new(false)),
            Box::new(HotelsComProvider::new(false)),
        ];

        for provider in providers {
            let results = provider.search(&request()).await.expect("mock search succeeds");
            assert_eq!(results.total_results, 2);
            assert_eq!(results.provider, provider.name());
            assert!(results.listings.iter().all(|listing| listing.location == "Paris"));
            assert_eq!(results.search_request, request());
        }
    }

    #[tokio::test]
    async fn cheapest_mock_listing_is_seventy_five() {
        let results = HotelsComProvider::new(false)
            .search(&request())
            .await
            .expect("mock search succeeds");
        assert_eq!(results.listings[0].price, 75.0);
    }
}
