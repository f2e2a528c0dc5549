//! Booking-provider data sources and the concurrent aggregator.
//!
//! Each provider is an independent, latency-bearing collaborator
//! behind the [`HotelProvider`] trait. The aggregator fans a single
//! immutable `SearchRequest` out to every configured provider at once
//! and merges results only after all branches have settled, so no
//! locking is needed anywhere in the search path.

pub mod aggregate;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

use roomscout_core::{ProviderResults, SearchRequest};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("provider `{provider}` failed: {reason}")]
    Unavailable { provider: String, reason: String },
    #[error("provider `{provider}` timed out after {timeout_secs}s")]
    TimedOut { provider: String, timeout_secs: u64 },
}

/// One external booking data source.
#[async_trait]
pub trait HotelProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn search(&self, request: &SearchRequest) -> Result<ProviderResults, ProviderError>;
}
