//! Concurrent fan-out across all configured providers.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::warn;

use roomscout_core::{AggregationError, ProviderResults, SearchRequest};

use crate::{HotelProvider, ProviderError};

const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 10;

/// The fixed set of data sources one search fans out to.
pub struct ProviderSet {
    providers: Vec<Arc<dyn HotelProvider>>,
    provider_timeout: Duration,
}

impl ProviderSet {
    pub fn new(providers: Vec<Arc<dyn HotelProvider>>, provider_timeout: Duration) -> Self {
        Self { providers, provider_timeout }
    }

    /// The three mock booking providers in their production order.
    pub fn with_default_mocks(simulate_latency: bool) -> Self {
        Self::new(
            vec![
                Arc::new(crate::mock::BookingComProvider::new(simulate_latency)),
                Arc::new(crate::mock::ExpediaProvider::new(simulate_latency)),
                Arc::new(crate::mock::HotelsComProvider::new(simulate_latency)),
            ],
            Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        )
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Queries every provider concurrently with its own copy of the
    /// request and merges the results in invocation order.
    ///
    /// Aggregation is strict all-or-nothing: a single provider failure
    /// (or timeout) fails the whole search. Individual failures are
    /// logged before the aggregate error is returned.
    pub async fn search_all(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<ProviderResults>, AggregationError> {
        if !request.has_destination() {
            return Err(AggregationError::MissingQuery);
        }

        let mut tasks = JoinSet::new();
        for (index, provider) in self.providers.iter().enumerate() {
            let provider = Arc::clone(provider);
            let request = request.clone();
            let timeout = self.provider_timeout;
            tasks.spawn(async move {
                let outcome = tokio::time::timeout(timeout, provider.search(&request))
                    .await
                    .unwrap_or_else(|_| {
                        Err(ProviderError::TimedOut {
                            provider: provider.name().to_string(),
                            timeout_secs: timeout.as_secs(),
                        })
                    });
                (index, outcome)
            });
        }

        // Synchronization barrier: results merge only after every
        // branch has settled.
        let mut slots: Vec<Option<ProviderResults>> = vec![None; self.providers.len()];
        let mut failed = false;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(results))) => {
                    slots[index] = Some(results);
                }
                Ok((_, Err(error))) => {
                    warn!(error = %error, "provider search failed");
                    failed = true;
                }
                Err(join_error) => {
                    warn!(error = %join_error, "provider task aborted");
                    failed = true;
                }
            }
        }

        if failed {
            return Err(AggregationError::ProvidersFailed);
        }

        Ok(slots.into_iter().flatten().collect())
    }
}
