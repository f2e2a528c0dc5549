use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use roomscout_agent::{build_client, HotelSearchWorkflow, LlmClient, LlmError};
use roomscout_catalog::{CatalogError, HotelCatalog};
use roomscout_core::config::{AppConfig, ConfigError, LoadOptions, SearchConfig};
use roomscout_providers::aggregate::ProviderSet;
use roomscout_providers::mock::{BookingComProvider, ExpediaProvider, HotelsComProvider};

pub struct Application {
    pub config: AppConfig,
    pub workflow: Arc<HotelSearchWorkflow>,
    pub catalog: Arc<HotelCatalog>,
    pub llm: Arc<dyn LlmClient>,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("llm client setup failed: {0}")]
    Llm(#[from] LlmError),
    #[error("catalog load failed: {0}")]
    Catalog(#[from] CatalogError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

/// Wires the LLM client, the provider set, and the room catalog into
/// a ready application. Fails fast on unusable configuration so a
/// broken deployment never starts accepting traffic.
pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let llm = build_client(&config.llm)?;
    let workflow =
        Arc::new(HotelSearchWorkflow::new(Arc::clone(&llm), provider_set(&config.search)));
    let catalog = Arc::new(HotelCatalog::load(&config.catalog)?);

    info!(
        event_name = "system.bootstrap.ready",
        correlation_id = "bootstrap",
        providers = workflow.provider_count(),
        vectors = catalog.len(),
        "application bootstrap complete"
    );

    Ok(Application { config, workflow, catalog, llm })
}

fn provider_set(config: &SearchConfig) -> ProviderSet {
    ProviderSet::new(
        vec![
            Arc::new(BookingComProvider::new(config.simulate_latency)),
            Arc::new(ExpediaProvider::new(config.simulate_latency)),
            Arc::new(HotelsComProvider::new(config.simulate_latency)),
        ],
        Duration::from_secs(config.provider_timeout_secs),
    )
}

#[cfg(test)]
mod tests {
    use roomscout_core::config::{AppConfig, CatalogConfig};

    use super::bootstrap_with_config;

    #[test]
    fn bootstrap_fails_fast_when_the_dataset_is_missing() {
        let config = AppConfig {
            catalog: CatalogConfig {
                dataset_path: "/nonexistent/hotel-rooms.csv".into(),
                embeddings_path: "/nonexistent/hotel-embeddings.json".into(),
            },
            ..AppConfig::default()
        };

        let result = bootstrap_with_config(config);
        assert!(matches!(result, Err(super::BootstrapError::Catalog(_))));
    }
}
