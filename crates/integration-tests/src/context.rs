//! Shared state handed to every scenario.

use storeprobe_client::{ApiClient, ApiError, ConfigError, GapPolicy, HarnessConfig};
use thiserror::Error;

use crate::scenario::ScenarioRunner;

/// Errors raised while building a [`TestContext`].
#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Configuration plus an anonymous client sharing one connection pool.
///
/// Scenarios derive credentialed clients from [`TestContext::client`] with
/// [`ApiClient::with_credential`] or the login helpers.
#[derive(Debug, Clone)]
pub struct TestContext {
    pub config: HarnessConfig,
    pub client: ApiClient,
}

impl TestContext {
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(config: HarnessConfig) -> Result<Self, ContextError> {
        let client = ApiClient::new(&config)?;
        Ok(Self { config, client })
    }

    /// Load configuration from the environment (and `.env`), then install
    /// tracing at the configured level.
    ///
    /// # Errors
    ///
    /// Returns error if `MAGENTO_BASE_URL` is missing or any variable is invalid.
    pub fn from_env() -> Result<Self, ContextError> {
        let config = HarnessConfig::from_env()?;
        crate::init_tracing_for(&config.run);
        Self::new(config)
    }

    /// A client holding an admin token.
    ///
    /// # Errors
    ///
    /// Returns error if the admin credentials are rejected.
    pub async fn admin(&self) -> Result<ApiClient, ApiError> {
        self.client.admin_login(&self.config.platform).await
    }

    /// Wait for the platform's indexers to pick up recent catalog writes.
    pub async fn settle(&self) {
        let delay = self.config.run.indexing_delay;
        if !delay.is_zero() {
            tracing::debug!(delay_ms = delay.as_millis(), "waiting for indexers");
            tokio::time::sleep(delay).await;
        }
    }

    #[must_use]
    pub const fn cleanup_enabled(&self) -> bool {
        self.config.run.cleanup_test_data
    }

    #[must_use]
    pub const fn gap_policy(&self) -> GapPolicy {
        self.config.run.gap_policy
    }

    /// A runner for scenario `name` with the configured gap policy.
    #[must_use]
    pub fn runner(&self, name: &'static str, plan: &[&'static str]) -> ScenarioRunner {
        ScenarioRunner::new(name, self.gap_policy(), plan)
    }
}
