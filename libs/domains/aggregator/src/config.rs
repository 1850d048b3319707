//! Registry configuration file.
//!
//! ```yaml
//! aggregator:
//!   services:
//!     - id: billing
//!       name: Billing
//!       url: http://billing.internal/openapi.json
//! ```
//!
//! JSON is accepted too, being a subset of YAML.

use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::error::{AggregatorError, AggregatorResult};
use crate::models::ServiceEntry;
use crate::registry::ServiceRegistry;

/// Environment variable naming the registry configuration file.
pub const CONFIG_PATH_ENV: &str = "AGGREGATOR_CONFIG";

/// Used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config/aggregator.yaml";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    aggregator: RegistryConfig,
}

/// The `aggregator` section: an ordered list of service entries.
#[derive(Debug, Default, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
}

impl RegistryConfig {
    pub fn from_yaml_str(raw: &str) -> AggregatorResult<Self> {
        let file: ConfigFile = serde_yaml_ng::from_str(raw).map_err(|e| {
            AggregatorError::ConfigurationInvalid(format!("malformed configuration: {e}"))
        })?;
        Ok(file.aggregator)
    }

    pub fn from_file(path: impl AsRef<Path>) -> AggregatorResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            AggregatorError::ConfigurationInvalid(format!("cannot read {}: {e}", path.display()))
        })?;

        info!(path = %path.display(), "Loading aggregator configuration");
        Self::from_yaml_str(&raw)
    }

    /// Validates every entry; see [`ServiceRegistry::try_from_entries`].
    pub fn into_registry(self) -> AggregatorResult<ServiceRegistry> {
        ServiceRegistry::try_from_entries(self.services)
    }
}
