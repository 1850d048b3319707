use core_config::{AppInfo, FromEnv, app_info, env_or_default, env_parse_or, server::ServerConfig};
use domain_aggregator::config::{CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use domain_aggregator::service::DEFAULT_MAX_CONCURRENT_FETCHES;
use std::path::PathBuf;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Caps how many backend fetches may be in flight at once.
pub const MAX_CONCURRENT_FETCHES_ENV: &str = "AGGREGATOR_MAX_CONCURRENT_FETCHES";

/// Application-specific configuration
/// Composes shared config components from the `core_config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    /// YAML file holding the service registry
    pub registry_path: PathBuf,
    pub max_concurrent_fetches: usize,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let registry_path = PathBuf::from(env_or_default(CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH));
        let max_concurrent_fetches =
            env_parse_or(MAX_CONCURRENT_FETCHES_ENV, DEFAULT_MAX_CONCURRENT_FETCHES)?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            registry_path,
            max_concurrent_fetches,
        })
    }
}
