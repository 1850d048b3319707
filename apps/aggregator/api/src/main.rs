use axum_helpers::{cors_layer_from_env, create_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_aggregator::{AggregatorService, HttpUpstreamClient, RegistryConfig, UpstreamTimeouts};
use eyre::WrapErr;
use std::sync::Arc;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    // An invalid registry is fatal: the service never starts half-configured
    let registry = RegistryConfig::from_file(&config.registry_path)
        .and_then(RegistryConfig::into_registry)
        .wrap_err_with(|| {
            format!(
                "Failed to load service registry from {}",
                config.registry_path.display()
            )
        })?;

    if registry.is_empty() {
        warn!("Service registry is empty; every lookup will answer 404");
    } else {
        info!(services = registry.len(), "Service registry loaded");
    }

    let upstream = HttpUpstreamClient::new(UpstreamTimeouts::default())?;
    let service =
        AggregatorService::with_fetch_limit(Arc::new(registry), upstream, config.max_concurrent_fetches);

    // create_router adds docs/middleware to our composed routes
    let router = create_router::<openapi::ApiDoc>(api::routes(service), cors_layer_from_env()?);

    // Merge the liveness endpoint into the app
    let app = router.merge(health_router(config.app));

    info!(
        "Starting {} v{} ({:?})",
        config.app.name, config.app.version, config.environment
    );

    create_app(app, &config.server)
        .await
        .wrap_err("Server error")?;

    info!("Aggregator shutdown complete");
    Ok(())
}
