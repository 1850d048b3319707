use axum::Router;
use domain_aggregator::{AggregatorService, HttpUpstreamClient, handlers};

/// Creates the application routes.
///
/// Returns a stateless Router (the aggregator router has its state applied).
pub fn routes(service: AggregatorService<HttpUpstreamClient>) -> Router {
    Router::new().merge(handlers::router(service))
}
