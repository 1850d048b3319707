use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use axum_helpers::errors::responses::{BadGatewayResponse, NotFoundResponse};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::AggregatorResult;
use crate::models::{RelayedDocument, ServiceSummary};
use crate::service::AggregatorService;
use crate::upstream::UpstreamClient;

/// OpenAPI documentation for the aggregation endpoints
#[derive(OpenApi)]
#[openapi(
    paths(list_services, fetch_description),
    components(
        schemas(ServiceSummary),
        responses(NotFoundResponse, BadGatewayResponse)
    ),
    tags(
        (name = "Aggregator", description = "Relays backend OpenAPI/Swagger documents")
    )
)]
pub struct ApiDoc;

/// Create the aggregator router
pub fn router<C: UpstreamClient + 'static>(service: AggregatorService<C>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/aggregated", get(list_services::<C>))
        .route("/aggregated/", get(fetch_empty_id::<C>))
        .route("/aggregated/{service_id}", get(fetch_description::<C>))
        .with_state(shared_service)
}

/// List the registered services
#[utoipa::path(
    get,
    path = "/aggregated",
    tag = "Aggregator",
    responses(
        (status = 200, description = "Registered services in configured order", body = Vec<ServiceSummary>)
    )
)]
async fn list_services<C: UpstreamClient>(
    State(service): State<Arc<AggregatorService<C>>>,
) -> Json<Vec<ServiceSummary>> {
    Json(service.list_services())
}

/// Fetch a service's API description
///
/// The backend's status and body are relayed unchanged. The content type is kept
/// when it is JSON, problem+JSON or YAML and is `application/json` otherwise.
#[utoipa::path(
    get,
    path = "/aggregated/{service_id}",
    tag = "Aggregator",
    params(
        ("service_id" = String, Path, description = "Registered service id (case-sensitive)")
    ),
    responses(
        (status = 200, description = "Backend document (any backend status is relayed as-is)", body = String, content_type = "application/json"),
        (status = 404, response = NotFoundResponse),
        (status = 502, response = BadGatewayResponse)
    )
)]
async fn fetch_description<C: UpstreamClient>(
    State(service): State<Arc<AggregatorService<C>>>,
    Path(service_id): Path<String>,
) -> AggregatorResult<RelayedDocument> {
    service.fetch_description(&service_id).await
}

/// `/aggregated/` carries an empty id, which is never registered.
async fn fetch_empty_id<C: UpstreamClient>(
    State(service): State<Arc<AggregatorService<C>>>,
) -> AggregatorResult<RelayedDocument> {
    service.fetch_description("").await
}
