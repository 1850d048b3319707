use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Swagger Aggregator API",
        version = "0.1.0",
        description = "Relays the OpenAPI/Swagger documents of registered backend services"
    )
)]
struct AppDoc;

/// Application API documentation: app metadata plus the aggregator endpoints.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        let mut doc = AppDoc::openapi();
        doc.merge(domain_aggregator::ApiDoc::openapi());
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregator_paths_are_documented() {
        let doc = ApiDoc::openapi();

        assert_eq!(doc.info.title, "Swagger Aggregator API");
        assert!(doc.paths.paths.contains_key("/aggregated"));
        assert!(doc.paths.paths.contains_key("/aggregated/{service_id}"));
    }
}
