//! Reusable OpenAPI response types for consistent API documentation.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Resource not found",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Unknown service 'inventory'"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Bad Gateway - upstream unreachable",
    content_type = "application/json",
    example = json!({
        "code": 1012,
        "error": "BAD_GATEWAY",
        "message": "Failed to fetch OpenAPI definition from http://billing.internal/openapi.json"
    })
)]
pub struct BadGatewayResponse(pub ErrorResponse);
