//! Type-safe error codes for API responses.
//!
//! Each error code carries:
//! - a string identifier for clients (e.g. "BAD_GATEWAY")
//! - an integer code for logs and monitoring (e.g. 1012)
//! - a default human-readable message
//!
//! # Example
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::BadGateway;
//! assert_eq!(code.as_str(), "BAD_GATEWAY");
//! assert_eq!(code.code(), 1012);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Requested resource was not found
    NotFound,

    /// HTTP method is not supported by the route
    MethodNotAllowed,

    // Server errors (1000s)
    /// An unexpected internal server error occurred
    InternalError,

    /// An upstream server could not be reached or answered with garbage
    BadGateway,
}

impl ErrorCode {
    /// SCREAMING_SNAKE_CASE identifier for programmatic handling by clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::BadGateway => "BAD_GATEWAY",
        }
    }

    /// Integer code used in structured logs (1000-1999).
    pub fn code(&self) -> i32 {
        match self {
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::BadGateway => 1012,
            Self::MethodNotAllowed => 1014,
        }
    }

    /// Default user-facing message; handlers usually supply a more specific one.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::NotFound => "Resource not found",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::InternalError => "An internal server error occurred",
            Self::BadGateway => "Upstream service could not be reached",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
