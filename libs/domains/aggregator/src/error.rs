use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregatorError {
    /// The caller asked for a service id that is not in the registry.
    #[error("Unknown service '{0}'")]
    UnknownService(String),

    /// The backend could not be reached or did not complete the HTTP exchange.
    #[error("Failed to fetch OpenAPI definition from {url}")]
    UpstreamUnavailable {
        url: Url,
        #[source]
        source: TransportError,
    },

    /// A service entry failed validation at load time.
    #[error("Invalid aggregator configuration: {0}")]
    ConfigurationInvalid(String),
}

pub type AggregatorResult<T> = Result<T, AggregatorError>;

/// Transport-level failure talking to a backend.
///
/// A backend that answers with an HTTP error status is not a transport failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        let detail = error_chain(&err);
        // Connect timeouts report both flags; classify them as timeouts.
        if err.is_timeout() {
            TransportError::Timeout(detail)
        } else if err.is_connect() {
            TransportError::Connect(detail)
        } else {
            TransportError::Protocol(detail)
        }
    }
}

/// Flattens an error and its sources into "outer: inner: root".
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Convert AggregatorError to AppError for standardized error responses
impl From<AggregatorError> for AppError {
    fn from(err: AggregatorError) -> Self {
        match err {
            AggregatorError::UnknownService(_) => AppError::NotFound(err.to_string()),
            AggregatorError::UpstreamUnavailable { .. } => AppError::BadGateway(err.to_string()),
            AggregatorError::ConfigurationInvalid(_) => {
                AppError::InternalServerError(err.to_string())
            }
        }
    }
}

impl IntoResponse for AggregatorError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
