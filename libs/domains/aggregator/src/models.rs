use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

/// A validated backend whose API description the proxy relays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDefinition {
    /// Routing key, matched exactly
    pub id: String,
    /// Display label
    pub name: String,
    /// Absolute location of the backend's API description document
    pub url: Url,
}

/// A service entry as written in the configuration file, before validation.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ServiceEntry {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub id: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,

    #[serde(default)]
    #[validate(custom(function = "absolute_http_url"))]
    pub url: String,
}

impl ServiceEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: url.into(),
        }
    }

    /// Validates the entry and converts it into a [`ServiceDefinition`].
    ///
    /// The error is a human-readable description of every invalid field.
    pub fn into_definition(self) -> Result<ServiceDefinition, String> {
        self.validate().map_err(|errors| describe(&errors))?;

        let url = Url::parse(&self.url).map_err(|e| format!("url: {e}"))?;
        Ok(ServiceDefinition {
            id: self.id,
            name: self.name,
            url,
        })
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }
    Ok(())
}

fn absolute_http_url(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed("must not be blank")));
    }

    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        Ok(url) => Err(ValidationError::new("scheme").with_message(Cow::Owned(format!(
            "must be an absolute http(s) URL, got scheme '{}'",
            url.scheme()
        )))),
        Err(e) => Err(ValidationError::new("url")
            .with_message(Cow::Owned(format!("is not a valid absolute URL ({e})")))),
    }
}

/// Renders validation errors as "field: message; field: message", sorted by field.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_deref()
                    .map(str::to_string)
                    .unwrap_or_else(|| e.code.to_string());
                format!("{field}: {message}")
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

/// Public view of a registered service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ServiceSummary {
    /// Routing key used in `/aggregated/{service_id}`
    #[schema(example = "billing")]
    pub id: String,
    /// Display name
    #[schema(example = "Billing")]
    pub name: String,
    /// Backend document location
    #[schema(example = "http://billing.internal/openapi.json")]
    pub url: String,
}

impl From<&ServiceDefinition> for ServiceSummary {
    fn from(service: &ServiceDefinition) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            url: service.url.to_string(),
        }
    }
}

/// What a single upstream GET produced.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// A backend document ready to be relayed to the caller.
#[derive(Debug, Clone)]
pub struct RelayedDocument {
    pub status: StatusCode,
    pub content_type: HeaderValue,
    pub body: Bytes,
}

impl IntoResponse for RelayedDocument {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, self.content_type)],
            self.body,
        )
            .into_response()
    }
}
