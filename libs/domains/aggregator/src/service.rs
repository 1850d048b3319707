//! Aggregation Proxy - resolve, fetch, negotiate, relay.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, instrument, warn};

use crate::error::{AggregatorError, AggregatorResult};
use crate::models::{RelayedDocument, ServiceSummary};
use crate::negotiation::negotiate_content_type;
use crate::registry::ServiceResolver;
use crate::upstream::UpstreamClient;

/// Default ceiling on outbound fetches in flight at once.
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 64;

/// Relays backend API descriptions for registered services.
///
/// Cloning is cheap; clones share the registry, the upstream client and the
/// fetch permits.
pub struct AggregatorService<C: UpstreamClient> {
    registry: Arc<dyn ServiceResolver>,
    upstream: Arc<C>,
    fetch_permits: Arc<Semaphore>,
}

impl<C: UpstreamClient> AggregatorService<C> {
    pub fn new(registry: Arc<dyn ServiceResolver>, upstream: C) -> Self {
        Self::with_fetch_limit(registry, upstream, DEFAULT_MAX_CONCURRENT_FETCHES)
    }

    /// `max_concurrent_fetches` is clamped to at least 1.
    pub fn with_fetch_limit(
        registry: Arc<dyn ServiceResolver>,
        upstream: C,
        max_concurrent_fetches: usize,
    ) -> Self {
        Self {
            registry,
            upstream: Arc::new(upstream),
            fetch_permits: Arc::new(Semaphore::new(max_concurrent_fetches.max(1))),
        }
    }

    /// Fetches the API description of `service_id` and prepares it for relay.
    ///
    /// - unknown id: [`AggregatorError::UnknownService`], nothing is fetched
    /// - transport failure: [`AggregatorError::UpstreamUnavailable`] after a single attempt
    /// - otherwise the backend's status and body, with a negotiated content type
    #[instrument(skip(self))]
    pub async fn fetch_description(&self, service_id: &str) -> AggregatorResult<RelayedDocument> {
        let service = self
            .registry
            .find_by_id(service_id)
            .ok_or_else(|| AggregatorError::UnknownService(service_id.to_string()))?;

        // The semaphore is never closed, so acquire cannot fail.
        let _permit = self.fetch_permits.acquire().await.ok();

        debug!(url = %service.url, "Fetching API description");
        let response = self.upstream.get(&service.url).await.map_err(|source| {
            warn!(url = %service.url, error = %source, "Upstream fetch failed");
            AggregatorError::UpstreamUnavailable {
                url: service.url.clone(),
                source,
            }
        })?;

        let content_type = negotiate_content_type(response.content_type.as_ref());
        debug!(
            status = %response.status,
            declared = ?response.content_type,
            relayed = ?content_type,
            bytes = response.body.len(),
            "Relaying API description"
        );

        Ok(RelayedDocument {
            status: response.status,
            content_type,
            body: response.body,
        })
    }

    /// Registered services in configured order.
    pub fn list_services(&self) -> Vec<ServiceSummary> {
        self.registry
            .services()
            .iter()
            .map(ServiceSummary::from)
            .collect()
    }
}

impl<C: UpstreamClient> Clone for AggregatorService<C> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            upstream: Arc::clone(&self.upstream),
            fetch_permits: Arc::clone(&self.fetch_permits),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;
    use crate::models::{ServiceEntry, UpstreamResponse};
    use crate::registry::ServiceRegistry;
    use crate::upstream::MockUpstreamClient;
    use axum::body::Bytes;
    use axum::http::{HeaderValue, StatusCode};
    use mockall::predicate::function;
    use reqwest::Url;

    const BILLING_URL: &str = "http://billing.internal/openapi.json";

    fn registry() -> Arc<dyn ServiceResolver> {
        Arc::new(
            ServiceRegistry::try_from_entries(vec![
                ServiceEntry::new("billing", "Billing", BILLING_URL),
                ServiceEntry::new("users", "Users", "http://users.internal/v3/api-docs"),
            ])
            .unwrap(),
        )
    }

    fn upstream_response(
        status: StatusCode,
        content_type: Option<&'static str>,
        body: &'static str,
    ) -> UpstreamResponse {
        UpstreamResponse {
            status,
            content_type: content_type.map(HeaderValue::from_static),
            body: Bytes::from_static(body.as_bytes()),
        }
    }

    #[tokio::test]
    async fn test_unknown_service_never_calls_upstream() {
        let mut mock = MockUpstreamClient::new();
        mock.expect_get().never();

        let service = AggregatorService::new(registry(), mock);

        for id in ["unknown", "", "Billing"] {
            let err = service.fetch_description(id).await.unwrap_err();
            assert!(
                matches!(&err, AggregatorError::UnknownService(got) if got == id),
                "{err:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_json_document_relayed_unchanged() {
        let mut mock = MockUpstreamClient::new();
        mock.expect_get()
            .with(function(|url: &Url| url.as_str() == BILLING_URL))
            .times(1)
            .returning(|_| {
                Ok(upstream_response(
                    StatusCode::OK,
                    Some("application/json"),
                    r#"{"openapi":"3.0.0"}"#,
                ))
            });

        let service = AggregatorService::new(registry(), mock);
        let document = service.fetch_description("billing").await.unwrap();

        assert_eq!(document.status, StatusCode::OK);
        assert_eq!(document.content_type, "application/json");
        assert_eq!(document.body, r#"{"openapi":"3.0.0"}"#);
    }

    #[tokio::test]
    async fn test_plain_text_is_relabelled_as_json() {
        let mut mock = MockUpstreamClient::new();
        mock.expect_get()
            .times(1)
            .returning(|_| Ok(upstream_response(StatusCode::OK, Some("text/plain"), "{}")));

        let service = AggregatorService::new(registry(), mock);
        let document = service.fetch_description("billing").await.unwrap();

        assert_eq!(document.content_type, "application/json");
        assert_eq!(document.body, "{}");
    }

    #[tokio::test]
    async fn test_backend_error_status_is_relayed_not_retried() {
        let mut mock = MockUpstreamClient::new();
        mock.expect_get().times(1).returning(|_| {
            Ok(upstream_response(
                StatusCode::SERVICE_UNAVAILABLE,
                Some("application/problem+json"),
                r#"{"title":"maintenance"}"#,
            ))
        });

        let service = AggregatorService::new(registry(), mock);
        let document = service.fetch_description("billing").await.unwrap();

        assert_eq!(document.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(document.content_type, "application/problem+json");
    }

    #[tokio::test]
    async fn test_transport_failure_is_upstream_unavailable_after_one_attempt() {
        for failure in [
            TransportError::Timeout("operation timed out".into()),
            TransportError::Connect("connection refused".into()),
            TransportError::Protocol("invalid HTTP version".into()),
        ] {
            let mut mock = MockUpstreamClient::new();
            let returned = failure.clone();
            mock.expect_get()
                .times(1)
                .returning(move |_| Err(returned.clone()));

            let service = AggregatorService::new(registry(), mock);
            match service.fetch_description("billing").await {
                Err(AggregatorError::UpstreamUnavailable { url, source }) => {
                    assert_eq!(url.as_str(), BILLING_URL);
                    assert_eq!(source, failure);
                }
                other => panic!("expected UpstreamUnavailable, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_list_services_in_configured_order() {
        let service = AggregatorService::new(registry(), MockUpstreamClient::new());

        let listed = service.list_services();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, "billing");
        assert_eq!(listed[0].url, BILLING_URL);
        assert_eq!(listed[1].name, "Users");
    }

    #[test]
    fn test_fetch_limit_is_at_least_one() {
        let service =
            AggregatorService::with_fetch_limit(registry(), MockUpstreamClient::new(), 0);
        assert_eq!(service.fetch_permits.available_permits(), 1);
    }
}
