//! Aggregator Domain
//!
//! Relays the OpenAPI/Swagger documents of a fixed set of backend services.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← GET /aggregated, GET /aggregated/{service_id}
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← resolve → fetch → negotiate content type → relay
//! └──┬───────┬──┘
//!    │       │
//! ┌──▼────┐ ┌▼─────────┐
//! │Registry│ │ Upstream │  ← ServiceResolver / UpstreamClient traits
//! └───────┘ └──────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_aggregator::{
//!     AggregatorService, HttpUpstreamClient, RegistryConfig, UpstreamTimeouts, handlers,
//! };
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = RegistryConfig::from_file("config/aggregator.yaml")?.into_registry()?;
//! let upstream = HttpUpstreamClient::new(UpstreamTimeouts::default())?;
//! let service = AggregatorService::new(Arc::new(registry), upstream);
//!
//! let router = handlers::router(service);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod negotiation;
pub mod registry;
pub mod service;
pub mod upstream;

// Re-export commonly used types
pub use config::RegistryConfig;
pub use error::{AggregatorError, AggregatorResult, TransportError};
pub use handlers::ApiDoc;
pub use models::{RelayedDocument, ServiceDefinition, ServiceEntry, ServiceSummary, UpstreamResponse};
pub use negotiation::negotiate_content_type;
pub use registry::{ServiceRegistry, ServiceResolver};
pub use service::AggregatorService;
pub use upstream::{HttpUpstreamClient, UpstreamClient, UpstreamTimeouts};
