//! Service Registry - the configured backends, looked up by id.

use tracing::debug;

use crate::error::{AggregatorError, AggregatorResult};
use crate::models::{ServiceDefinition, ServiceEntry};

/// Read-only lookup of service definitions by id.
pub trait ServiceResolver: Send + Sync {
    /// First service whose id equals `id` exactly, if any.
    fn find_by_id(&self, id: &str) -> Option<&ServiceDefinition>;

    /// All services in configured order.
    fn services(&self) -> &[ServiceDefinition];
}

/// Ordered, immutable collection of validated service definitions.
#[derive(Debug, Clone, Default)]
pub struct ServiceRegistry {
    services: Vec<ServiceDefinition>,
}

impl ServiceRegistry {
    /// Validates every entry and builds the registry.
    ///
    /// Fails on the first invalid entry or duplicate id; a partially valid
    /// registry is never returned.
    pub fn try_from_entries(entries: Vec<ServiceEntry>) -> AggregatorResult<Self> {
        let mut services: Vec<ServiceDefinition> = Vec::with_capacity(entries.len());

        for (index, entry) in entries.into_iter().enumerate() {
            let definition = entry.into_definition().map_err(|reason| {
                AggregatorError::ConfigurationInvalid(format!("services[{index}]: {reason}"))
            })?;

            if services.iter().any(|existing| existing.id == definition.id) {
                return Err(AggregatorError::ConfigurationInvalid(format!(
                    "services[{index}]: duplicate service id '{}'",
                    definition.id
                )));
            }

            debug!(id = %definition.id, url = %definition.url, "Registered service");
            services.push(definition);
        }

        Ok(Self { services })
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceResolver for ServiceRegistry {
    fn find_by_id(&self, id: &str) -> Option<&ServiceDefinition> {
        self.services.iter().find(|service| service.id == id)
    }

    fn services(&self) -> &[ServiceDefinition] {
        &self.services
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ServiceRegistry {
        ServiceRegistry::try_from_entries(vec![
            ServiceEntry::new("billing", "Billing", "http://billing.internal/openapi.json"),
            ServiceEntry::new("users", "Users", "https://users.internal/v3/api-docs"),
            ServiceEntry::new("Users2", "Users v2", "https://users.internal/v2/api-docs"),
        ])
        .unwrap()
    }

    #[test]
    fn test_find_by_id_exact_match() {
        let registry = registry();

        let billing = registry.find_by_id("billing").unwrap();
        assert_eq!(billing.name, "Billing");
        assert_eq!(billing.url.as_str(), "http://billing.internal/openapi.json");

        assert_eq!(registry.find_by_id("Users2").unwrap().name, "Users v2");
    }

    #[test]
    fn test_find_by_id_does_not_normalize() {
        let registry = registry();

        for probe in ["", "Billing", "BILLING", " billing", "billing ", "bill", "users2"] {
            assert!(registry.find_by_id(probe).is_none(), "{probe:?} should not resolve");
        }
    }

    #[test]
    fn test_services_preserve_configured_order() {
        let registry = registry();
        let ids: Vec<&str> = registry.services().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["billing", "users", "Users2"]);
    }

    #[test]
    fn test_invalid_entry_fails_whole_load() {
        let result = ServiceRegistry::try_from_entries(vec![
            ServiceEntry::new("billing", "Billing", "http://billing.internal/openapi.json"),
            ServiceEntry::new("users", "", "https://users.internal/v3/api-docs"),
            ServiceEntry::new("orders", "Orders", "https://orders.internal/openapi.json"),
        ]);

        match result {
            Err(AggregatorError::ConfigurationInvalid(msg)) => {
                assert_eq!(msg, "services[1]: name: must not be blank");
            }
            other => panic!("expected ConfigurationInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_url_fails_whole_load() {
        let result = ServiceRegistry::try_from_entries(vec![
            ServiceEntry::new("billing", "Billing", "not a url"),
        ]);

        assert!(matches!(result, Err(AggregatorError::ConfigurationInvalid(_))));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let result = ServiceRegistry::try_from_entries(vec![
            ServiceEntry::new("billing", "Billing", "http://billing.internal/openapi.json"),
            ServiceEntry::new("billing", "Billing (old)", "http://legacy.internal/openapi.json"),
        ]);

        match result {
            Err(AggregatorError::ConfigurationInvalid(msg)) => {
                assert_eq!(msg, "services[1]: duplicate service id 'billing'");
            }
            other => panic!("expected ConfigurationInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_ids_differing_by_case_are_distinct() {
        let registry = ServiceRegistry::try_from_entries(vec![
            ServiceEntry::new("billing", "Billing", "http://billing.internal/openapi.json"),
            ServiceEntry::new("Billing", "Billing EU", "http://billing.eu.internal/openapi.json"),
        ])
        .unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.find_by_id("Billing").unwrap().name, "Billing EU");
    }

    #[test]
    fn test_empty_registry_resolves_nothing() {
        let registry = ServiceRegistry::try_from_entries(Vec::new()).unwrap();
        assert!(registry.is_empty());
        assert!(registry.find_by_id("billing").is_none());
    }
}
