//! Amazon CloudSearch.

pub mod api;
mod domain;
mod domain_service_access_policy;
pub mod find;

pub use api::CloudSearchClient;
pub use domain::{resource_domain, DomainResource};
pub use domain_service_access_policy::{
    resource_domain_service_access_policy, DomainServiceAccessPolicyResource,
};

use crate::config::ProviderConfig;
use crate::conns::ServiceClient;
use crate::endpoints::{resolve_endpoint, RegionalEndpoint};
use crate::error::ProviderError;
use crate::names;
use crate::registry::{DataSourceRegistration, ResourceRegistration, ServicePackage};
use crate::transport::JsonTransport;

const ENDPOINT: RegionalEndpoint = RegionalEndpoint::new("cloudsearch");

/// Registration table for CloudSearch.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudSearchPackage;

impl ServicePackage for CloudSearchPackage {
    fn framework_data_sources(&self) -> Vec<DataSourceRegistration> {
        vec![]
    }

    fn framework_resources(&self) -> Vec<ResourceRegistration> {
        vec![]
    }

    fn sdk_data_sources(&self) -> Vec<DataSourceRegistration> {
        vec![]
    }

    fn sdk_resources(&self) -> Vec<ResourceRegistration> {
        vec![
            ResourceRegistration {
                factory: resource_domain,
                type_name: "aws_cloudsearch_domain",
                name: "Domain",
            },
            ResourceRegistration {
                factory: resource_domain_service_access_policy,
                type_name: "aws_cloudsearch_domain_service_access_policy",
                name: "Domain Service Access Policy",
            },
        ]
    }

    fn service_package_name(&self) -> &'static str {
        names::CLOUDSEARCH
    }

    fn new_client(&self, config: &ProviderConfig) -> Result<ServiceClient, ProviderError> {
        let endpoint = resolve_endpoint(config, names::CLOUDSEARCH, &ENDPOINT)?;
        let transport = JsonTransport::new(names::CLOUDSEARCH, endpoint, config)?;
        Ok(ServiceClient::CloudSearch(CloudSearchClient::new(transport)))
    }
}

/// The CloudSearch package.
pub fn service_package() -> Box<dyn ServicePackage> {
    Box::new(CloudSearchPackage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor() {
        let package = CloudSearchPackage;
        assert_eq!(package.service_package_name(), "cloudsearch");
        assert!(package.framework_data_sources().is_empty());
        assert!(package.framework_resources().is_empty());
        assert!(package.sdk_data_sources().is_empty());

        let resources: Vec<_> = package
            .sdk_resources()
            .into_iter()
            .map(|r| (r.type_name, r.name))
            .collect();
        assert_eq!(
            resources,
            vec![
                ("aws_cloudsearch_domain", "Domain"),
                (
                    "aws_cloudsearch_domain_service_access_policy",
                    "Domain Service Access Policy"
                ),
            ]
        );
    }

    #[test]
    fn test_new_client_uses_override() {
        let config = ProviderConfig::new("eu-west-1")
            .with_endpoint(names::CLOUDSEARCH, "http://localhost:4566");
        match CloudSearchPackage.new_client(&config).unwrap() {
            ServiceClient::CloudSearch(client) => {
                assert_eq!(client.transport().endpoint().as_str(), "http://localhost:4566/")
            },
            other => panic!("unexpected client for {}", other.service_name()),
        }

        let config = ProviderConfig::new("eu-west-1");
        let client = CloudSearchPackage.new_client(&config).unwrap();
        assert_eq!(client.service_name(), names::CLOUDSEARCH);
    }
}
