//! The shared client set handed to every lifecycle callback.

use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::names;
use crate::registry::ServicePackage;
use crate::service::cloudfront::CloudFrontClient;
use crate::service::cloudsearch::CloudSearchClient;
use crate::service::resourcegroups::ResourceGroupsClient;

/// A client built by one service package.
#[derive(Debug, Clone)]
pub enum ServiceClient {
    /// AWS Resource Groups.
    ResourceGroups(ResourceGroupsClient),
    /// Amazon CloudFront.
    CloudFront(CloudFrontClient),
    /// Amazon CloudSearch.
    CloudSearch(CloudSearchClient),
}

impl ServiceClient {
    /// The service name this client belongs to.
    pub fn service_name(&self) -> &'static str {
        match self {
            Self::ResourceGroups(_) => names::RESOURCE_GROUPS,
            Self::CloudFront(_) => names::CLOUDFRONT,
            Self::CloudSearch(_) => names::CLOUDSEARCH,
        }
    }
}

/// Per-service clients for one configured provider.
///
/// Built once by `configure` and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct AwsClient {
    region: String,
    resource_groups: Option<ResourceGroupsClient>,
    cloudfront: Option<CloudFrontClient>,
    cloudsearch: Option<CloudSearchClient>,
}

impl AwsClient {
    /// Build every package's client from the configuration.
    pub fn new(
        config: &ProviderConfig,
        packages: &[Box<dyn ServicePackage>],
    ) -> Result<Self, ProviderError> {
        let mut client = Self {
            region: config.region.clone(),
            ..Default::default()
        };
        for package in packages {
            let service_client = package.new_client(config)?;
            debug!(
                service = package.service_package_name(),
                region = %config.region,
                "configured service client"
            );
            client.insert(service_client);
        }
        Ok(client)
    }

    /// Add or replace one service's client.
    pub fn insert(&mut self, service_client: ServiceClient) {
        match service_client {
            ServiceClient::ResourceGroups(c) => self.resource_groups = Some(c),
            ServiceClient::CloudFront(c) => self.cloudfront = Some(c),
            ServiceClient::CloudSearch(c) => self.cloudsearch = Some(c),
        }
    }

    /// The configured region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// The Resource Groups client.
    pub fn resource_groups(&self) -> Result<&ResourceGroupsClient, ProviderError> {
        self.resource_groups
            .as_ref()
            .ok_or_else(|| missing(names::RESOURCE_GROUPS))
    }

    /// The CloudFront client.
    pub fn cloudfront(&self) -> Result<&CloudFrontClient, ProviderError> {
        self.cloudfront
            .as_ref()
            .ok_or_else(|| missing(names::CLOUDFRONT))
    }

    /// The CloudSearch client.
    pub fn cloudsearch(&self) -> Result<&CloudSearchClient, ProviderError> {
        self.cloudsearch
            .as_ref()
            .ok_or_else(|| missing(names::CLOUDSEARCH))
    }
}

fn missing(service: &str) -> ProviderError {
    ProviderError::Configuration(format!("no {} client configured", service))
}
