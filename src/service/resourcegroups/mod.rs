//! AWS Resource Groups.

pub mod api;
pub mod find;
mod group;

pub use api::ResourceGroupsClient;
pub use group::{resource_group, GroupResource};

use crate::config::ProviderConfig;
use crate::conns::ServiceClient;
use crate::endpoints::{resolve_endpoint, RegionalEndpoint};
use crate::error::ProviderError;
use crate::names;
use crate::registry::{DataSourceRegistration, ResourceRegistration, ServicePackage};
use crate::transport::JsonTransport;

const ENDPOINT: RegionalEndpoint = RegionalEndpoint::new("resource-groups").with_fips();

/// Registration table for Resource Groups.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceGroupsPackage;

impl ServicePackage for ResourceGroupsPackage {
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
        vec![ResourceRegistration {
            factory: resource_group,
            type_name: "aws_resourcegroups_group",
            name: "Group",
        }]
    }

    fn service_package_name(&self) -> &'static str {
        names::RESOURCE_GROUPS
    }

    fn new_client(&self, config: &ProviderConfig) -> Result<ServiceClient, ProviderError> {
        let endpoint = resolve_endpoint(config, names::RESOURCE_GROUPS, &ENDPOINT)?;
        let transport = JsonTransport::new(names::RESOURCE_GROUPS, endpoint, config)?;
        Ok(ServiceClient::ResourceGroups(ResourceGroupsClient::new(transport)))
    }
}

/// The Resource Groups package.
pub fn service_package() -> Box<dyn ServicePackage> {
    Box::new(ResourceGroupsPackage)
}
