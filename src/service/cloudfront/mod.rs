//! Amazon CloudFront.

pub mod api;
pub mod find;
mod response_headers_policy;

pub use api::CloudFrontClient;
pub use find::find_response_headers_policy_by_id;
pub use response_headers_policy::{
    data_source_response_headers_policy, ResponseHeadersPolicyDataSource,
};

use crate::config::ProviderConfig;
use crate::conns::ServiceClient;
use crate::endpoints::{resolve_endpoint, GlobalEndpoint};
use crate::error::ProviderError;
use crate::names;
use crate::registry::{DataSourceRegistration, ResourceRegistration, ServicePackage};
use crate::transport::JsonTransport;

const ENDPOINT: GlobalEndpoint = GlobalEndpoint {
    host: "cloudfront.amazonaws.com",
    china_host: "cloudfront.cn-northwest-1.amazonaws.com.cn",
};

/// Registration table for CloudFront.
#[derive(Debug, Clone, Copy, Default)]
pub struct CloudFrontPackage;

impl ServicePackage for CloudFrontPackage {
    fn framework_data_sources(&self) -> Vec<DataSourceRegistration> {
        vec![]
    }

    fn framework_resources(&self) -> Vec<ResourceRegistration> {
        vec![]
    }

    fn sdk_data_sources(&self) -> Vec<DataSourceRegistration> {
        vec![DataSourceRegistration {
            factory: data_source_response_headers_policy,
            type_name: "aws_cloudfront_response_headers_policy",
            name: "Response Headers Policy",
        }]
    }

    fn sdk_resources(&self) -> Vec<ResourceRegistration> {
        vec![]
    }

    fn service_package_name(&self) -> &'static str {
        names::CLOUDFRONT
    }

    fn new_client(&self, config: &ProviderConfig) -> Result<ServiceClient, ProviderError> {
        let endpoint = resolve_endpoint(config, names::CLOUDFRONT, &ENDPOINT)?;
        let transport = JsonTransport::new(names::CLOUDFRONT, endpoint, config)?;
        Ok(ServiceClient::CloudFront(CloudFrontClient::new(transport)))
    }
}

/// The CloudFront package.
pub fn service_package() -> Box<dyn ServicePackage> {
    Box::new(CloudFrontPackage)
}
