//! CloudSearch JSON-RPC operations.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::transport::JsonTransport;

/// Target prefix of every CloudSearch operation.
const TARGET_PREFIX: &str = "CloudSearch";

/// Input naming a single domain, shared by most describe and delete calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainInput {
    /// The domain name.
    pub domain_name: String,
}

impl DomainInput {
    /// Address the given domain.
    pub fn new(domain_name: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDomainsInput {
    pub domain_names: Vec<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceEndpoint {
    #[serde(default)]
    pub endpoint: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainStatus {
    pub domain_id: String,
    pub domain_name: String,
    #[serde(rename = "ARN", default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub created: Option<bool>,
    #[serde(default)]
    pub deleted: Option<bool>,
    #[serde(default)]
    pub processing: Option<bool>,
    #[serde(default)]
    pub doc_service: Option<ServiceEndpoint>,
    #[serde(default)]
    pub search_service: Option<ServiceEndpoint>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DomainStatusOutput {
    #[serde(default)]
    pub domain_status: Option<DomainStatus>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDomainsOutput {
    #[serde(default)]
    pub domain_status_list: Vec<DomainStatus>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OptionStatus {
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub pending_deletion: Option<bool>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AvailabilityOptionsStatus {
    pub options: bool,
    #[serde(default)]
    pub status: Option<OptionStatus>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AvailabilityOptionsOutput {
    #[serde(default)]
    pub availability_options: Option<AvailabilityOptionsStatus>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateAvailabilityOptionsInput {
    pub domain_name: String,
    #[serde(rename = "MultiAZ")]
    pub multi_az: bool,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScalingParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_instance_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_replication_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_partition_count: Option<i64>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScalingParametersStatus {
    #[serde(default)]
    pub options: ScalingParameters,
    #[serde(default)]
    pub status: Option<OptionStatus>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ScalingParametersOutput {
    #[serde(default)]
    pub scaling_parameters: Option<ScalingParametersStatus>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateScalingParametersInput {
    pub domain_name: String,
    pub scaling_parameters: ScalingParameters,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessPoliciesStatus {
    #[serde(default)]
    pub options: String,
    #[serde(default)]
    pub status: Option<OptionStatus>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AccessPoliciesOutput {
    #[serde(default)]
    pub access_policies: Option<AccessPoliciesStatus>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateServiceAccessPoliciesInput {
    pub domain_name: String,
    pub access_policies: String,
}

/// CloudSearch configuration API client.
#[derive(Debug, Clone)]
pub struct CloudSearchClient {
    transport: JsonTransport,
}

impl CloudSearchClient {
    /// Wrap a transport bound to the CloudSearch endpoint.
    pub fn new(transport: JsonTransport) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &JsonTransport {
        &self.transport
    }

    async fn call<I, O>(&self, operation: &str, input: &I) -> Result<O, ProviderError>
    where
        I: Serialize,
        O: DeserializeOwned,
    {
        let target = format!("{}.{}", TARGET_PREFIX, operation);
        self.transport.rpc(&target, input).await
    }

    /// `CreateDomain`
    pub async fn create_domain(&self, input: &DomainInput) -> Result<DomainStatusOutput, ProviderError> {
        self.call("CreateDomain", input).await
    }

    /// `DescribeDomains`
    pub async fn describe_domains(
        &self,
        input: &DescribeDomainsInput,
    ) -> Result<DescribeDomainsOutput, ProviderError> {
        self.call("DescribeDomains", input).await
    }

    /// `DeleteDomain`
    pub async fn delete_domain(&self, input: &DomainInput) -> Result<DomainStatusOutput, ProviderError> {
        self.call("DeleteDomain", input).await
    }

    /// `DescribeAvailabilityOptions`
    pub async fn describe_availability_options(
        &self,
        input: &DomainInput,
    ) -> Result<AvailabilityOptionsOutput, ProviderError> {
        self.call("DescribeAvailabilityOptions", input).await
    }

    /// `UpdateAvailabilityOptions`
    pub async fn update_availability_options(
        &self,
        input: &UpdateAvailabilityOptionsInput,
    ) -> Result<AvailabilityOptionsOutput, ProviderError> {
        self.call("UpdateAvailabilityOptions", input).await
    }

    /// `DescribeScalingParameters`
    pub async fn describe_scaling_parameters(
        &self,
        input: &DomainInput,
    ) -> Result<ScalingParametersOutput, ProviderError> {
        self.call("DescribeScalingParameters", input).await
    }

    /// `UpdateScalingParameters`
    pub async fn update_scaling_parameters(
        &self,
        input: &UpdateScalingParametersInput,
    ) -> Result<ScalingParametersOutput, ProviderError> {
        self.call("UpdateScalingParameters", input).await
    }

    /// `DescribeServiceAccessPolicies`
    pub async fn describe_service_access_policies(
        &self,
        input: &DomainInput,
    ) -> Result<AccessPoliciesOutput, ProviderError> {
        self.call("DescribeServiceAccessPolicies", input).await
    }

    /// `UpdateServiceAccessPolicies`
    pub async fn update_service_access_policies(
        &self,
        input: &UpdateServiceAccessPoliciesInput,
    ) -> Result<AccessPoliciesOutput, ProviderError> {
        self.call("UpdateServiceAccessPolicies", input).await
    }
}
