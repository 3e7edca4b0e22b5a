//! CloudFront REST-JSON operations.

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::transport::JsonTransport;

/// API version prefix of every CloudFront path.
const API_VERSION: &str = "2020-05-31";

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetResponseHeadersPolicyInput {
    pub id: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetResponseHeadersPolicyOutput {
    #[serde(default)]
    pub response_headers_policy: Option<ResponseHeadersPolicy>,
    #[serde(rename = "ETag", default)]
    pub etag: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseHeadersPolicy {
    pub id: String,
    #[serde(default)]
    pub last_modified_time: Option<String>,
    #[serde(default)]
    pub response_headers_policy_config: Option<ResponseHeadersPolicyConfig>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseHeadersPolicyConfig {
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub custom_headers_config: Option<CustomHeadersConfig>,
    #[serde(default)]
    pub server_timing_headers_config: Option<ServerTimingHeadersConfig>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomHeadersConfig {
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub items: Vec<CustomHeader>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomHeader {
    pub header: String,
    pub value: String,
    #[serde(rename = "Override")]
    pub override_: bool,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServerTimingHeadersConfig {
    pub enabled: bool,
    #[serde(default)]
    pub sampling_rate: Option<f64>,
}

/// CloudFront API client.
#[derive(Debug, Clone)]
pub struct CloudFrontClient {
    transport: JsonTransport,
}

impl CloudFrontClient {
    /// Wrap a transport bound to the CloudFront endpoint.
    pub fn new(transport: JsonTransport) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &JsonTransport {
        &self.transport
    }

    /// `GetResponseHeadersPolicy`
    pub async fn get_response_headers_policy(
        &self,
        input: &GetResponseHeadersPolicyInput,
    ) -> Result<GetResponseHeadersPolicyOutput, ProviderError> {
        let path = format!(
            "/{}/response-headers-policy/{}",
            API_VERSION,
            urlencoding::encode(&input.id)
        );
        self.transport.rest(Method::GET, &path, None::<&()>).await
    }
}
