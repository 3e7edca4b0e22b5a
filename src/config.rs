//! Provider-level configuration.
//!
//! The host hands the provider block over as JSON. It is validated against
//! [`provider_config_schema`] and then decoded once into [`ProviderConfig`],
//! which every service client is built from.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::ProviderError;
use crate::names;
use crate::schema::{Attribute, AttributeType, AttributeFlags, Schema};
use crate::validation::{apply_defaults, validate_result};

/// Default number of transport retries for throttled or failed requests.
pub const DEFAULT_MAX_RETRIES: u32 = 25;

/// Environment variables consulted, in order, when `region` is not configured.
pub const REGION_ENV_VARS: &[&str] = &["AWS_REGION", "AWS_DEFAULT_REGION"];

/// Static credentials. Any field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// Access key ID.
    #[serde(default)]
    pub access_key: Option<String>,
    /// Secret access key.
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Session token, forwarded as `X-Amz-Security-Token`.
    #[serde(default)]
    pub token: Option<String>,
}

/// Decoded provider configuration, shared read-only by every callback.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProviderConfig {
    /// The region all regional services are addressed in.
    #[serde(default)]
    pub region: String,
    /// Static credentials.
    #[serde(flatten)]
    pub credentials: Credentials,
    /// Per-service endpoint overrides, keyed by service name.
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
    /// Maximum retries the transport makes on throttling or server errors.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Resolve FIPS endpoints where the service has them.
    #[serde(default)]
    pub use_fips_endpoint: bool,
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl ProviderConfig {
    /// A configuration for the given region with everything else defaulted.
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            credentials: Credentials::default(),
            endpoints: BTreeMap::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            use_fips_endpoint: false,
        }
    }

    /// Override the endpoint for one service.
    pub fn with_endpoint(mut self, service: impl Into<String>, url: impl Into<String>) -> Self {
        self.endpoints.insert(service.into(), url.into());
        self
    }

    /// Set the retry budget.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Decode the host's provider block.
    ///
    /// Validates against the provider schema first, then falls back to the
    /// environment for the region. Unknown service names in `endpoints` are
    /// rejected so typos do not silently hit the real API.
    pub fn from_value(mut value: Value) -> Result<Self, ProviderError> {
        if value.is_null() {
            value = json!({});
        }
        let schema = provider_config_schema();
        apply_defaults(&schema, &mut value);
        validate_result(&schema, &value).map_err(|diagnostics| {
            let summaries: Vec<_> = diagnostics.into_iter().map(|d| d.summary).collect();
            ProviderError::Configuration(summaries.join("; "))
        })?;

        let mut config: ProviderConfig = serde_json::from_value(value)
            .map_err(|e| ProviderError::Configuration(e.to_string()))?;

        if config.region.is_empty() {
            config.region = region_from_env(|name| std::env::var(name).ok()).unwrap_or_default();
        }
        if config.region.is_empty() {
            return Err(ProviderError::Configuration(format!(
                "region must be set in the provider block or via {}",
                REGION_ENV_VARS.join(" / ")
            )));
        }

        if let Some(unknown) = config
            .endpoints
            .keys()
            .find(|service| !names::SERVICES.contains(&service.as_str()))
        {
            return Err(ProviderError::Configuration(format!(
                "unsupported service {:?} in {}; expected one of: {}",
                unknown,
                names::ATTR_ENDPOINTS,
                names::SERVICES.join(", ")
            )));
        }

        Ok(config)
    }

    /// The endpoint override for a service, if one is configured.
    pub fn endpoint_override(&self, service: &str) -> Option<&str> {
        self.endpoints
            .get(service)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }
}

fn region_from_env(lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    REGION_ENV_VARS
        .iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.is_empty())
}

/// Schema of the provider block.
pub fn provider_config_schema() -> Schema {
    Schema::v0()
        .with_attribute(
            "region",
            Attribute::optional_string().with_description("The region to manage resources in"),
        )
        .with_attribute("access_key", Attribute::optional_string().sensitive())
        .with_attribute("secret_key", Attribute::optional_string().sensitive())
        .with_attribute("token", Attribute::optional_string().sensitive())
        .with_attribute(
            names::ATTR_ENDPOINTS,
            Attribute::new(
                AttributeType::map(AttributeType::String),
                AttributeFlags::optional(),
            )
            .with_description("Custom endpoint URLs keyed by service name"),
        )
        .with_attribute(
            "max_retries",
            Attribute::optional_int64().with_default(json!(DEFAULT_MAX_RETRIES)),
        )
        .with_attribute(
            "use_fips_endpoint",
            Attribute::optional_bool().with_default(json!(false)),
        )
}
