//! Endpoint resolution.
//!
//! Each service package supplies a [`ResolveEndpoint`] strategy. A
//! caller-supplied override from the provider's `endpoints` setting always
//! wins over the strategy.

use url::Url;

use crate::config::ProviderConfig;
use crate::error::ProviderError;

/// Parameters an endpoint strategy resolves from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointParams<'a> {
    /// The configured region.
    pub region: &'a str,
    /// Whether a FIPS endpoint was requested.
    pub use_fips: bool,
}

/// A service-specific endpoint-resolution strategy.
pub trait ResolveEndpoint: Send + Sync {
    /// Resolve the base URL for the service.
    fn resolve(&self, params: EndpointParams<'_>) -> Result<Url, ProviderError>;
}

/// `https://{prefix}[-fips].{region}.{dns suffix}` for regional services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionalEndpoint {
    /// The endpoint prefix, e.g. `resource-groups`.
    pub prefix: &'static str,
    /// Whether the service publishes FIPS endpoints.
    pub has_fips: bool,
}

impl RegionalEndpoint {
    /// A regional strategy for the given endpoint prefix.
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            has_fips: false,
        }
    }

    /// Mark the service as publishing FIPS endpoints.
    pub const fn with_fips(self) -> Self {
        Self {
            prefix: self.prefix,
            has_fips: true,
        }
    }
}

impl ResolveEndpoint for RegionalEndpoint {
    fn resolve(&self, params: EndpointParams<'_>) -> Result<Url, ProviderError> {
        if params.region.is_empty() {
            return Err(ProviderError::Configuration(format!(
                "cannot resolve {} endpoint without a region",
                self.prefix
            )));
        }
        let host_prefix = if params.use_fips && self.has_fips {
            format!("{}-fips", self.prefix)
        } else {
            self.prefix.to_string()
        };
        let url = format!(
            "https://{}.{}.{}",
            host_prefix,
            params.region,
            dns_suffix(params.region)
        );
        parse_endpoint(&url)
    }
}

/// A single endpoint shared by every region, as CloudFront uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalEndpoint {
    /// The endpoint host in the commercial partition.
    pub host: &'static str,
    /// The endpoint host in the China partition.
    pub china_host: &'static str,
}

impl ResolveEndpoint for GlobalEndpoint {
    fn resolve(&self, params: EndpointParams<'_>) -> Result<Url, ProviderError> {
        let host = if params.region.starts_with("cn-") {
            self.china_host
        } else {
            self.host
        };
        parse_endpoint(&format!("https://{}", host))
    }
}

fn dns_suffix(region: &str) -> &'static str {
    if region.starts_with("cn-") {
        "amazonaws.com.cn"
    } else {
        "amazonaws.com"
    }
}

fn parse_endpoint(url: &str) -> Result<Url, ProviderError> {
    let parsed = Url::parse(url)
        .map_err(|e| ProviderError::Configuration(format!("invalid endpoint {:?}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ProviderError::Configuration(format!(
            "endpoint {:?} must use http or https",
            url
        )));
    }
    Ok(parsed)
}

/// Resolve a service's base URL: the configured override if any, else the strategy.
pub fn resolve_endpoint(
    config: &ProviderConfig,
    service: &str,
    strategy: &dyn ResolveEndpoint,
) -> Result<Url, ProviderError> {
    match config.endpoint_override(service) {
        Some(url) => parse_endpoint(url),
        None => strategy.resolve(EndpointParams {
            region: &config.region,
            use_fips: config.use_fips_endpoint,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOURCE_GROUPS: RegionalEndpoint = RegionalEndpoint::new("resource-groups").with_fips();
    const CLOUDFRONT: GlobalEndpoint = GlobalEndpoint {
        host: "cloudfront.amazonaws.com",
        china_host: "cloudfront.cn-northwest-1.amazonaws.com.cn",
    };

    #[test]
    fn test_regional_endpoint() {
        let config = ProviderConfig::new("us-west-2");
        let url = resolve_endpoint(&config, "resourcegroups", &RESOURCE_GROUPS).unwrap();
        assert_eq!(url.as_str(), "https://resource-groups.us-west-2.amazonaws.com/");
    }

    #[test]
    fn test_regional_endpoint_fips_and_china() {
        let mut config = ProviderConfig::new("us-east-1");
        config.use_fips_endpoint = true;
        let url = resolve_endpoint(&config, "resourcegroups", &RESOURCE_GROUPS).unwrap();
        assert_eq!(url.host_str(), Some("resource-groups-fips.us-east-1.amazonaws.com"));

        let config = ProviderConfig::new("cn-north-1");
        let url = resolve_endpoint(&config, "resourcegroups", &RESOURCE_GROUPS).unwrap();
        assert_eq!(url.host_str(), Some("resource-groups.cn-north-1.amazonaws.com.cn"));

        let url = RegionalEndpoint::new("cloudsearch")
            .resolve(EndpointParams {
                region: "us-east-1",
                use_fips: true,
            })
            .unwrap();
        assert_eq!(url.host_str(), Some("cloudsearch.us-east-1.amazonaws.com"));
    }

    #[test]
    fn test_global_endpoint() {
        let config = ProviderConfig::new("eu-central-1");
        let url = resolve_endpoint(&config, "cloudfront", &CLOUDFRONT).unwrap();
        assert_eq!(url.host_str(), Some("cloudfront.amazonaws.com"));

        let config = ProviderConfig::new("cn-northwest-1");
        let url = resolve_endpoint(&config, "cloudfront", &CLOUDFRONT).unwrap();
        assert_eq!(
            url.host_str(),
            Some("cloudfront.cn-northwest-1.amazonaws.com.cn")
        );
    }

    #[test]
    fn test_override_wins() {
        let config =
            ProviderConfig::new("us-west-2").with_endpoint("resourcegroups", "http://127.0.0.1:4566");
        let url = resolve_endpoint(&config, "resourcegroups", &RESOURCE_GROUPS).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:4566/");
    }

    #[test]
    fn test_invalid_override() {
        let config = ProviderConfig::new("us-west-2").with_endpoint("resourcegroups", "not a url");
        let err = resolve_endpoint(&config, "resourcegroups", &RESOURCE_GROUPS).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(_)));

        let config =
            ProviderConfig::new("us-west-2").with_endpoint("resourcegroups", "ftp://example.com");
        assert!(resolve_endpoint(&config, "resourcegroups", &RESOURCE_GROUPS).is_err());
    }

    #[test]
    fn test_missing_region() {
        let config = ProviderConfig::new("");
        assert!(resolve_endpoint(&config, "resourcegroups", &RESOURCE_GROUPS).is_err());
    }
}
