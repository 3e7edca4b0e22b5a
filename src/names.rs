//! Service names and shared attribute names.
//!
//! Service names are the registry keys and the keys of the `endpoints`
//! provider setting.

/// AWS Resource Groups.
pub const RESOURCE_GROUPS: &str = "resourcegroups";

/// Amazon CloudFront.
pub const CLOUDFRONT: &str = "cloudfront";

/// Amazon CloudSearch.
pub const CLOUDSEARCH: &str = "cloudsearch";

/// Every service this provider knows about.
pub const SERVICES: &[&str] = &[CLOUDFRONT, CLOUDSEARCH, RESOURCE_GROUPS];

/// `arn`
pub const ATTR_ARN: &str = "arn";
/// `description`
pub const ATTR_DESCRIPTION: &str = "description";
/// `name`
pub const ATTR_NAME: &str = "name";
/// `tags`
pub const ATTR_TAGS: &str = "tags";
/// `endpoints`, the provider setting holding per-service URL overrides.
pub const ATTR_ENDPOINTS: &str = "endpoints";
