//! Service modules, one per remote API.

pub mod cloudfront;
pub mod cloudsearch;
pub mod resourcegroups;

use crate::registry::ServicePackage;

/// Every built-in service package.
pub fn service_packages() -> Vec<Box<dyn ServicePackage>> {
    vec![
        cloudfront::service_package(),
        cloudsearch::service_package(),
        resourcegroups::service_package(),
    ]
}
