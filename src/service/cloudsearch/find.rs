//! Lookup helpers for CloudSearch.

use crate::error::{empty_result, not_found, not_found_or, ProviderError};

use super::api::{
    AccessPoliciesStatus, AvailabilityOptionsStatus, CloudSearchClient, DescribeDomainsInput,
    DomainInput, DomainStatus, ScalingParametersStatus,
};

/// Fetch a domain's status by name.
///
/// An empty status list, or a domain already marked deleted, is not found.
pub async fn find_domain_by_name(
    conn: &CloudSearchClient,
    name: &str,
) -> Result<DomainStatus, ProviderError> {
    let input = DescribeDomainsInput {
        domain_names: vec![name.to_string()],
    };
    let output = conn
        .describe_domains(&input)
        .await
        .map_err(|e| not_found_or(e, &input))?;

    let domain = output
        .domain_status_list
        .into_iter()
        .find(|d| d.domain_name == name)
        .ok_or_else(|| not_found("no domain in DescribeDomains response", &input))?;

    if domain.deleted == Some(true) {
        return Err(not_found("domain has been deleted", &input));
    }
    Ok(domain)
}

/// Fetch a domain's availability options.
pub async fn find_availability_options_by_name(
    conn: &CloudSearchClient,
    name: &str,
) -> Result<AvailabilityOptionsStatus, ProviderError> {
    let input = DomainInput::new(name);
    let output = conn
        .describe_availability_options(&input)
        .await
        .map_err(|e| not_found_or(e, &input))?;
    output
        .availability_options
        .ok_or_else(|| empty_result(&input))
}

/// Fetch a domain's scaling parameters.
pub async fn find_scaling_parameters_by_name(
    conn: &CloudSearchClient,
    name: &str,
) -> Result<ScalingParametersStatus, ProviderError> {
    let input = DomainInput::new(name);
    let output = conn
        .describe_scaling_parameters(&input)
        .await
        .map_err(|e| not_found_or(e, &input))?;
    output.scaling_parameters.ok_or_else(|| empty_result(&input))
}

/// Fetch a domain's service access policies.
///
/// An empty policy document means no policy is attached, which is not found.
pub async fn find_service_access_policies_by_name(
    conn: &CloudSearchClient,
    name: &str,
) -> Result<AccessPoliciesStatus, ProviderError> {
    let input = DomainInput::new(name);
    let output = conn
        .describe_service_access_policies(&input)
        .await
        .map_err(|e| not_found_or(e, &input))?;

    let policies = output.access_policies.ok_or_else(|| empty_result(&input))?;
    if policies.options.trim().is_empty() {
        return Err(not_found("no service access policy attached", &input));
    }
    Ok(policies)
}
