//! Lookup helpers for CloudFront.

use crate::error::{empty_result, not_found_or, ProviderError};

use super::api::{CloudFrontClient, GetResponseHeadersPolicyInput, GetResponseHeadersPolicyOutput};

/// Fetch a response headers policy by ID.
///
/// Issues exactly one remote call. `NoSuchResponseHeadersPolicy` becomes a
/// not-found error wrapping the remote error and the request; a response
/// missing the policy or its configuration is an empty result. Anything else
/// is returned unchanged.
pub async fn find_response_headers_policy_by_id(
    conn: &CloudFrontClient,
    id: &str,
) -> Result<GetResponseHeadersPolicyOutput, ProviderError> {
    let input = GetResponseHeadersPolicyInput { id: id.to_string() };
    let output = conn
        .get_response_headers_policy(&input)
        .await
        .map_err(|e| not_found_or(e, &input))?;

    match &output.response_headers_policy {
        Some(policy) if policy.response_headers_policy_config.is_some() => Ok(output),
        _ => Err(empty_result(&input)),
    }
}
