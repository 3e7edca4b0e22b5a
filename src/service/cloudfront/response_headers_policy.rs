//! `aws_cloudfront_response_headers_policy` data source.

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, instrument};

use crate::conns::AwsClient;
use crate::error::{empty_result, ProviderError};
use crate::names::ATTR_NAME;
use crate::resource::DataSource;
use crate::schema::{Attribute, Block, NestedBlock, Schema};
use crate::types::ResourceData;

use super::api::{GetResponseHeadersPolicyInput, ResponseHeadersPolicyConfig};
use super::find::find_response_headers_policy_by_id;

/// Factory registered for `aws_cloudfront_response_headers_policy`.
pub fn data_source_response_headers_policy() -> Box<dyn DataSource> {
    Box::new(ResponseHeadersPolicyDataSource)
}

/// Looks up an existing response headers policy by ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseHeadersPolicyDataSource;

#[async_trait]
impl DataSource for ResponseHeadersPolicyDataSource {
    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute(
                "id",
                Attribute::required_string().with_description("ID of the policy"),
            )
            .with_attribute(ATTR_NAME, Attribute::computed_string())
            .with_attribute("comment", Attribute::computed_string())
            .with_attribute("etag", Attribute::computed_string())
            .with_block(
                "custom_headers_config",
                NestedBlock::list(
                    Block::new()
                        .with_attribute("header", Attribute::computed_string())
                        .with_attribute("value", Attribute::computed_string())
                        .with_attribute("override", Attribute::computed_bool()),
                )
                .computed(),
            )
            .with_block(
                "server_timing_headers_config",
                NestedBlock::list(
                    Block::new()
                        .with_attribute("enabled", Attribute::computed_bool())
                        .with_attribute("sampling_rate", Attribute::computed_float64()),
                )
                .with_max_items(1)
                .computed(),
            )
    }

    #[instrument(skip_all, name = "cloudfront.response_headers_policy.read")]
    async fn read(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.cloudfront()?;
        let id = data.require_id()?.to_string();
        debug!(%id, "reading response headers policy");

        let output = find_response_headers_policy_by_id(conn, &id).await?;
        let policy = output
            .response_headers_policy
            .ok_or_else(|| empty_result(&GetResponseHeadersPolicyInput { id: id.clone() }))?;
        let config = policy
            .response_headers_policy_config
            .ok_or_else(|| empty_result(&GetResponseHeadersPolicyInput { id: id.clone() }))?;

        data.set_id(policy.id);
        data.set("etag", output.etag)?;
        flatten_config(data, config)
    }
}

fn flatten_config(
    data: &mut ResourceData,
    config: ResponseHeadersPolicyConfig,
) -> Result<(), ProviderError> {
    data.set(ATTR_NAME, config.name)?;
    data.set("comment", config.comment)?;

    let headers: Vec<_> = config
        .custom_headers_config
        .map(|c| c.items)
        .unwrap_or_default()
        .into_iter()
        .map(|h| json!({"header": h.header, "value": h.value, "override": h.override_}))
        .collect();
    data.set("custom_headers_config", headers)?;

    let server_timing: Vec<_> = config
        .server_timing_headers_config
        .into_iter()
        .map(|c| json!({"enabled": c.enabled, "sampling_rate": c.sampling_rate.unwrap_or_default()}))
        .collect();
    data.set("server_timing_headers_config", server_timing)?;

    Ok(())
}
