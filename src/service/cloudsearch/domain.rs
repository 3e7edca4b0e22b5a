//! `aws_cloudsearch_domain`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::conns::AwsClient;
use crate::error::{empty_result, ProviderError};
use crate::names::{ATTR_ARN, ATTR_NAME};
use crate::resource::Resource;
use crate::schema::{Attribute, Block, NestedBlock, Schema};
use crate::types::ResourceData;

use super::api::{
    CloudSearchClient, DomainInput, ScalingParameters, UpdateAvailabilityOptionsInput,
    UpdateScalingParametersInput,
};
use super::find::{
    find_availability_options_by_name, find_domain_by_name, find_scaling_parameters_by_name,
};

const ATTR_MULTI_AZ: &str = "multi_az";
const ATTR_SCALING_PARAMETERS: &str = "scaling_parameters";

/// Factory registered for `aws_cloudsearch_domain`.
pub fn resource_domain() -> Box<dyn Resource> {
    Box::new(DomainResource)
}

/// A CloudSearch domain. Index fields and endpoint options are not managed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainResource;

#[derive(Debug, Deserialize)]
struct DomainConfig {
    name: String,
    #[serde(default)]
    multi_az: Option<bool>,
    #[serde(default)]
    scaling_parameters: Vec<ScalingParametersConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ScalingParametersConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    desired_instance_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    desired_partition_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    desired_replication_count: Option<i64>,
}

impl DomainConfig {
    fn scaling_parameters(&self) -> Option<ScalingParameters> {
        self.scaling_parameters.first().map(|p| ScalingParameters {
            desired_instance_type: p.desired_instance_type.clone().filter(|t| !t.is_empty()),
            desired_partition_count: p.desired_partition_count,
            desired_replication_count: p.desired_replication_count,
        })
    }
}

#[async_trait]
impl Resource for DomainResource {
    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute(
                ATTR_NAME,
                Attribute::required_string()
                    .with_force_new()
                    .with_description("Name of the domain"),
            )
            .with_attribute(
                ATTR_MULTI_AZ,
                Attribute::optional_bool()
                    .with_description("Whether the domain is deployed to a second availability zone"),
            )
            .with_attribute(ATTR_ARN, Attribute::computed_string())
            .with_attribute("domain_id", Attribute::computed_string())
            .with_attribute("document_service_endpoint", Attribute::computed_string())
            .with_attribute("search_service_endpoint", Attribute::computed_string())
            .with_block(
                ATTR_SCALING_PARAMETERS,
                NestedBlock::list(
                    Block::new()
                        .with_attribute("desired_instance_type", Attribute::optional_string())
                        .with_attribute("desired_partition_count", Attribute::optional_int64())
                        .with_attribute("desired_replication_count", Attribute::optional_int64()),
                )
                .with_max_items(1),
            )
    }

    #[instrument(skip_all, name = "cloudsearch.domain.create")]
    async fn create(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.cloudsearch()?;
        let config: DomainConfig = data.decode()?;

        let input = DomainInput::new(&config.name);
        let output = conn.create_domain(&input).await?;
        let status = output.domain_status.ok_or_else(|| empty_result(&input))?;

        info!(name = %status.domain_name, "created CloudSearch domain");
        data.set_id(status.domain_name);

        if let Some(multi_az) = config.multi_az {
            update_availability_options(conn, &config.name, multi_az).await?;
        }
        if let Some(params) = config.scaling_parameters() {
            update_scaling_parameters(conn, &config.name, params).await?;
        }

        self.read(data, client).await
    }

    #[instrument(skip_all, name = "cloudsearch.domain.read")]
    async fn read(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.cloudsearch()?;
        let name = data.require_id()?.to_string();
        debug!(%name, "reading CloudSearch domain");

        let domain = find_domain_by_name(conn, &name).await?;
        data.set(ATTR_NAME, &domain.domain_name)?;
        data.set(ATTR_ARN, &domain.arn)?;
        data.set("domain_id", &domain.domain_id)?;
        data.set(
            "document_service_endpoint",
            domain.doc_service.and_then(|s| s.endpoint),
        )?;
        data.set(
            "search_service_endpoint",
            domain.search_service.and_then(|s| s.endpoint),
        )?;

        let configured_multi_az = data.get(ATTR_MULTI_AZ).is_some_and(|v| !v.is_null());
        let multi_az = find_availability_options_by_name(conn, &name).await?.options;
        data.set(
            ATTR_MULTI_AZ,
            (multi_az || configured_multi_az).then_some(multi_az),
        )?;

        let scaling = find_scaling_parameters_by_name(conn, &name).await?.options;
        if scaling == ScalingParameters::default() {
            data.set(ATTR_SCALING_PARAMETERS, serde_json::Value::Null)?;
        } else {
            data.set(
                ATTR_SCALING_PARAMETERS,
                [ScalingParametersConfig {
                    desired_instance_type: scaling.desired_instance_type,
                    desired_partition_count: scaling.desired_partition_count,
                    desired_replication_count: scaling.desired_replication_count,
                }],
            )?;
        }

        Ok(())
    }

    #[instrument(skip_all, name = "cloudsearch.domain.update")]
    async fn update(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.cloudsearch()?;
        let name = data.require_id()?.to_string();
        let config: DomainConfig = data.decode()?;

        if data.has_change(ATTR_MULTI_AZ) {
            match config.multi_az {
                Some(multi_az) => update_availability_options(conn, &name, multi_az).await?,
                None => debug!(%name, "multi_az no longer configured, leaving remote value"),
            }
        }

        if data.has_change(ATTR_SCALING_PARAMETERS) {
            match config.scaling_parameters() {
                Some(params) => update_scaling_parameters(conn, &name, params).await?,
                None => debug!(%name, "scaling_parameters no longer configured, leaving remote value"),
            }
        }

        self.read(data, client).await
    }

    #[instrument(skip_all, name = "cloudsearch.domain.delete")]
    async fn delete(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.cloudsearch()?;
        let name = data.require_id()?;
        info!(%name, "deleting CloudSearch domain");

        conn.delete_domain(&DomainInput::new(name)).await?;
        Ok(())
    }
}

async fn update_availability_options(
    conn: &CloudSearchClient,
    name: &str,
    multi_az: bool,
) -> Result<(), ProviderError> {
    debug!(name, multi_az, "updating availability options");
    conn.update_availability_options(&UpdateAvailabilityOptionsInput {
        domain_name: name.to_string(),
        multi_az,
    })
    .await?;
    Ok(())
}

async fn update_scaling_parameters(
    conn: &CloudSearchClient,
    name: &str,
    scaling_parameters: ScalingParameters,
) -> Result<(), ProviderError> {
    debug!(name, "updating scaling parameters");
    conn.update_scaling_parameters(&UpdateScalingParametersInput {
        domain_name: name.to_string(),
        scaling_parameters,
    })
    .await?;
    Ok(())
}
