//! `aws_resourcegroups_group`

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::conns::AwsClient;
use crate::error::{empty_result, ProviderError};
use crate::names::{ATTR_ARN, ATTR_DESCRIPTION, ATTR_NAME, ATTR_TAGS};
use crate::resource::Resource;
use crate::schema::{Attribute, Block, NestedBlock, Schema};
use crate::types::ResourceData;

use super::api::{
    CreateGroupInput, GroupInput, ResourceGroupsClient, ResourceQuery, UpdateGroupInput,
    UpdateGroupQueryInput, QUERY_TYPES, QUERY_TYPE_TAG_FILTERS_1_0,
};
use super::find::{find_group_by_name, find_group_query_by_name};

const ATTR_RESOURCE_QUERY: &str = "resource_query";

/// Factory registered for `aws_resourcegroups_group`.
pub fn resource_group() -> Box<dyn Resource> {
    Box::new(GroupResource)
}

/// A resource group: a named tag or stack query over other resources.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupResource;

#[derive(Debug, Deserialize)]
struct GroupConfig {
    name: String,
    #[serde(default)]
    description: Option<String>,
    resource_query: Vec<ResourceQueryConfig>,
    #[serde(default)]
    tags: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Deserialize)]
struct ResourceQueryConfig {
    query: String,
    #[serde(rename = "type", default = "default_query_type")]
    query_type: String,
}

fn default_query_type() -> String {
    QUERY_TYPE_TAG_FILTERS_1_0.to_string()
}

impl GroupConfig {
    fn resource_query(&self) -> Result<ResourceQuery, ProviderError> {
        match self.resource_query.as_slice() {
            [only] => Ok(ResourceQuery {
                query_type: only.query_type.clone(),
                query: only.query.clone(),
            }),
            other => Err(ProviderError::Validation(format!(
                "{} must contain exactly one element, got {}",
                ATTR_RESOURCE_QUERY,
                other.len()
            ))),
        }
    }

    fn description(&self) -> Option<String> {
        self.description.clone().filter(|d| !d.is_empty())
    }

    fn tags(&self) -> BTreeMap<String, String> {
        self.tags.clone().unwrap_or_default()
    }
}

#[async_trait]
impl Resource for GroupResource {
    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute(
                ATTR_NAME,
                Attribute::required_string()
                    .with_force_new()
                    .with_description("Name of the group"),
            )
            .with_attribute(ATTR_DESCRIPTION, Attribute::optional_string())
            .with_attribute(ATTR_ARN, Attribute::computed_string())
            .with_attribute(ATTR_TAGS, Attribute::optional_string_map())
            .with_block(
                ATTR_RESOURCE_QUERY,
                NestedBlock::set(
                    Block::new()
                        .with_attribute("query", Attribute::required_string())
                        .with_attribute(
                            "type",
                            Attribute::optional_string()
                                .with_default(json!(QUERY_TYPE_TAG_FILTERS_1_0))
                                .with_allowed_values(QUERY_TYPES.iter().copied()),
                        ),
                )
                .exactly_one(),
            )
    }

    #[instrument(skip_all, name = "resourcegroups.group.create")]
    async fn create(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.resource_groups()?;
        let config: GroupConfig = data.decode()?;

        let tags = config.tags();
        let input = CreateGroupInput {
            name: config.name.clone(),
            description: config.description(),
            resource_query: config.resource_query()?,
            tags: (!tags.is_empty()).then_some(tags),
        };
        let output = conn.create_group(&input).await?;
        let group = output.group.ok_or_else(|| empty_result(&input))?;

        info!(name = %group.name, "created resource group");
        data.set_id(group.name);

        self.read(data, client).await
    }

    #[instrument(skip_all, name = "resourcegroups.group.read")]
    async fn read(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.resource_groups()?;
        let name = data.require_id()?.to_string();
        debug!(%name, "reading resource group");

        let group = find_group_by_name(conn, &name).await?;
        data.set(ATTR_NAME, &group.name)?;
        data.set(
            ATTR_DESCRIPTION,
            group.description.as_deref().filter(|d| !d.is_empty()),
        )?;
        data.set(ATTR_ARN, &group.group_arn)?;

        let query = find_group_query_by_name(conn, &name).await?;
        data.set(
            ATTR_RESOURCE_QUERY,
            json!([{"query": query.query, "type": query.query_type}]),
        )?;

        let tags = conn.get_tags(&group.group_arn).await?.tags.unwrap_or_default();
        data.set(ATTR_TAGS, (!tags.is_empty()).then_some(tags))?;

        Ok(())
    }

    #[instrument(skip_all, name = "resourcegroups.group.update")]
    async fn update(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.resource_groups()?;
        let name = data.require_id()?.to_string();
        let config: GroupConfig = data.decode()?;

        if data.has_change(ATTR_DESCRIPTION) {
            debug!(%name, "updating description");
            conn.update_group(&UpdateGroupInput {
                group: name.clone(),
                description: config.description.clone().unwrap_or_default(),
            })
            .await?;
        }

        if data.has_change(ATTR_RESOURCE_QUERY) {
            debug!(%name, "updating resource query");
            conn.update_group_query(&UpdateGroupQueryInput {
                group: name.clone(),
                resource_query: config.resource_query()?,
            })
            .await?;
        }

        if data.has_change(ATTR_TAGS) {
            let arn = group_arn(data, conn, &name).await?;
            let old = prior_tags(data);
            update_tags(conn, &arn, &old, &config.tags()).await?;
        }

        self.read(data, client).await
    }

    #[instrument(skip_all, name = "resourcegroups.group.delete")]
    async fn delete(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.resource_groups()?;
        let name = data.require_id()?;
        info!(%name, "deleting resource group");

        conn.delete_group(&GroupInput::new(name)).await?;
        Ok(())
    }
}

async fn group_arn(
    data: &ResourceData,
    conn: &ResourceGroupsClient,
    name: &str,
) -> Result<String, ProviderError> {
    let (before, after) = data.get_change(ATTR_ARN);
    match after.or(before).and_then(Value::as_str) {
        Some(arn) if !arn.is_empty() => Ok(arn.to_string()),
        _ => Ok(find_group_by_name(conn, name).await?.group_arn),
    }
}

fn prior_tags(data: &ResourceData) -> BTreeMap<String, String> {
    data.get_change(ATTR_TAGS)
        .0
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

/// Keys to remove and entries to upsert to move from `old` to `new`.
fn tag_changes(
    old: &BTreeMap<String, String>,
    new: &BTreeMap<String, String>,
) -> (Vec<String>, BTreeMap<String, String>) {
    let removed = old
        .keys()
        .filter(|k| !new.contains_key(*k))
        .cloned()
        .collect();
    let upserted = new
        .iter()
        .filter(|(k, v)| old.get(*k) != Some(*v))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    (removed, upserted)
}

async fn update_tags(
    conn: &ResourceGroupsClient,
    arn: &str,
    old: &BTreeMap<String, String>,
    new: &BTreeMap<String, String>,
) -> Result<(), ProviderError> {
    let (removed, upserted) = tag_changes(old, new);
    if !removed.is_empty() {
        debug!(arn, count = removed.len(), "removing tags");
        conn.untag(arn, &removed).await?;
    }
    if !upserted.is_empty() {
        debug!(arn, count = upserted.len(), "tagging");
        conn.tag(arn, &upserted).await?;
    }
    Ok(())
}
