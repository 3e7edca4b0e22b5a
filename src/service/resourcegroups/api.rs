//! Resource Groups REST-JSON operations.

use std::collections::BTreeMap;

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::transport::JsonTransport;

/// Query type matching resources by tag filters.
pub const QUERY_TYPE_TAG_FILTERS_1_0: &str = "TAG_FILTERS_1_0";

/// Query types a group may be configured with.
pub const QUERY_TYPES: &[&str] = &[QUERY_TYPE_TAG_FILTERS_1_0];

/// The query that decides group membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuery {
    /// One of [`QUERY_TYPES`].
    #[serde(rename = "Type")]
    pub query_type: String,
    /// The query document, itself JSON.
    #[serde(rename = "Query")]
    pub query: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    pub group_arn: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupQuery {
    #[serde(default)]
    pub group_name: Option<String>,
    #[serde(default)]
    pub resource_query: Option<ResourceQuery>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateGroupInput {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub resource_query: ResourceQuery,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeMap<String, String>>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateGroupOutput {
    #[serde(default)]
    pub group: Option<Group>,
    #[serde(default)]
    pub resource_query: Option<ResourceQuery>,
    #[serde(default)]
    pub tags: Option<BTreeMap<String, String>>,
}

/// Input naming a group, shared by get, get-query and delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupInput {
    /// The group name or ARN.
    pub group: String,
}

impl GroupInput {
    /// Address the given group.
    pub fn new(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
        }
    }
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GroupOutput {
    #[serde(default)]
    pub group: Option<Group>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetGroupQueryOutput {
    #[serde(default)]
    pub group_query: Option<GroupQuery>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateGroupInput {
    pub group: String,
    pub description: String,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateGroupQueryInput {
    pub group: String,
    pub resource_query: ResourceQuery,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateGroupQueryOutput {
    #[serde(default)]
    pub group_query: Option<GroupQuery>,
}

#[allow(missing_docs)]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetTagsOutput {
    #[serde(default)]
    pub arn: Option<String>,
    #[serde(default)]
    pub tags: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct TagInput<'a> {
    tags: &'a BTreeMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct UntagInput<'a> {
    keys: &'a [String],
}

#[derive(Debug, Default, Deserialize)]
struct Ignored {}

/// Resource Groups API client.
#[derive(Debug, Clone)]
pub struct ResourceGroupsClient {
    transport: JsonTransport,
}

impl ResourceGroupsClient {
    /// Wrap a transport bound to the Resource Groups endpoint.
    pub fn new(transport: JsonTransport) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &JsonTransport {
        &self.transport
    }

    /// `CreateGroup`
    pub async fn create_group(&self, input: &CreateGroupInput) -> Result<CreateGroupOutput, ProviderError> {
        self.transport.rest(Method::POST, "/groups", Some(input)).await
    }

    /// `GetGroup`
    pub async fn get_group(&self, input: &GroupInput) -> Result<GroupOutput, ProviderError> {
        self.transport.rest(Method::POST, "/get-group", Some(input)).await
    }

    /// `GetGroupQuery`
    pub async fn get_group_query(&self, input: &GroupInput) -> Result<GetGroupQueryOutput, ProviderError> {
        self.transport
            .rest(Method::POST, "/get-group-query", Some(input))
            .await
    }

    /// `UpdateGroup`
    pub async fn update_group(&self, input: &UpdateGroupInput) -> Result<GroupOutput, ProviderError> {
        self.transport.rest(Method::POST, "/update-group", Some(input)).await
    }

    /// `UpdateGroupQuery`
    pub async fn update_group_query(
        &self,
        input: &UpdateGroupQueryInput,
    ) -> Result<UpdateGroupQueryOutput, ProviderError> {
        self.transport
            .rest(Method::POST, "/update-group-query", Some(input))
            .await
    }

    /// `DeleteGroup`
    pub async fn delete_group(&self, input: &GroupInput) -> Result<GroupOutput, ProviderError> {
        self.transport.rest(Method::POST, "/delete-group", Some(input)).await
    }

    /// `GetTags`
    pub async fn get_tags(&self, arn: &str) -> Result<GetTagsOutput, ProviderError> {
        self.transport
            .rest(Method::GET, &tags_path(arn), None::<&()>)
            .await
    }

    /// `Tag`: add or overwrite the given tags.
    pub async fn tag(&self, arn: &str, tags: &BTreeMap<String, String>) -> Result<(), ProviderError> {
        let _: Ignored = self
            .transport
            .rest(Method::PUT, &tags_path(arn), Some(&TagInput { tags }))
            .await?;
        Ok(())
    }

    /// `Untag`: remove the given tag keys.
    pub async fn untag(&self, arn: &str, keys: &[String]) -> Result<(), ProviderError> {
        let _: Ignored = self
            .transport
            .rest(Method::PATCH, &tags_path(arn), Some(&UntagInput { keys }))
            .await?;
        Ok(())
    }
}

fn tags_path(arn: &str) -> String {
    format!("/resources/{}/tags", urlencoding::encode(arn))
}
