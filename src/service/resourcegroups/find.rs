//! Lookup helpers for Resource Groups.

use crate::error::{empty_result, not_found_or, ProviderError};

use super::api::{Group, GroupInput, ResourceGroupsClient, ResourceQuery};

/// Fetch a group by name.
///
/// `NotFoundException` becomes a not-found error; a response without a
/// group is an empty result.
pub async fn find_group_by_name(
    conn: &ResourceGroupsClient,
    name: &str,
) -> Result<Group, ProviderError> {
    let input = GroupInput::new(name);
    let output = conn
        .get_group(&input)
        .await
        .map_err(|e| not_found_or(e, &input))?;
    output.group.ok_or_else(|| empty_result(&input))
}

/// Fetch the resource query of a group by name.
pub async fn find_group_query_by_name(
    conn: &ResourceGroupsClient,
    name: &str,
) -> Result<ResourceQuery, ProviderError> {
    let input = GroupInput::new(name);
    let output = conn
        .get_group_query(&input)
        .await
        .map_err(|e| not_found_or(e, &input))?;
    output
        .group_query
        .and_then(|q| q.resource_query)
        .ok_or_else(|| empty_result(&input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;
    use crate::transport::JsonTransport;
    use serde_json::json;
    use url::Url;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> ResourceGroupsClient {
        let config = ProviderConfig::new("us-east-1").with_max_retries(0);
        let endpoint = Url::parse(&server.uri()).unwrap();
        ResourceGroupsClient::new(JsonTransport::new("resourcegroups", endpoint, &config).unwrap())
    }

    #[tokio::test]
    async fn test_find_group_by_name() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-group"))
            .and(body_json(json!({"Group": "g1"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Group": {"GroupArn": "arn:aws:resource-groups:us-east-1:123:group/g1", "Name": "g1"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let group = find_group_by_name(&client(&server), "g1").await.unwrap();
        assert_eq!(group.name, "g1");
        assert_eq!(group.description, None);
    }

    #[tokio::test]
    async fn test_find_group_by_name_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-group"))
            .respond_with(
                ResponseTemplate::new(404)
                    .insert_header("x-amzn-ErrorType", "NotFoundException")
                    .set_body_json(json!({"Message": "group g1 not found"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let err = find_group_by_name(&client(&server), "g1").await.unwrap_err();
        match err {
            ProviderError::NotFound(nf) => {
                assert_eq!(nf.last_request, json!({"Group": "g1"}));
                assert_eq!(nf.last_error.unwrap().code, "NotFoundException");
            },
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_find_group_by_name_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-group"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = find_group_by_name(&client(&server), "g1").await.unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResult(_)));
    }

    #[tokio::test]
    async fn test_find_group_query_by_name_passes_other_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/get-group-query"))
            .respond_with(
                ResponseTemplate::new(403)
                    .insert_header("x-amzn-ErrorType", "ForbiddenException")
                    .set_body_json(json!({"Message": "denied"})),
            )
            .mount(&server)
            .await;

        let err = find_group_query_by_name(&client(&server), "g1").await.unwrap_err();
        assert!(!err.is_not_found());
        assert_eq!(err.api_error().unwrap().code, "ForbiddenException");
    }
}
