//! End-to-end lifecycles through the provider surface against mocked APIs.

use hemmer_provider_aws::testing::{ProviderTester, TestError};
use hemmer_provider_aws::{try_init_logging, AwsProvider};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARN: &str = "arn:aws:resource-groups:us-east-1:123456789012:group/g1";
const QUERY: &str = r#"{"ResourceTypeFilters":["AWS::AllSupported"],"TagFilters":[{"Key":"Env","Values":["prod"]}]}"#;

async fn tester(service: &str, server: &MockServer) -> ProviderTester<AwsProvider> {
    try_init_logging();
    let tester = ProviderTester::new(AwsProvider::new().unwrap());
    tester
        .configure(json!({
            "region": "us-east-1",
            "max_retries": 0,
            "endpoints": {service: server.uri()}
        }))
        .await
        .unwrap();
    tester
}

async fn mount_group_read(server: &MockServer, description: Option<&str>) {
    let mut group = json!({"GroupArn": ARN, "Name": "g1"});
    if let Some(description) = description {
        group["Description"] = json!(description);
    }
    Mock::given(method("POST"))
        .and(path("/get-group"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Group": group})))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/get-group-query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "GroupQuery": {
                "GroupName": "g1",
                "ResourceQuery": {"Type": "TAG_FILTERS_1_0", "Query": QUERY}
            }
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/resources/.+/tags$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"Arn": ARN, "Tags": {}})))
        .mount(server)
        .await;
}

fn group_config(description: &str) -> Value {
    json!({
        "name": "g1",
        "description": description,
        "resource_query": [{"query": QUERY}]
    })
}

#[tokio::test]
async fn test_group_create_fills_computed_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/groups"))
        .and(body_json(json!({
            "Name": "g1",
            "Description": "prod",
            "ResourceQuery": {"Type": "TAG_FILTERS_1_0", "Query": QUERY}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Group": {"GroupArn": ARN, "Name": "g1", "Description": "prod"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    mount_group_read(&server, Some("prod")).await;

    let tester = tester("resourcegroups", &server).await;
    let state = tester
        .lifecycle_create("aws_resourcegroups_group", group_config("prod"))
        .await
        .unwrap();

    assert_eq!(state["id"], "g1");
    assert_eq!(state["arn"], ARN);
    assert_eq!(state["resource_query"][0]["type"], "TAG_FILTERS_1_0");
}

#[tokio::test]
async fn test_group_update_then_delete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/update-group"))
        .and(body_json(json!({"Group": "g1", "Description": "staging"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Group": {"GroupArn": ARN, "Name": "g1", "Description": "staging"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/update-group-query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/delete-group"))
        .and(body_json(json!({"Group": "g1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    mount_group_read(&server, Some("staging")).await;

    let tester = tester("resourcegroups", &server).await;
    let mut prior = group_config("prod");
    prior["id"] = json!("g1");
    prior["arn"] = json!(ARN);
    prior["resource_query"][0]["type"] = json!("TAG_FILTERS_1_0");

    let updated = tester
        .lifecycle_update("aws_resourcegroups_group", prior, group_config("staging"))
        .await
        .unwrap();
    assert_eq!(updated["description"], "staging");

    tester
        .lifecycle_delete("aws_resourcegroups_group", updated)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_group_deleted_out_of_band_leaves_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get-group"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("x-amzn-ErrorType", "NotFoundException")
                .set_body_json(json!({"Message": "Cannot find group g1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tester = tester("resourcegroups", &server).await;
    let gone = tester
        .read("aws_resourcegroups_group", json!({"id": "g1", "name": "g1"}))
        .await
        .unwrap();
    assert_eq!(gone, None);
}

#[tokio::test]
async fn test_group_create_rejects_two_queries_before_any_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let tester = tester("resourcegroups", &server).await;
    let err = tester
        .lifecycle_create(
            "aws_resourcegroups_group",
            json!({
                "name": "g1",
                "resource_query": [{"query": QUERY}, {"query": QUERY}]
            }),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TestError::Diagnostics(_)));
}

#[tokio::test]
async fn test_cloudsearch_domain_create() {
    let server = MockServer::start().await;
    let status = json!({
        "DomainId": "123456789012/search-1",
        "DomainName": "search-1",
        "ARN": "arn:aws:cloudsearch:us-east-1:123456789012:domain/search-1",
        "Created": true,
        "Deleted": false,
        "Processing": true,
        "DocService": {"Endpoint": "doc-search-1.us-east-1.cloudsearch.amazonaws.com"},
        "SearchService": {"Endpoint": "search-search-1.us-east-1.cloudsearch.amazonaws.com"}
    });
    Mock::given(method("POST"))
        .and(header("x-amz-target", "CloudSearch.CreateDomain"))
        .and(body_json(json!({"DomainName": "search-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"DomainStatus": status})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header("x-amz-target", "CloudSearch.UpdateAvailabilityOptions"))
        .and(body_json(json!({"DomainName": "search-1", "MultiAZ": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AvailabilityOptions": {"Options": true, "Status": {"State": "Processing"}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header("x-amz-target", "CloudSearch.DescribeDomains"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"DomainStatusList": [status]})),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header("x-amz-target", "CloudSearch.DescribeAvailabilityOptions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "AvailabilityOptions": {"Options": true, "Status": {"State": "Active"}}
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(header("x-amz-target", "CloudSearch.DescribeScalingParameters"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ScalingParameters": {"Options": {}, "Status": {"State": "Active"}}
        })))
        .mount(&server)
        .await;

    let tester = tester("cloudsearch", &server).await;
    let state = tester
        .lifecycle_create("aws_cloudsearch_domain", json!({"name": "search-1", "multi_az": true}))
        .await
        .unwrap();

    assert_eq!(state["id"], "search-1");
    assert_eq!(state["domain_id"], "123456789012/search-1");
    assert_eq!(state["multi_az"], true);
}

#[tokio::test]
async fn test_response_headers_policy_data_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2020-05-31/response-headers-policy/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ResponseHeadersPolicy": {
                "Id": "p1",
                "ResponseHeadersPolicyConfig": {"Name": "security-headers"}
            },
            "ETag": "E2QWRUHAPOMQZL"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tester = tester("cloudfront", &server).await;
    tester
        .validate_data_source_config("aws_cloudfront_response_headers_policy", json!({"id": "p1"}))
        .await
        .unwrap();
    let state = tester
        .read_data_source("aws_cloudfront_response_headers_policy", json!({"id": "p1"}))
        .await
        .unwrap();

    assert_eq!(state["id"], "p1");
    assert_eq!(state["name"], "security-headers");
    assert_eq!(state["etag"], "E2QWRUHAPOMQZL");
}

#[tokio::test]
async fn test_stopped_provider_refuses_calls() {
    let server = MockServer::start().await;
    let tester = tester("cloudsearch", &server).await;
    tester.stop().await.unwrap();

    let err = tester
        .read("aws_cloudsearch_domain", json!({"id": "search-1"}))
        .await
        .unwrap_err();
    assert!(!err.is_not_found());
}
