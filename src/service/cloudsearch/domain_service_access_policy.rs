//! `aws_cloudsearch_domain_service_access_policy`

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::conns::AwsClient;
use crate::error::ProviderError;
use crate::resource::Resource;
use crate::schema::{Attribute, Schema};
use crate::types::ResourceData;

use super::api::{CloudSearchClient, UpdateServiceAccessPoliciesInput};
use super::find::find_service_access_policies_by_name;

const ATTR_DOMAIN_NAME: &str = "domain_name";
const ATTR_ACCESS_POLICY: &str = "access_policy";

/// Factory registered for `aws_cloudsearch_domain_service_access_policy`.
pub fn resource_domain_service_access_policy() -> Box<dyn Resource> {
    Box::new(DomainServiceAccessPolicyResource)
}

/// The IAM access policy attached to a CloudSearch domain's endpoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainServiceAccessPolicyResource;

#[derive(Debug, Deserialize)]
struct AccessPolicyConfig {
    domain_name: String,
    access_policy: String,
}

#[async_trait]
impl Resource for DomainServiceAccessPolicyResource {
    fn schema(&self) -> Schema {
        Schema::v0()
            .with_attribute(
                ATTR_DOMAIN_NAME,
                Attribute::required_string().with_force_new(),
            )
            .with_attribute(
                ATTR_ACCESS_POLICY,
                Attribute::required_string().with_description("IAM policy document, as JSON"),
            )
    }

    #[instrument(skip_all, name = "cloudsearch.domain_service_access_policy.create")]
    async fn create(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.cloudsearch()?;
        let config: AccessPolicyConfig = data.decode()?;
        check_policy_document(&config.access_policy)?;

        put_policy(conn, &config.domain_name, &config.access_policy).await?;
        info!(domain = %config.domain_name, "attached service access policy");
        data.set_id(config.domain_name);

        self.read(data, client).await
    }

    #[instrument(skip_all, name = "cloudsearch.domain_service_access_policy.read")]
    async fn read(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.cloudsearch()?;
        let domain = data.require_id()?.to_string();
        debug!(%domain, "reading service access policy");

        let policies = find_service_access_policies_by_name(conn, &domain).await?;
        let policy = match data.get_str(ATTR_ACCESS_POLICY) {
            Some(configured) if equivalent_policies(configured, &policies.options) => {
                configured.to_string()
            },
            _ => policies.options,
        };

        data.set(ATTR_DOMAIN_NAME, &domain)?;
        data.set(ATTR_ACCESS_POLICY, policy)?;
        Ok(())
    }

    #[instrument(skip_all, name = "cloudsearch.domain_service_access_policy.update")]
    async fn update(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.cloudsearch()?;
        let domain = data.require_id()?.to_string();
        let config: AccessPolicyConfig = data.decode()?;

        if data.has_change(ATTR_ACCESS_POLICY) {
            check_policy_document(&config.access_policy)?;
            put_policy(conn, &domain, &config.access_policy).await?;
        }

        self.read(data, client).await
    }

    #[instrument(skip_all, name = "cloudsearch.domain_service_access_policy.delete")]
    async fn delete(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError> {
        let conn = client.cloudsearch()?;
        let domain = data.require_id()?;
        info!(%domain, "removing service access policy");

        put_policy(conn, domain, "").await
    }
}

async fn put_policy(
    conn: &CloudSearchClient,
    domain: &str,
    policy: &str,
) -> Result<(), ProviderError> {
    conn.update_service_access_policies(&UpdateServiceAccessPoliciesInput {
        domain_name: domain.to_string(),
        access_policies: policy.to_string(),
    })
    .await?;
    Ok(())
}

fn check_policy_document(policy: &str) -> Result<(), ProviderError> {
    match serde_json::from_str::<Value>(policy) {
        Ok(Value::Object(_)) => Ok(()),
        Ok(_) => Err(ProviderError::Validation(format!(
            "{} must be a JSON object",
            ATTR_ACCESS_POLICY
        ))),
        Err(e) => Err(ProviderError::Validation(format!(
            "{} is not valid JSON: {}",
            ATTR_ACCESS_POLICY, e
        ))),
    }
}

/// Whether two policy documents are the same JSON, ignoring formatting and key order.
fn equivalent_policies(a: &str, b: &str) -> bool {
    match (serde_json::from_str::<Value>(a), serde_json::from_str::<Value>(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
