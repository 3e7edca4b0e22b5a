//! Lifecycle traits implemented by every resource and data source adapter.
//!
//! An adapter declares its schema and implements the callbacks the host
//! drives. Callbacks receive the mutable [`ResourceData`] handle and the
//! shared [`AwsClient`]; remote errors are returned unchanged.

use async_trait::async_trait;

use crate::conns::AwsClient;
use crate::error::ProviderError;
use crate::schema::Schema;
use crate::types::ResourceData;

/// A managed resource type.
#[async_trait]
pub trait Resource: Send + Sync {
    /// The attribute schema of this resource type.
    fn schema(&self) -> Schema;

    /// Create the remote object, assign the ID, then refresh state.
    async fn create(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError>;

    /// Refresh state from the remote object identified by the ID.
    ///
    /// Returns a not-found error when the object is gone.
    async fn read(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError>;

    /// Push changed fields to the remote object, then refresh state.
    async fn update(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError>;

    /// Delete the remote object identified by the ID.
    async fn delete(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError>;

    /// Turn an import ID into the handles the host reads afterwards.
    ///
    /// Defaults to [`import_passthrough`].
    fn import(&self, id: &str) -> Result<Vec<ResourceData>, ProviderError> {
        import_passthrough(id)
    }
}

/// A read-only data source type.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// The attribute schema of this data source type.
    fn schema(&self) -> Schema;

    /// Look up the remote object described by the configuration.
    async fn read(&self, data: &mut ResourceData, client: &AwsClient) -> Result<(), ProviderError>;
}

/// Builds a fresh resource adapter.
pub type ResourceFactory = fn() -> Box<dyn Resource>;

/// Builds a fresh data source adapter.
pub type DataSourceFactory = fn() -> Box<dyn DataSource>;

/// Use the supplied ID verbatim as the instance ID.
pub fn import_passthrough(id: &str) -> Result<Vec<ResourceData>, ProviderError> {
    if id.is_empty() {
        return Err(ProviderError::Validation("import ID must not be empty".to_string()));
    }
    Ok(vec![ResourceData::from_id(id)])
}
