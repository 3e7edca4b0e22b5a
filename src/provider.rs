//! The host-facing provider surface.
//!
//! [`ProviderService`] is the callback interface a host drives: schema and
//! metadata queries, provider configuration, and per-resource lifecycle
//! calls exchanging JSON state. [`AwsProvider`] implements it by looking up
//! the adapter for each type name in the [`Registry`], validating the
//! incoming state against the adapter's schema, and handing a
//! [`ResourceData`] plus the configured [`AwsClient`] to the adapter.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, error, info, instrument, warn};

use crate::config::{provider_config_schema, ProviderConfig};
use crate::conns::AwsClient;
use crate::error::ProviderError;
use crate::registry::{Registry, ServicePackage};
use crate::schema::{Diagnostic, ProviderSchema, Schema};
use crate::service::service_packages;
use crate::types::{ImportedResource, ProviderMetadata, ResourceData};
use crate::validation::{apply_defaults, validate};

/// Callbacks a host invokes on a provider.
///
/// # Example
///
/// ```ignore
/// use hemmer_provider_aws::{AwsProvider, ProviderService};
/// use serde_json::json;
///
/// let provider = AwsProvider::new()?;
/// provider.configure(json!({"region": "us-east-1"})).await?;
/// let state = provider
///     .create("aws_resourcegroups_group", json!({
///         "name": "g1",
///         "resource_query": [{"query": "{\"ResourceTypeFilters\":[\"AWS::AllSupported\"],\"TagFilters\":[]}"}]
///     }))
///     .await?;
/// ```
#[async_trait]
pub trait ProviderService: Send + Sync + 'static {
    // =========================================================================
    // Schema & Metadata
    // =========================================================================

    /// Return the provider's schema including all resources and data sources.
    fn schema(&self) -> ProviderSchema;

    /// Return the type names the host may request.
    /// By default, this is derived from the schema.
    fn metadata(&self) -> ProviderMetadata {
        let schema = self.schema();
        ProviderMetadata {
            resources: schema.resources.keys().cloned().collect(),
            data_sources: schema.data_sources.keys().cloned().collect(),
        }
    }

    // =========================================================================
    // Provider Lifecycle
    // =========================================================================

    /// Validate the provider configuration before configuring.
    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = config;
        Ok(vec![])
    }

    /// Configure the provider with credentials and settings.
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError>;

    /// Stop the provider gracefully.
    async fn stop(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Validate a resource's configuration.
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = (resource_type, config);
        Ok(vec![])
    }

    /// Create a new resource, returning its state.
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError>;

    /// Refresh a resource. `None` means the resource no longer exists.
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Option<Value>, ProviderError>;

    /// Update an existing resource, returning its new state.
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError>;

    /// Delete a resource.
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError>;

    /// Import existing infrastructure into management.
    async fn import_resource(
        &self,
        resource_type: &str,
        _id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        Err(ProviderError::Unimplemented(format!(
            "Import not supported for resource type: {}",
            resource_type
        )))
    }

    // =========================================================================
    // Data Source Operations
    // =========================================================================

    /// Validate a data source's configuration.
    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let _ = (data_source_type, config);
        Ok(vec![])
    }

    /// Read data from an external source.
    async fn read_data_source(&self, data_source_type: &str, _config: Value) -> Result<Value, ProviderError> {
        Err(ProviderError::UnknownResource(data_source_type.to_string()))
    }
}

/// The AWS provider: dispatches host callbacks to registered adapters.
pub struct AwsProvider {
    registry: Registry,
    client: RwLock<Option<Arc<AwsClient>>>,
}

impl AwsProvider {
    /// A provider serving every built-in service package.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_packages(service_packages())
    }

    /// A provider serving only the given packages.
    pub fn with_packages(packages: Vec<Box<dyn ServicePackage>>) -> Result<Self, ProviderError> {
        let registry = Registry::new(packages)?;
        info!(
            resources = registry.resource_types().count(),
            data_sources = registry.data_source_types().count(),
            "provider registry ready"
        );
        Ok(Self {
            registry,
            client: RwLock::new(None),
        })
    }

    /// The registry backing this provider.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    async fn client(&self) -> Result<Arc<AwsClient>, ProviderError> {
        self.client.read().await.clone().ok_or_else(|| {
            ProviderError::Configuration("provider has not been configured".to_string())
        })
    }
}

impl std::fmt::Debug for AwsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsProvider")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

/// Apply defaults and validate, failing with every error diagnostic joined.
fn prepare(schema: &Schema, mut value: Value) -> Result<Value, ProviderError> {
    if value.is_null() {
        value = Value::Object(Default::default());
    }
    apply_defaults(schema, &mut value);
    let errors: Vec<_> = validate(schema, &value)
        .into_iter()
        .filter(Diagnostic::is_error)
        .map(|d| match d.detail {
            Some(detail) => format!("{}: {}", d.summary, detail),
            None => d.summary,
        })
        .collect();
    if errors.is_empty() {
        Ok(value)
    } else {
        Err(ProviderError::Validation(errors.join("; ")))
    }
}

fn diagnostics_for(schema: &Schema, mut config: Value) -> Vec<Diagnostic> {
    if config.is_null() {
        config = Value::Object(Default::default());
    }
    apply_defaults(schema, &mut config);
    validate(schema, &config)
}

#[async_trait]
impl ProviderService for AwsProvider {
    fn schema(&self) -> ProviderSchema {
        self.registry.provider_schema(provider_config_schema())
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            resources: self.registry.resource_types().map(str::to_string).collect(),
            data_sources: self
                .registry
                .data_source_types()
                .map(str::to_string)
                .collect(),
        }
    }

    #[instrument(skip_all, name = "provider.validate_provider_config")]
    async fn validate_provider_config(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let mut diagnostics = diagnostics_for(&provider_config_schema(), config.clone());
        if diagnostics.is_empty() {
            if let Err(e) = ProviderConfig::from_value(config) {
                diagnostics.push(Diagnostic::error("Invalid provider configuration").with_detail(e.message()));
            }
        }
        Ok(diagnostics)
    }

    #[instrument(skip_all, name = "provider.configure")]
    async fn configure(&self, config: Value) -> Result<Vec<Diagnostic>, ProviderError> {
        let config = match ProviderConfig::from_value(config) {
            Ok(config) => config,
            Err(e) => {
                error!(error = %e, "invalid provider configuration");
                return Ok(vec![
                    Diagnostic::error("Invalid provider configuration").with_detail(e.message())
                ]);
            },
        };

        let client = AwsClient::new(&config, self.registry.packages())?;
        *self.client.write().await = Some(Arc::new(client));
        info!(region = %config.region, "provider configured");
        Ok(vec![])
    }

    #[instrument(skip_all, name = "provider.stop")]
    async fn stop(&self) -> Result<(), ProviderError> {
        self.client.write().await.take();
        info!("provider stopped");
        Ok(())
    }

    #[instrument(skip(self, config), name = "provider.validate_resource_config")]
    async fn validate_resource_config(
        &self,
        resource_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let schema = self.registry.resource_schema(resource_type)?;
        Ok(diagnostics_for(schema, config))
    }

    #[instrument(skip(self, planned_state), name = "provider.create")]
    async fn create(&self, resource_type: &str, planned_state: Value) -> Result<Value, ProviderError> {
        let resource = self.registry.resource(resource_type)?;
        let planned = prepare(self.registry.resource_schema(resource_type)?, planned_state)?;
        let client = self.client().await?;

        let mut data = ResourceData::new(planned);
        data.clear_id();
        match resource.create(&mut data, &client).await {
            Ok(()) => {
                info!(id = ?data.id(), "create completed");
                Ok(data.into_state())
            },
            Err(e) => {
                error!(error = %e, "create failed");
                Err(e)
            },
        }
    }

    #[instrument(skip(self, current_state), name = "provider.read")]
    async fn read(&self, resource_type: &str, current_state: Value) -> Result<Option<Value>, ProviderError> {
        let resource = self.registry.resource(resource_type)?;
        let client = self.client().await?;

        let mut data = ResourceData::new(current_state);
        match resource.read(&mut data, &client).await {
            Ok(()) if data.id().is_some() => Ok(Some(data.into_state())),
            Ok(()) => Ok(None),
            Err(e) if e.is_not_found() => {
                warn!(id = ?data.id(), error = %e, "resource not found, removing from state");
                data.clear_id();
                Ok(None)
            },
            Err(e) => {
                error!(id = ?data.id(), error = %e, "read failed");
                Err(e)
            },
        }
    }

    #[instrument(skip(self, prior_state, planned_state), name = "provider.update")]
    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        let resource = self.registry.resource(resource_type)?;
        let schema = self.registry.resource_schema(resource_type)?;
        let planned = prepare(schema, planned_state)?;
        let client = self.client().await?;

        let mut data = ResourceData::for_update(prior_state, planned);
        if let Some(path) = schema
            .force_new_paths()
            .into_iter()
            .find(|path| data.has_change(path))
        {
            return Err(ProviderError::Validation(format!(
                "changing {} requires replacing the resource",
                path
            )));
        }

        match resource.update(&mut data, &client).await {
            Ok(()) => {
                info!(id = ?data.id(), "update completed");
                Ok(data.into_state())
            },
            Err(e) => {
                error!(id = ?data.id(), error = %e, "update failed");
                Err(e)
            },
        }
    }

    #[instrument(skip(self, current_state), name = "provider.delete")]
    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        let resource = self.registry.resource(resource_type)?;
        let client = self.client().await?;

        let mut data = ResourceData::new(current_state);
        match resource.delete(&mut data, &client).await {
            Ok(()) => {
                info!(id = ?data.id(), "delete completed");
                Ok(())
            },
            Err(e) => {
                error!(id = ?data.id(), error = %e, "delete failed");
                Err(e)
            },
        }
    }

    #[instrument(skip(self), name = "provider.import_resource")]
    async fn import_resource(
        &self,
        resource_type: &str,
        id: &str,
    ) -> Result<Vec<ImportedResource>, ProviderError> {
        let resource = self.registry.resource(resource_type)?;
        let imported = resource
            .import(id)?
            .into_iter()
            .map(|data| ImportedResource::new(resource_type, data.into_state()))
            .collect();
        debug!("import completed");
        Ok(imported)
    }

    #[instrument(skip(self, config), name = "provider.validate_data_source_config")]
    async fn validate_data_source_config(
        &self,
        data_source_type: &str,
        config: Value,
    ) -> Result<Vec<Diagnostic>, ProviderError> {
        let schema = self.registry.data_source_schema(data_source_type)?;
        Ok(diagnostics_for(schema, config))
    }

    #[instrument(skip(self, config), name = "provider.read_data_source")]
    async fn read_data_source(&self, data_source_type: &str, config: Value) -> Result<Value, ProviderError> {
        let data_source = self.registry.data_source(data_source_type)?;
        let config = prepare(self.registry.data_source_schema(data_source_type)?, config)?;
        let client = self.client().await?;

        let mut data = ResourceData::new(config);
        match data_source.read(&mut data, &client).await {
            Ok(()) => Ok(data.into_state()),
            Err(e) => {
                error!(error = %e, "data source read failed");
                Err(e)
            },
        }
    }
}
