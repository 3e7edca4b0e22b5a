//! Service package descriptors and the registry built from them.
//!
//! Each service module exposes a [`ServicePackage`]: static lists of the
//! resource and data source factories it contributes, and a constructor for
//! its API client. [`Registry::new`] indexes every package once at startup
//! and rejects duplicate type names or malformed schemas there, rather than
//! on first use.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ProviderConfig;
use crate::conns::ServiceClient;
use crate::error::ProviderError;
use crate::resource::{DataSource, DataSourceFactory, Resource, ResourceFactory};
use crate::schema::{ProviderSchema, Schema};

/// One resource type a package contributes.
#[derive(Debug, Clone, Copy)]
pub struct ResourceRegistration {
    /// Builds the adapter.
    pub factory: ResourceFactory,
    /// The host-visible type name, e.g. `aws_cloudsearch_domain`.
    pub type_name: &'static str,
    /// Human-readable name, e.g. `Domain`.
    pub name: &'static str,
}

/// One data source type a package contributes.
#[derive(Debug, Clone, Copy)]
pub struct DataSourceRegistration {
    /// Builds the adapter.
    pub factory: DataSourceFactory,
    /// The host-visible type name.
    pub type_name: &'static str,
    /// Human-readable name.
    pub name: &'static str,
}

/// The registration table of one service module.
pub trait ServicePackage: Send + Sync {
    /// Data sources built on the newer adapter surface.
    fn framework_data_sources(&self) -> Vec<DataSourceRegistration>;

    /// Resources built on the newer adapter surface.
    fn framework_resources(&self) -> Vec<ResourceRegistration>;

    /// Data sources built on the classic adapter surface.
    fn sdk_data_sources(&self) -> Vec<DataSourceRegistration>;

    /// Resources built on the classic adapter surface.
    fn sdk_resources(&self) -> Vec<ResourceRegistration>;

    /// The service name, one of [`crate::names::SERVICES`].
    fn service_package_name(&self) -> &'static str;

    /// Build this service's API client.
    fn new_client(&self, config: &ProviderConfig) -> Result<ServiceClient, ProviderError>;
}

/// Which registration list an entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// `framework_*`
    Framework,
    /// `sdk_*`
    Sdk,
}

#[derive(Debug, Clone)]
struct ResourceEntry {
    service: &'static str,
    surface: Surface,
    registration: ResourceRegistration,
    schema: Schema,
}

#[derive(Debug, Clone)]
struct DataSourceEntry {
    service: &'static str,
    surface: Surface,
    registration: DataSourceRegistration,
    schema: Schema,
}

/// Every registered resource and data source, indexed by type name.
pub struct Registry {
    packages: Vec<Box<dyn ServicePackage>>,
    resources: BTreeMap<&'static str, ResourceEntry>,
    data_sources: BTreeMap<&'static str, DataSourceEntry>,
}

impl Registry {
    /// Index and validate the given packages.
    ///
    /// Fails on a duplicate service name, a type name registered twice, or a
    /// schema that does not pass [`Schema::internal_validate`].
    pub fn new(packages: Vec<Box<dyn ServicePackage>>) -> Result<Self, ProviderError> {
        let mut resources = BTreeMap::new();
        let mut data_sources = BTreeMap::new();
        let mut services: Vec<&'static str> = Vec::new();

        for package in &packages {
            let service = package.service_package_name();
            if services.contains(&service) {
                return Err(ProviderError::Configuration(format!(
                    "service package {} registered twice",
                    service
                )));
            }
            services.push(service);

            let resource_lists = [
                (Surface::Framework, package.framework_resources()),
                (Surface::Sdk, package.sdk_resources()),
            ];
            for (surface, registrations) in resource_lists {
                for registration in registrations {
                    let schema = (registration.factory)().schema();
                    check_schema(registration.type_name, &schema)?;
                    let entry = ResourceEntry {
                        service,
                        surface,
                        registration,
                        schema,
                    };
                    if resources.insert(registration.type_name, entry).is_some() {
                        return Err(duplicate(registration.type_name));
                    }
                }
            }

            let data_source_lists = [
                (Surface::Framework, package.framework_data_sources()),
                (Surface::Sdk, package.sdk_data_sources()),
            ];
            for (surface, registrations) in data_source_lists {
                for registration in registrations {
                    let schema = (registration.factory)().schema();
                    check_schema(registration.type_name, &schema)?;
                    let entry = DataSourceEntry {
                        service,
                        surface,
                        registration,
                        schema,
                    };
                    if data_sources.insert(registration.type_name, entry).is_some() {
                        return Err(duplicate(registration.type_name));
                    }
                }
            }

            debug!(service, "registered service package");
        }

        Ok(Self {
            packages,
            resources,
            data_sources,
        })
    }

    /// The registered packages, in registration order.
    pub fn packages(&self) -> &[Box<dyn ServicePackage>] {
        &self.packages
    }

    /// Build the adapter for a resource type.
    pub fn resource(&self, type_name: &str) -> Result<Box<dyn Resource>, ProviderError> {
        self.resources
            .get(type_name)
            .map(|entry| (entry.registration.factory)())
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_string()))
    }

    /// Build the adapter for a data source type.
    pub fn data_source(&self, type_name: &str) -> Result<Box<dyn DataSource>, ProviderError> {
        self.data_sources
            .get(type_name)
            .map(|entry| (entry.registration.factory)())
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_string()))
    }

    /// The validated schema of a resource type.
    pub fn resource_schema(&self, type_name: &str) -> Result<&Schema, ProviderError> {
        self.resources
            .get(type_name)
            .map(|entry| &entry.schema)
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_string()))
    }

    /// The validated schema of a data source type.
    pub fn data_source_schema(&self, type_name: &str) -> Result<&Schema, ProviderError> {
        self.data_sources
            .get(type_name)
            .map(|entry| &entry.schema)
            .ok_or_else(|| ProviderError::UnknownResource(type_name.to_string()))
    }

    /// The service and surface a resource type was registered under.
    pub fn resource_origin(&self, type_name: &str) -> Option<(&'static str, Surface)> {
        self.resources
            .get(type_name)
            .map(|entry| (entry.service, entry.surface))
    }

    /// The service and surface a data source type was registered under.
    pub fn data_source_origin(&self, type_name: &str) -> Option<(&'static str, Surface)> {
        self.data_sources
            .get(type_name)
            .map(|entry| (entry.service, entry.surface))
    }

    /// The human-readable name of a resource type.
    pub fn resource_name(&self, type_name: &str) -> Option<&'static str> {
        self.resources
            .get(type_name)
            .map(|entry| entry.registration.name)
    }

    /// The human-readable name of a data source type.
    pub fn data_source_name(&self, type_name: &str) -> Option<&'static str> {
        self.data_sources
            .get(type_name)
            .map(|entry| entry.registration.name)
    }

    /// Registered resource type names, sorted.
    pub fn resource_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    /// Registered data source type names, sorted.
    pub fn data_source_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.data_sources.keys().copied()
    }

    /// Assemble the provider schema from every registration.
    pub fn provider_schema(&self, provider_config: Schema) -> ProviderSchema {
        let schema = ProviderSchema::new().with_provider_config(provider_config);
        let schema = self
            .resources
            .iter()
            .fold(schema, |acc, (name, entry)| acc.with_resource(*name, entry.schema.clone()));
        self.data_sources
            .iter()
            .fold(schema, |acc, (name, entry)| acc.with_data_source(*name, entry.schema.clone()))
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .field("data_sources", &self.data_sources.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn check_schema(type_name: &str, schema: &Schema) -> Result<(), ProviderError> {
    schema.internal_validate().map_err(|reason| {
        ProviderError::Configuration(format!("invalid schema for {}: {}", type_name, reason))
    })
}

fn duplicate(type_name: &str) -> ProviderError {
    ProviderError::Configuration(format!("type name {} registered twice", type_name))
}
