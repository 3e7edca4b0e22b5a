//! Hemmer AWS Provider
//!
//! AWS resource adapters for Hemmer: a registry of per-service packages, each
//! contributing resource and data source types with a declarative schema and
//! lifecycle callbacks that reconcile desired state against the remote APIs.
//!
//! # Overview
//!
//! - **Provider**: [`AwsProvider`] implements [`ProviderService`], the
//!   callback interface a host drives (schema, configure, CRUD, import,
//!   data source reads)
//! - **Registry**: [`Registry`] collects every [`ServicePackage`] and is
//!   validated once at startup
//! - **Services**: Resource Groups (`aws_resourcegroups_group`),
//!   CloudFront (`aws_cloudfront_response_headers_policy` data source) and
//!   CloudSearch (`aws_cloudsearch_domain`,
//!   `aws_cloudsearch_domain_service_access_policy`)
//! - **Errors**: [`ProviderError`] with a typed not-found signal that makes
//!   read remove a resource from state
//! - **Logging**: `tracing` spans around every lifecycle callback
//!
//! # Quick Start
//!
//! ```ignore
//! use hemmer_provider_aws::{AwsProvider, ProviderService};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     hemmer_provider_aws::init_logging();
//!
//!     let provider = AwsProvider::new()?;
//!     provider.configure(json!({"region": "us-west-2"})).await?;
//!
//!     let state = provider
//!         .create("aws_cloudsearch_domain", json!({"name": "search-1", "multi_az": true}))
//!         .await?;
//!     println!("{}", state["arn"]);
//!     Ok(())
//! }
//! ```
//!
//! # Lifecycle Semantics
//!
//! - **Create** sets the resource id only once the remote object exists and
//!   finishes with a read so computed attributes are populated
//! - **Read** returns `None` when the remote object is gone; the host drops
//!   it from state and plans a re-create
//! - **Update** sends only the attributes that changed
//! - **Delete** errors are returned unchanged

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod conns;
pub mod endpoints;
pub mod error;
pub mod logging;
pub mod names;
pub mod provider;
pub mod registry;
pub mod resource;
pub mod schema;
pub mod service;
pub mod testing;
pub mod transport;
pub mod types;
pub mod validation;

// Re-export main types at crate root
pub use config::ProviderConfig;
pub use conns::AwsClient;
pub use error::{ApiError, ErrorKind, NotFoundError, ProviderError};
pub use logging::{init_logging, init_logging_with_default, try_init_logging};
pub use provider::{AwsProvider, ProviderService};
pub use registry::{Registry, ServicePackage};
pub use resource::{DataSource, Resource};
pub use schema::ProviderSchema;
pub use types::{ImportedResource, ProviderMetadata, ResourceData};
pub use validation::{is_valid, validate, validate_result};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

// Re-export commonly used external types
pub use serde_json;
pub use tracing;
