//! Schema types for describing provider and resource structure.
//!
//! Every resource adapter declares a [`Schema`]. The host validates user
//! configuration against it (see [`crate::validation`]) before any lifecycle
//! callback runs, so adapters can rely on its constraints.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The type of an attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    /// A string value.
    String,
    /// A 64-bit integer.
    Int64,
    /// A 64-bit floating point number.
    Float64,
    /// A boolean value.
    Bool,
    /// A list of values of a single type.
    List(Box<AttributeType>),
    /// A set of unique values of a single type.
    Set(Box<AttributeType>),
    /// A map from string keys to values of a single type.
    Map(Box<AttributeType>),
}

impl AttributeType {
    /// Create a list type.
    pub fn list(element_type: AttributeType) -> Self {
        Self::List(Box::new(element_type))
    }

    /// Create a set type.
    pub fn set(element_type: AttributeType) -> Self {
        Self::Set(Box::new(element_type))
    }

    /// Create a map type.
    pub fn map(element_type: AttributeType) -> Self {
        Self::Map(Box::new(element_type))
    }
}

/// Describes how an attribute can be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AttributeFlags {
    /// The attribute is required in configuration.
    pub required: bool,
    /// The attribute is optional in configuration.
    pub optional: bool,
    /// The attribute is computed by the provider (read-only).
    pub computed: bool,
    /// The attribute is sensitive and should be hidden in logs/UI.
    pub sensitive: bool,
}

impl AttributeFlags {
    /// Create flags for a required attribute.
    pub fn required() -> Self {
        Self {
            required: true,
            ..Default::default()
        }
    }

    /// Create flags for an optional attribute.
    pub fn optional() -> Self {
        Self {
            optional: true,
            ..Default::default()
        }
    }

    /// Create flags for a computed attribute (read-only, set by provider).
    pub fn computed() -> Self {
        Self {
            computed: true,
            ..Default::default()
        }
    }

    /// Whether the attribute is only ever set by the provider.
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

/// Describes a single attribute in a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    /// The type of the attribute.
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    /// Flags describing how the attribute can be used.
    #[serde(flatten)]
    pub flags: AttributeFlags,
    /// Human-readable description of the attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// If set, changing this attribute forces resource replacement.
    #[serde(default)]
    pub force_new: bool,
    /// Default value applied when configuration leaves the attribute unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// If non-empty, string values must be one of these.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<String>,
}

impl Attribute {
    /// Create a new attribute with the given type and flags.
    pub fn new(attr_type: AttributeType, flags: AttributeFlags) -> Self {
        Self {
            attr_type,
            flags,
            description: None,
            force_new: false,
            default: None,
            allowed_values: Vec::new(),
        }
    }

    /// Create a required string attribute.
    pub fn required_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::required())
    }

    /// Create an optional string attribute.
    pub fn optional_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::optional())
    }

    /// Create a computed string attribute.
    pub fn computed_string() -> Self {
        Self::new(AttributeType::String, AttributeFlags::computed())
    }

    /// Create an optional int64 attribute.
    pub fn optional_int64() -> Self {
        Self::new(AttributeType::Int64, AttributeFlags::optional())
    }

    /// Create a computed float64 attribute.
    pub fn computed_float64() -> Self {
        Self::new(AttributeType::Float64, AttributeFlags::computed())
    }

    /// Create an optional bool attribute.
    pub fn optional_bool() -> Self {
        Self::new(AttributeType::Bool, AttributeFlags::optional())
    }

    /// Create a computed bool attribute.
    pub fn computed_bool() -> Self {
        Self::new(AttributeType::Bool, AttributeFlags::computed())
    }

    /// Create an optional map-of-strings attribute (tags and the like).
    pub fn optional_string_map() -> Self {
        Self::new(
            AttributeType::map(AttributeType::String),
            AttributeFlags::optional(),
        )
    }

    /// Set the description for this attribute.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark this attribute as forcing resource replacement when changed.
    pub fn with_force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Set a default value for this attribute.
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Restrict string values to the given set.
    pub fn with_allowed_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Mark this attribute as sensitive.
    pub fn sensitive(mut self) -> Self {
        self.flags.sensitive = true;
        self
    }
}

/// The nesting mode for a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlockNestingMode {
    /// A list of nested blocks (ordered).
    #[default]
    List,
    /// A set of nested blocks (unordered, unique).
    Set,
}

/// A nested block within a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Block {
    /// The attributes within this block.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Attribute>,
    /// Nested blocks within this block.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub blocks: BTreeMap<String, NestedBlock>,
    /// Human-readable description of the block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Block {
    /// Create a new empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute to this block.
    pub fn with_attribute(mut self, name: impl Into<String>, attr: Attribute) -> Self {
        self.attributes.insert(name.into(), attr);
        self
    }

    /// Add a nested block to this block.
    pub fn with_block(mut self, name: impl Into<String>, block: NestedBlock) -> Self {
        self.blocks.insert(name.into(), block);
        self
    }

    /// Set the description for this block.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A nested block with its nesting mode and cardinality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedBlock {
    /// The block definition.
    #[serde(flatten)]
    pub block: Block,
    /// How the block is nested.
    #[serde(default)]
    pub nesting_mode: BlockNestingMode,
    /// Minimum number of blocks required.
    #[serde(default)]
    pub min_items: u32,
    /// Maximum number of blocks allowed (0 = unlimited).
    #[serde(default)]
    pub max_items: u32,
    /// If set, changing this block forces resource replacement.
    #[serde(default)]
    pub force_new: bool,
    /// The block is populated by the provider only.
    #[serde(default)]
    pub computed: bool,
}

impl NestedBlock {
    /// Create a list of nested blocks.
    pub fn list(block: Block) -> Self {
        Self {
            block,
            nesting_mode: BlockNestingMode::List,
            min_items: 0,
            max_items: 0,
            force_new: false,
            computed: false,
        }
    }

    /// Create a set of nested blocks.
    pub fn set(block: Block) -> Self {
        Self {
            nesting_mode: BlockNestingMode::Set,
            ..Self::list(block)
        }
    }

    /// Create a block that must appear exactly once.
    pub fn exactly_one(self) -> Self {
        self.with_min_items(1).with_max_items(1)
    }

    /// Set the minimum number of blocks required.
    pub fn with_min_items(mut self, min: u32) -> Self {
        self.min_items = min;
        self
    }

    /// Set the maximum number of blocks allowed.
    pub fn with_max_items(mut self, max: u32) -> Self {
        self.max_items = max;
        self
    }

    /// Mark the block as populated by the provider only.
    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }
}

/// Schema for a resource or data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// The version of this schema (for state upgrades).
    #[serde(default)]
    pub version: u64,
    /// The root block containing all attributes and nested blocks.
    #[serde(flatten)]
    pub block: Block,
}

impl Schema {
    /// Create a new schema with the given version.
    pub fn new(version: u64) -> Self {
        Self {
            version,
            block: Block::new(),
        }
    }

    /// Create a schema at version 0.
    pub fn v0() -> Self {
        Self::new(0)
    }

    /// Add an attribute to the schema.
    pub fn with_attribute(mut self, name: impl Into<String>, attr: Attribute) -> Self {
        self.block.attributes.insert(name.into(), attr);
        self
    }

    /// Add a nested block to the schema.
    pub fn with_block(mut self, name: impl Into<String>, block: NestedBlock) -> Self {
        self.block.blocks.insert(name.into(), block);
        self
    }

    /// Top-level attribute and block names that force replacement when changed.
    pub fn force_new_paths(&self) -> Vec<&str> {
        let attrs = self
            .block
            .attributes
            .iter()
            .filter(|(_, a)| a.force_new)
            .map(|(n, _)| n.as_str());
        let blocks = self
            .block
            .blocks
            .iter()
            .filter(|(_, b)| b.force_new)
            .map(|(n, _)| n.as_str());
        attrs.chain(blocks).collect()
    }

    /// Check the schema for declarations that can never be satisfied.
    ///
    /// Run once per schema when the registry is built.
    pub fn internal_validate(&self) -> Result<(), String> {
        check_block(&self.block, "")
    }
}

fn check_block(block: &Block, path: &str) -> Result<(), String> {
    for (name, attr) in &block.attributes {
        let attr_path = if path.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", path, name)
        };
        let flags = attr.flags;
        if !flags.required && !flags.optional && !flags.computed {
            return Err(format!(
                "{}: one of required, optional or computed must be set",
                attr_path
            ));
        }
        if flags.required && (flags.optional || flags.computed) {
            return Err(format!(
                "{}: required cannot be combined with optional or computed",
                attr_path
            ));
        }
        if attr.default.is_some() && (flags.required || flags.computed) {
            return Err(format!(
                "{}: default is only allowed on optional attributes",
                attr_path
            ));
        }
        if flags.is_computed_only() && attr.force_new {
            return Err(format!("{}: computed-only attributes cannot force new", attr_path));
        }
        if !attr.allowed_values.is_empty() && attr.attr_type != AttributeType::String {
            return Err(format!("{}: allowed values require a string type", attr_path));
        }
        if let (Some(serde_json::Value::String(d)), false) =
            (&attr.default, attr.allowed_values.is_empty())
        {
            if !attr.allowed_values.contains(d) {
                return Err(format!("{}: default {:?} is not an allowed value", attr_path, d));
            }
        }
    }

    for (name, nested) in &block.blocks {
        let block_path = if path.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", path, name)
        };
        if nested.max_items > 0 && nested.min_items > nested.max_items {
            return Err(format!("{}: min_items exceeds max_items", block_path));
        }
        if nested.computed && nested.min_items > 0 {
            return Err(format!("{}: computed blocks cannot require items", block_path));
        }
        check_block(&nested.block, &block_path)?;
    }

    Ok(())
}

/// Schema for the provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProviderSchema {
    /// Schema for provider configuration.
    #[serde(default)]
    pub provider: Schema,
    /// Schemas for each resource type.
    #[serde(default)]
    pub resources: BTreeMap<String, Schema>,
    /// Schemas for each data source type.
    #[serde(default)]
    pub data_sources: BTreeMap<String, Schema>,
}

impl ProviderSchema {
    /// Create a new empty provider schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider configuration schema.
    pub fn with_provider_config(mut self, schema: Schema) -> Self {
        self.provider = schema;
        self
    }

    /// Add a resource schema.
    pub fn with_resource(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.resources.insert(name.into(), schema);
        self
    }

    /// Add a data source schema.
    pub fn with_data_source(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.data_sources.insert(name.into(), schema);
        self
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::v0()
    }
}

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// An error that prevents the operation from completing.
    Error,
    /// A warning that doesn't prevent the operation but should be addressed.
    Warning,
}

/// A diagnostic message from the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity of the diagnostic.
    pub severity: DiagnosticSeverity,
    /// A short summary of the issue.
    pub summary: String,
    /// A detailed description of the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// The attribute path where the issue occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Error,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            summary: summary.into(),
            detail: None,
            attribute: None,
        }
    }

    /// Add detail to this diagnostic.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Set the attribute path for this diagnostic.
    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    /// Whether this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_flags() {
        let required = AttributeFlags::required();
        assert!(required.required);
        assert!(!required.is_computed_only());

        let computed = AttributeFlags::computed();
        assert!(computed.is_computed_only());
    }

    #[test]
    fn test_attribute_builders() {
        let attr = Attribute::optional_string()
            .with_description("Query type")
            .with_default(json!("TAG_FILTERS_1_0"))
            .with_allowed_values(["TAG_FILTERS_1_0"]);

        assert_eq!(attr.attr_type, AttributeType::String);
        assert!(attr.flags.optional);
        assert_eq!(attr.default, Some(json!("TAG_FILTERS_1_0")));
        assert_eq!(attr.allowed_values, vec!["TAG_FILTERS_1_0".to_string()]);
    }

    #[test]
    fn test_attributes_are_ordered() {
        let schema = Schema::v0()
            .with_attribute("name", Attribute::required_string())
            .with_attribute("arn", Attribute::computed_string())
            .with_attribute("description", Attribute::optional_string());

        let names: Vec<_> = schema.block.attributes.keys().cloned().collect();
        assert_eq!(names, vec!["arn", "description", "name"]);
    }

    #[test]
    fn test_force_new_paths() {
        let schema = Schema::v0()
            .with_attribute("name", Attribute::required_string().with_force_new())
            .with_attribute("description", Attribute::optional_string());
        assert_eq!(schema.force_new_paths(), vec!["name"]);
    }

    #[test]
    fn test_internal_validate_accepts_well_formed_schema() {
        let schema = Schema::v0()
            .with_attribute("name", Attribute::required_string().with_force_new())
            .with_attribute("arn", Attribute::computed_string())
            .with_block(
                "resource_query",
                NestedBlock::set(
                    Block::new()
                        .with_attribute("query", Attribute::required_string())
                        .with_attribute(
                            "type",
                            Attribute::optional_string()
                                .with_default(json!("TAG_FILTERS_1_0"))
                                .with_allowed_values(["TAG_FILTERS_1_0"]),
                        ),
                )
                .exactly_one(),
            );
        assert_eq!(schema.internal_validate(), Ok(()));
    }

    #[test]
    fn test_internal_validate_rejects_bad_declarations() {
        let required_with_default = Schema::v0().with_attribute(
            "name",
            Attribute::required_string().with_default(json!("x")),
        );
        assert!(required_with_default.internal_validate().is_err());

        let unflagged = Schema::v0().with_attribute(
            "name",
            Attribute::new(AttributeType::String, AttributeFlags::default()),
        );
        assert!(unflagged.internal_validate().is_err());

        let bad_default = Schema::v0().with_attribute(
            "type",
            Attribute::optional_string()
                .with_default(json!("OTHER"))
                .with_allowed_values(["TAG_FILTERS_1_0"]),
        );
        assert!(bad_default.internal_validate().is_err());

        let bad_cardinality = Schema::v0().with_block(
            "q",
            NestedBlock::list(Block::new())
                .with_min_items(2)
                .with_max_items(1),
        );
        assert!(bad_cardinality.internal_validate().is_err());
    }

    #[test]
    fn test_provider_schema() {
        let provider_schema = ProviderSchema::new()
            .with_provider_config(
                Schema::v0().with_attribute("secret_key", Attribute::optional_string().sensitive()),
            )
            .with_resource(
                "aws_resourcegroups_group",
                Schema::v0().with_attribute("name", Attribute::required_string()),
            )
            .with_data_source(
                "aws_cloudfront_response_headers_policy",
                Schema::v0().with_attribute("id", Attribute::required_string()),
            );

        assert!(provider_schema.provider.block.attributes["secret_key"]
            .flags
            .sensitive);
        assert!(provider_schema
            .resources
            .contains_key("aws_resourcegroups_group"));
        assert!(provider_schema
            .data_sources
            .contains_key("aws_cloudfront_response_headers_policy"));
    }

    #[test]
    fn test_diagnostic() {
        let err = Diagnostic::error("Invalid configuration")
            .with_detail("The value must be one of TAG_FILTERS_1_0")
            .with_attribute("resource_query.0.type");

        assert!(err.is_error());
        assert_eq!(err.attribute, Some("resource_query.0.type".to_string()));
        assert!(!Diagnostic::warning("heads up").is_error());
    }
}
