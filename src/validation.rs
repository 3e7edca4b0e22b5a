//! Schema validation helpers.
//!
//! Validates a `serde_json::Value` against a [`Schema`] and fills in declared
//! defaults. The provider runs both before handing state to an adapter, so
//! cardinality and enumerated-value constraints never reach adapter code.
//!
//! # Example
//!
//! ```
//! use hemmer_provider_aws::schema::{Attribute, Block, NestedBlock, Schema};
//! use hemmer_provider_aws::validation::validate;
//! use serde_json::json;
//!
//! let schema = Schema::v0()
//!     .with_attribute("name", Attribute::required_string())
//!     .with_block(
//!         "resource_query",
//!         NestedBlock::set(Block::new().with_attribute("query", Attribute::required_string()))
//!             .exactly_one(),
//!     );
//!
//! let input = json!({"name": "g1", "resource_query": [{"query": "{}"}]});
//! assert!(validate(&schema, &input).is_empty());
//!
//! let input = json!({"name": "g1", "resource_query": []});
//! let diagnostics = validate(&schema, &input);
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].attribute, Some("resource_query".to_string()));
//! ```

use crate::schema::{Attribute, AttributeType, Block, Diagnostic, NestedBlock, Schema};
use serde_json::{Map, Value};

/// Validate a JSON value against a schema.
///
/// Returns a list of diagnostics for any validation errors found.
/// An empty list means the value is valid.
///
/// # Validation Rules
///
/// - Required attributes must be present and non-null
/// - Computed-only attributes and blocks are skipped
/// - Attribute types must match the schema
/// - String attributes with allowed values must use one of them
/// - Nested blocks are validated recursively with min/max item constraints
/// - Keys not declared by the schema are rejected (`id` excepted at the root)
pub fn validate(schema: &Schema, value: &Value) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    validate_block(&schema.block, value, "", &mut diagnostics);
    diagnostics
}

/// Validate a JSON value against a schema, returning Ok if valid or Err with diagnostics.
pub fn validate_result(schema: &Schema, value: &Value) -> Result<(), Vec<Diagnostic>> {
    let diagnostics = validate(schema, value);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(diagnostics)
    }
}

/// Check if a JSON value is valid against a schema.
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

/// Fill in declared defaults for attributes that are absent or null.
///
/// Descends into nested blocks so defaults inside each block element apply too.
pub fn apply_defaults(schema: &Schema, value: &mut Value) {
    apply_block_defaults(&schema.block, value);
}

fn apply_block_defaults(block: &Block, value: &mut Value) {
    let Value::Object(obj) = value else {
        return;
    };

    for (name, attr) in &block.attributes {
        if let Some(default) = &attr.default {
            let unset = matches!(obj.get(name), None | Some(Value::Null));
            if unset {
                obj.insert(name.clone(), default.clone());
            }
        }
    }

    for (name, nested) in &block.blocks {
        if let Some(Value::Array(items)) = obj.get_mut(name) {
            for item in items {
                apply_block_defaults(&nested.block, item);
            }
        }
    }
}

fn validate_block(block: &Block, value: &Value, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    let obj = match value {
        Value::Object(map) => map,
        Value::Null => return,
        _ => {
            let mut diag =
                Diagnostic::error("Expected object").with_detail(format!("Got {}", value_type_name(value)));
            if !path.is_empty() {
                diag = diag.with_attribute(path);
            }
            diagnostics.push(diag);
            return;
        },
    };

    for (name, attr) in &block.attributes {
        let attr_path = join_path(path, name);
        validate_attribute(attr, obj.get(name), &attr_path, diagnostics);
    }

    for (name, nested) in &block.blocks {
        let block_path = join_path(path, name);
        validate_nested_block(nested, obj.get(name), &block_path, diagnostics);
    }

    check_unknown_keys(block, obj, path, diagnostics);
}

fn check_unknown_keys(
    block: &Block,
    obj: &Map<String, Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for key in obj.keys() {
        let declared = block.attributes.contains_key(key) || block.blocks.contains_key(key);
        let root_id = path.is_empty() && key == "id";
        if !declared && !root_id {
            let key_path = join_path(path, key);
            diagnostics.push(
                Diagnostic::error(format!("Unsupported argument '{}'", key_path))
                    .with_detail("An argument with this name is not expected here")
                    .with_attribute(key_path),
            );
        }
    }
}

fn validate_attribute(
    attr: &Attribute,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if attr.flags.is_computed_only() {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if attr.flags.required {
                diagnostics.push(
                    Diagnostic::error(format!("Missing required attribute '{}'", path))
                        .with_detail("This attribute is required and must be provided")
                        .with_attribute(path),
                );
            }
        },
        Some(v) => {
            let before = diagnostics.len();
            validate_attribute_type(&attr.attr_type, v, path, diagnostics);
            if diagnostics.len() == before {
                validate_allowed_value(attr, v, path, diagnostics);
            }
        },
    }
}

fn validate_allowed_value(
    attr: &Attribute,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if attr.allowed_values.is_empty() {
        return;
    }
    if let Some(s) = value.as_str() {
        if !attr.allowed_values.iter().any(|allowed| allowed == s) {
            diagnostics.push(
                Diagnostic::error(format!("Invalid value for attribute '{}'", path))
                    .with_detail(format!(
                        "Expected one of [{}], got {:?}",
                        attr.allowed_values.join(", "),
                        s
                    ))
                    .with_attribute(path),
            );
        }
    }
}

fn validate_attribute_type(
    attr_type: &AttributeType,
    value: &Value,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    match attr_type {
        AttributeType::String => {
            if !value.is_string() {
                diagnostics.push(type_error(path, "string", value));
            }
        },
        AttributeType::Int64 => {
            if !is_int64(value) {
                diagnostics.push(type_error(path, "int64", value));
            }
        },
        AttributeType::Float64 => {
            if !value.is_number() {
                diagnostics.push(type_error(path, "float64", value));
            }
        },
        AttributeType::Bool => {
            if !value.is_boolean() {
                diagnostics.push(type_error(path, "bool", value));
            }
        },
        AttributeType::List(element_type) | AttributeType::Set(element_type) => {
            if let Some(arr) = value.as_array() {
                for (i, elem) in arr.iter().enumerate() {
                    let elem_path = format!("{}.{}", path, i);
                    validate_attribute_type(element_type, elem, &elem_path, diagnostics);
                }
            } else {
                let expected = if matches!(attr_type, AttributeType::Set(_)) {
                    "set"
                } else {
                    "list"
                };
                diagnostics.push(type_error(path, expected, value));
            }
        },
        AttributeType::Map(value_type) => {
            if let Some(obj) = value.as_object() {
                for (key, val) in obj {
                    let key_path = format!("{}.{}", path, key);
                    validate_attribute_type(value_type, val, &key_path, diagnostics);
                }
            } else {
                diagnostics.push(type_error(path, "map", value));
            }
        },
    }
}

fn validate_nested_block(
    nested: &NestedBlock,
    value: Option<&Value>,
    path: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if nested.computed {
        return;
    }

    match value {
        None | Some(Value::Null) => {
            if nested.min_items > 0 {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' requires at least {} item(s)",
                        path, nested.min_items
                    ))
                    .with_attribute(path),
                );
            }
        },
        Some(Value::Array(arr)) => {
            let len = arr.len() as u32;

            if len < nested.min_items {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' requires at least {} item(s), got {}",
                        path, nested.min_items, len
                    ))
                    .with_attribute(path),
                );
            }

            // 0 means unlimited
            if nested.max_items > 0 && len > nested.max_items {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "Block '{}' allows at most {} item(s), got {}",
                        path, nested.max_items, len
                    ))
                    .with_attribute(path),
                );
            }

            for (i, item) in arr.iter().enumerate() {
                let item_path = format!("{}.{}", path, i);
                validate_block(&nested.block, item, &item_path, diagnostics);
            }
        },
        Some(v) => {
            diagnostics.push(
                Diagnostic::error(format!("Expected list for block '{}'", path))
                    .with_detail(format!("Got {}", value_type_name(v)))
                    .with_attribute(path),
            );
        },
    }
}

fn join_path(base: &str, name: &str) -> String {
    if base.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", base, name)
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn is_int64(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64()
                || n.as_f64()
                    .map(|f| f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64)
                    .unwrap_or(false)
        },
        _ => false,
    }
}

fn type_error(path: &str, expected: &str, got: &Value) -> Diagnostic {
    Diagnostic::error(format!("Invalid type for attribute '{}'", path))
        .with_detail(format!("Expected {}, got {}", expected, value_type_name(got)))
        .with_attribute(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Attribute, Block, NestedBlock, Schema};
    use serde_json::json;

    fn group_schema() -> Schema {
        Schema::v0()
            .with_attribute("name", Attribute::required_string().with_force_new())
            .with_attribute("description", Attribute::optional_string())
            .with_attribute("arn", Attribute::computed_string())
            .with_attribute("tags", Attribute::optional_string_map())
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
            )
    }

    #[test]
    fn test_validate_required_string() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        assert!(validate(&schema, &json!({"name": "test"})).is_empty());

        let diagnostics = validate(&schema, &json!({}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("name".to_string()));

        let diagnostics = validate(&schema, &json!({"name": null}));
        assert_eq!(diagnostics.len(), 1);

        let diagnostics = validate(&schema, &json!({"name": 123}));
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("Invalid type"));
    }

    #[test]
    fn test_validate_computed_attribute_skipped() {
        let schema = Schema::v0().with_attribute("arn", Attribute::computed_string());

        assert!(validate(&schema, &json!({})).is_empty());
        assert!(validate(&schema, &json!({"arn": 123})).is_empty());
    }

    #[test]
    fn test_validate_int64() {
        let schema = Schema::v0().with_attribute("count", Attribute::optional_int64());

        assert!(validate(&schema, &json!({"count": 42})).is_empty());
        assert!(validate(&schema, &json!({"count": 42.0})).is_empty());
        assert_eq!(validate(&schema, &json!({"count": 42.5})).len(), 1);
        assert_eq!(validate(&schema, &json!({"count": "42"})).len(), 1);
    }

    #[test]
    fn test_validate_string_map() {
        let schema = Schema::v0().with_attribute("tags", Attribute::optional_string_map());

        assert!(validate(&schema, &json!({"tags": {"Env": "prod"}})).is_empty());

        let diagnostics = validate(&schema, &json!({"tags": {"Count": 3}}));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].attribute, Some("tags.Count".to_string()));
    }

    #[test]
    fn test_validate_group_config() {
        let config = json!({
            "name": "g1",
            "resource_query": [{"query": "{}", "type": "TAG_FILTERS_1_0"}]
        });
        assert!(is_valid(&group_schema(), &config));
    }

    #[test]
    fn test_validate_resource_query_cardinality() {
        let none = json!({"name": "g1"});
        let diagnostics = validate(&group_schema(), &none);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("requires at least 1"));

        let empty = json!({"name": "g1", "resource_query": []});
        assert_eq!(validate(&group_schema(), &empty).len(), 1);

        let two = json!({
            "name": "g1",
            "resource_query": [{"query": "a"}, {"query": "b"}]
        });
        let diagnostics = validate(&group_schema(), &two);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].summary.contains("at most 1"));
    }

    #[test]
    fn test_validate_allowed_values() {
        let config = json!({
            "name": "g1",
            "resource_query": [{"query": "{}", "type": "SOMETHING_ELSE"}]
        });
        let diagnostics = validate(&group_schema(), &config);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].attribute,
            Some("resource_query.0.type".to_string())
        );
        assert!(diagnostics[0]
            .detail
            .as_deref()
            .unwrap_or_default()
            .contains("TAG_FILTERS_1_0"));
    }

    #[test]
    fn test_validate_unknown_keys() {
        let config = json!({
            "id": "g1",
            "name": "g1",
            "nmae": "typo",
            "resource_query": [{"query": "{}", "extra": true}]
        });
        let diagnostics = validate(&group_schema(), &config);
        let paths: Vec<_> = diagnostics
            .iter()
            .filter_map(|d| d.attribute.clone())
            .collect();
        assert_eq!(diagnostics.len(), 2);
        assert!(paths.contains(&"nmae".to_string()));
        assert!(paths.contains(&"resource_query.0.extra".to_string()));
    }

    #[test]
    fn test_validate_computed_block_skipped() {
        let schema = Schema::v0().with_block(
            "custom_headers_config",
            NestedBlock::list(Block::new().with_attribute("header", Attribute::computed_string()))
                .computed(),
        );
        assert!(validate(&schema, &json!({})).is_empty());
    }

    #[test]
    fn test_validate_result() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());

        assert!(validate_result(&schema, &json!({"name": "test"})).is_ok());
        let err = validate_result(&schema, &json!({})).unwrap_err();
        assert_eq!(err.len(), 1);
    }

    #[test]
    fn test_apply_defaults_in_nested_blocks() {
        let mut config = json!({
            "name": "g1",
            "resource_query": [{"query": "{}"}]
        });
        apply_defaults(&group_schema(), &mut config);

        assert_eq!(config["resource_query"][0]["type"], "TAG_FILTERS_1_0");
        assert!(config.get("description").is_none());
    }

    #[test]
    fn test_apply_defaults_keeps_explicit_values() {
        let schema = Schema::v0().with_attribute(
            "mode",
            Attribute::optional_string().with_default(json!("fast")),
        );

        let mut config = json!({"mode": "slow"});
        apply_defaults(&schema, &mut config);
        assert_eq!(config["mode"], "slow");

        let mut config = json!({"mode": null});
        apply_defaults(&schema, &mut config);
        assert_eq!(config["mode"], "fast");
    }

    #[test]
    fn test_non_object_root() {
        let schema = Schema::v0().with_attribute("name", Attribute::required_string());
        let diagnostics = validate(&schema, &json!("string"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].summary, "Expected object");
        assert!(diagnostics[0].attribute.is_none());
    }
}
