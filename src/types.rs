//! Convenience types shared between the provider and its adapters.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProviderError;

/// The mutable resource-data handle passed to lifecycle callbacks.
///
/// Holds the instance ID, the current attribute values and, during an update,
/// the prior values so adapters can ask which fields changed. Adapters read
/// configuration through [`ResourceData::decode`] into a typed struct rather
/// than picking values out one by one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourceData {
    id: Option<String>,
    attributes: Map<String, Value>,
    prior: Option<Map<String, Value>>,
}

impl ResourceData {
    /// Build a handle from a state or configuration object.
    ///
    /// A string `id` key becomes the instance ID. Non-object values yield an
    /// empty handle.
    pub fn new(state: Value) -> Self {
        let mut attributes = into_map(state);
        let id = take_id(&mut attributes);
        Self {
            id,
            attributes,
            prior: None,
        }
    }

    /// Build a handle for an update, remembering the prior state for change detection.
    ///
    /// The ID comes from the planned state, falling back to the prior state.
    pub fn for_update(prior: Value, planned: Value) -> Self {
        let mut prior = into_map(prior);
        let prior_id = take_id(&mut prior);
        let mut data = Self::new(planned);
        if data.id.is_none() {
            data.id = prior_id;
        }
        data.prior = Some(prior);
        data
    }

    /// Build a handle holding nothing but an ID.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// The instance ID, if one has been assigned.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The instance ID, or a validation error when there is none.
    pub fn require_id(&self) -> Result<&str, ProviderError> {
        self.id()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ProviderError::Validation("resource has no ID".to_string()))
    }

    /// Assign the instance ID.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Forget the instance ID, marking the resource as gone.
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Get an attribute value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Get a string attribute value.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Set an attribute value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<(), ProviderError> {
        self.attributes
            .insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Whether an attribute differs from the prior state.
    ///
    /// Always false outside of an update. Absent and null compare equal,
    /// including object keys nested inside blocks.
    pub fn has_change(&self, key: &str) -> bool {
        let Some(prior) = &self.prior else {
            return false;
        };
        normalize(prior.get(key)) != normalize(self.attributes.get(key))
    }

    /// Whether any of the given attributes differ from the prior state.
    pub fn has_changes(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.has_change(k))
    }

    /// The prior and current value of an attribute.
    pub fn get_change(&self, key: &str) -> (Option<&Value>, Option<&Value>) {
        let before = self.prior.as_ref().and_then(|p| p.get(key));
        (before, self.attributes.get(key))
    }

    /// Decode the attributes into a typed configuration struct.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ProviderError> {
        serde_json::from_value(Value::Object(self.attributes.clone())).map_err(|e| {
            ProviderError::Validation(format!("invalid resource configuration: {}", e))
        })
    }

    /// Decode the prior attributes into a typed configuration struct.
    pub fn decode_prior<T: DeserializeOwned>(&self) -> Result<Option<T>, ProviderError> {
        self.prior
            .as_ref()
            .map(|prior| {
                serde_json::from_value(Value::Object(prior.clone())).map_err(|e| {
                    ProviderError::Validation(format!("invalid prior state: {}", e))
                })
            })
            .transpose()
    }

    /// Convert into a state object, with `id` included when set.
    pub fn into_state(self) -> Value {
        let mut attributes = self.attributes;
        if let Some(id) = self.id {
            attributes.insert("id".to_string(), Value::String(id));
        }
        Value::Object(attributes)
    }
}

fn into_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn take_id(attributes: &mut Map<String, Value>) -> Option<String> {
    match attributes.remove("id") {
        Some(Value::String(id)) if !id.is_empty() => Some(id),
        _ => None,
    }
}

fn normalize(value: Option<&Value>) -> Option<Value> {
    value.filter(|v| !v.is_null()).map(strip_nulls)
}

fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_nulls).collect()),
        other => other.clone(),
    }
}

/// An imported resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedResource {
    /// The resource type.
    pub resource_type: String,
    /// The imported state.
    pub state: Value,
}

impl ImportedResource {
    /// Create a new imported resource.
    pub fn new(resource_type: impl Into<String>, state: Value) -> Self {
        Self {
            resource_type: resource_type.into(),
            state,
        }
    }
}

/// Provider metadata: the type names the host may request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProviderMetadata {
    /// List of resource type names.
    pub resources: Vec<String>,
    /// List of data source type names.
    pub data_sources: Vec<String>,
}
