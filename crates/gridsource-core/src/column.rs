//! Column definitions and the attribute mapping they are built from

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute name of the column key
pub const KEY: &str = "key";

/// Attribute name of the display label
pub const LABEL: &str = "label";

/// Attribute name of the sort order
pub const SORT_ORDER: &str = "sort_order";

/// Key→value form of a column definition
///
/// This is the shape column definitions are merged in: a definition is turned
/// into attributes with [`ColumnDefinition::to_attributes`], patched, and
/// rebuilt through a [`ColumnFactory`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnAttributes(BTreeMap<String, Value>);

impl ColumnAttributes {
    /// Create an empty attribute mapping
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Create a mapping holding only a column key
    pub fn for_key(key: impl Into<String>) -> Self {
        Self::new().with(KEY, Value::String(key.into()))
    }

    /// Set an attribute, replacing any previous value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Keep only the attributes for which `keep` returns `true`
    pub fn retain(&mut self, mut keep: impl FnMut(&str, &Value) -> bool) {
        self.0.retain(|name, value| keep(name, value));
    }

    /// Overlay the non-empty attributes of `patch` onto this mapping
    ///
    /// Falsy patch values (`null`, `false`, `0`, `""`, `"0"`, `[]`, `{}`)
    /// never replace a value already present, so a partial override cannot
    /// blank out a field.
    pub fn merge_non_empty(mut self, patch: &ColumnAttributes) -> Self {
        for (name, value) in patch.iter().filter(|(_, v)| !is_empty_value(v)) {
            self.0.insert(name.clone(), value.clone());
        }
        self
    }
}

impl FromIterator<(String, Value)> for ColumnAttributes {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ColumnAttributes {
    type Item = (String, Value);
    type IntoIter = std::collections::btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Whether an attribute value counts as "not supplied" in a partial override
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

/// Errors raised while building a column definition
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColumnError {
    #[error("Column definition is missing a key")]
    MissingKey,

    #[error("Column key must be a non-empty string, got {0}")]
    InvalidKey(String),

    #[error("Column '{key}' has an invalid sort order: {value}")]
    InvalidSortOrder { key: String, value: String },

    #[error("Column '{key}' has an invalid label: {value}")]
    InvalidLabel { key: String, value: String },
}

/// An immutable column definition
///
/// `sort_order` is `None` for columns that have not been placed explicitly.
/// Every other display or formatting hint lives in the extension attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDefinition {
    key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    sort_order: Option<u32>,

    #[serde(flatten)]
    attributes: BTreeMap<String, Value>,
}

impl ColumnDefinition {
    /// Create a definition holding only a key
    pub fn new(key: impl Into<String>) -> Result<Self, ColumnError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ColumnError::InvalidKey("\"\"".to_string()));
        }
        Ok(Self {
            key,
            label: None,
            sort_order: None,
            attributes: BTreeMap::new(),
        })
    }

    /// Set the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = (!label.is_empty()).then_some(label);
        self
    }

    /// Set the sort order (`0` leaves the column unordered)
    pub fn with_sort_order(mut self, sort_order: u32) -> Self {
        self.sort_order = (sort_order > 0).then_some(sort_order);
        self
    }

    /// Set an attribute by name
    ///
    /// `key`, `label` and `sort_order` go to the typed fields, interpreted the
    /// way [`ColumnFactory::create`] reads them. A value that cannot be read
    /// for one of those leaves the column unchanged.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        match name.as_str() {
            KEY => {
                if let Value::String(key) = value {
                    if !key.is_empty() {
                        self.key = key;
                    }
                }
            }
            LABEL => match value {
                Value::Null => self.label = None,
                Value::String(label) => return self.with_label(label),
                Value::Number(n) => return self.with_label(n.to_string()),
                _ => {}
            },
            SORT_ORDER => {
                if let Ok(sort_order) = parse_sort_order(&self.key, &value) {
                    self.sort_order = sort_order;
                }
            }
            _ => {
                self.attributes.insert(name, value);
            }
        }
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Label for display, falling back to the key
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.key)
    }

    pub fn sort_order(&self) -> Option<u32> {
        self.sort_order
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    /// Full attribute mapping, suitable for rebuilding through a factory
    pub fn to_attributes(&self) -> ColumnAttributes {
        let mut attributes: ColumnAttributes = self
            .attributes
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        attributes.insert(KEY, self.key.clone());
        if let Some(label) = &self.label {
            attributes.insert(LABEL, label.clone());
        }
        if let Some(sort_order) = self.sort_order {
            attributes.insert(SORT_ORDER, sort_order);
        }
        attributes
    }
}

impl TryFrom<ColumnAttributes> for ColumnDefinition {
    type Error = ColumnError;

    fn try_from(attributes: ColumnAttributes) -> Result<Self, Self::Error> {
        ColumnFactory::new().create(attributes)
    }
}

/// Builds column definitions from attribute mappings
///
/// Defaults registered on the factory sit underneath every mapping it is
/// handed, so adapters can share hints such as `sortable = true`.
#[derive(Debug, Clone, Default)]
pub struct ColumnFactory {
    defaults: ColumnAttributes,
}

impl ColumnFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a default attribute applied when a mapping does not set it
    pub fn with_default(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(name, value);
        self
    }

    /// Build a definition from an attribute mapping
    pub fn create(&self, attributes: ColumnAttributes) -> Result<ColumnDefinition, ColumnError> {
        let mut merged = self.defaults.clone();
        for (name, value) in attributes {
            if !value.is_null() {
                merged.insert(name, value);
            }
        }
        let mut attributes = merged;

        let key = match attributes.remove(KEY) {
            Some(Value::String(key)) if !key.is_empty() => key,
            Some(other) => return Err(ColumnError::InvalidKey(other.to_string())),
            None => return Err(ColumnError::MissingKey),
        };

        let label = match attributes.remove(LABEL) {
            None | Some(Value::Null) => None,
            Some(Value::String(label)) => (!label.is_empty()).then_some(label),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(other) => {
                return Err(ColumnError::InvalidLabel {
                    key,
                    value: other.to_string(),
                })
            }
        };

        let sort_order = match attributes.remove(SORT_ORDER) {
            None => None,
            Some(value) => parse_sort_order(&key, &value)?,
        };

        Ok(ColumnDefinition {
            key,
            label,
            sort_order,
            attributes: attributes.into_iter().collect(),
        })
    }

    /// Merge a partial override onto a base definition
    ///
    /// Only the override's non-empty attributes participate.
    pub fn merge(
        &self,
        base: &ColumnDefinition,
        patch: &ColumnDefinition,
    ) -> Result<ColumnDefinition, ColumnError> {
        self.create(base.to_attributes().merge_non_empty(&patch.to_attributes()))
    }

    /// Copy of `column` placed at `sort_order`
    pub fn with_sort_order(
        &self,
        column: &ColumnDefinition,
        sort_order: u32,
    ) -> Result<ColumnDefinition, ColumnError> {
        self.create(column.to_attributes().with(SORT_ORDER, sort_order))
    }
}

fn parse_sort_order(key: &str, value: &Value) -> Result<Option<u32>, ColumnError> {
    let invalid = || ColumnError::InvalidSortOrder {
        key: key.to_string(),
        value: value.to_string(),
    };

    let parsed = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_u64().ok_or_else(invalid)?,
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().parse::<u64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    let sort_order = u32::try_from(parsed).map_err(|_| invalid())?;
    Ok((sort_order > 0).then_some(sort_order))
}
