//! Document — one generated input configuration and override merging.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::BuildError;

/// A configuration document handed to the log shipper: one input per
/// document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigDocument(Map<String, Value>);

impl ConfigDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Value at a dotted path (`containers.ids`, `fields.topic`).
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut value = self.0.get(segments.next()?)?;
        for segment in segments {
            value = value.as_object()?.get(segment)?;
        }
        Some(value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Merge `overrides` into the document, field by field.
    ///
    /// Mappings merge key by key, any other value replaces the field. An
    /// override mapping meeting a non-mapping document value is a conflict:
    /// that override is left out and reported, the rest still applies.
    pub fn merge(&mut self, overrides: Map<String, Value>) -> Vec<BuildError> {
        let mut conflicts = Vec::new();
        merge_into(&mut self.0, overrides, "", &mut conflicts);
        conflicts
    }
}

impl fmt::Display for ConfigDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

fn merge_into(
    target: &mut Map<String, Value>,
    overrides: Map<String, Value>,
    parent: &str,
    conflicts: &mut Vec<BuildError>,
) {
    for (field, value) in overrides {
        let path = if parent.is_empty() {
            field.clone()
        } else {
            format!("{}.{}", parent, field)
        };

        match value {
            Value::Object(nested) => match target.get_mut(&field) {
                Some(Value::Object(existing)) => merge_into(existing, nested, &path, conflicts),
                Some(existing) if !existing.is_null() => {
                    conflicts.push(BuildError::MergeConflict {
                        reason: format!("cannot merge a mapping into {}", kind_of(existing)),
                        field: path,
                    });
                }
                _ => {
                    target.insert(field, Value::Object(nested));
                }
            },
            value => {
                target.insert(field, value);
            }
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
