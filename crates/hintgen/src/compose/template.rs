//! Template — binding container data into a document.
//!
//! Only the tokens this builder owns are substituted; any other `${...}`
//! token is left in place for the shipper.

use serde_json::{Map, Value};

use super::document::ConfigDocument;
use crate::conf::model::{
    CONTAINER_ID_TOKEN, CONTAINER_NAME_TOKEN, EXTERN_PATHS_TOKEN, NAMESPACE_TOKEN,
};

/// Values bound while rendering one document.
#[derive(Debug, Clone, Copy)]
pub struct Bindings<'a> {
    pub container_id: &'a str,
    pub container_name: &'a str,
    pub namespace: &'a str,
    /// Host paths spliced in place of the extern paths token.
    pub extern_paths: Option<&'a [String]>,
}

impl<'a> Bindings<'a> {
    pub fn with_paths(self, paths: &'a [String]) -> Self {
        Self {
            extern_paths: Some(paths),
            ..self
        }
    }
}

impl ConfigDocument {
    /// Render the document against `bindings`.
    pub fn render(&self, bindings: &Bindings<'_>) -> ConfigDocument {
        ConfigDocument::new(render_map(self.as_map(), bindings))
    }
}

fn render_map(map: &Map<String, Value>, bindings: &Bindings<'_>) -> Map<String, Value> {
    map.iter()
        .map(|(k, v)| (k.clone(), render_value(v, bindings)))
        .collect()
}

fn render_value(value: &Value, bindings: &Bindings<'_>) -> Value {
    match value {
        Value::String(s) => Value::String(render_str(s, bindings)),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match (item.as_str(), bindings.extern_paths) {
                    (Some(EXTERN_PATHS_TOKEN), Some(paths)) => {
                        out.extend(paths.iter().cloned().map(Value::String));
                    }
                    _ => out.push(render_value(item, bindings)),
                }
            }
            Value::Array(out)
        }
        Value::Object(map) => Value::Object(render_map(map, bindings)),
        other => other.clone(),
    }
}

fn render_str(s: &str, bindings: &Bindings<'_>) -> String {
    if !s.contains("${") {
        return s.to_string();
    }
    s.replace(CONTAINER_ID_TOKEN, bindings.container_id)
        .replace(CONTAINER_NAME_TOKEN, bindings.container_name)
        .replace(NAMESPACE_TOKEN, bindings.namespace)
}
