//! Event — one container discovery notification.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Container metadata and annotations delivered by the discovery source.
///
/// Every field is optional on the wire; the builder decides what it can do
/// with a partial event. Annotation values are kept as raw JSON so that
/// wrongly typed values can be dropped individually.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryEvent {
    pub id: Option<String>,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub annotations: Option<BTreeMap<String, Value>>,
}

impl DiscoveryEvent {
    /// Convenience constructor for a fully populated event.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        namespace: impl Into<String>,
        annotations: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            id: Some(id.into()),
            name: Some(name.into()),
            namespace: Some(namespace.into()),
            annotations: Some(
                annotations
                    .into_iter()
                    .map(|(k, v)| (k, Value::String(v)))
                    .collect(),
            ),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_event_deserializes() {
        let event: DiscoveryEvent =
            serde_json::from_str(r#"{"id": "abc", "name": "foo"}"#).expect("valid json");
        assert_eq!(event.id(), Some("abc"));
        assert_eq!(event.name(), Some("foo"));
        assert_eq!(event.namespace(), "");
        assert!(event.annotations.is_none());
    }

    #[test]
    fn test_annotation_values_keep_raw_type() {
        let event: DiscoveryEvent = serde_json::from_str(
            r#"{"id": "abc", "annotations": {"a/b": "x", "a/c": 3}}"#,
        )
        .expect("valid json");
        let ann = event.annotations.expect("annotations present");
        assert_eq!(ann["a/b"], Value::String("x".into()));
        assert_eq!(ann["a/c"], Value::from(3));
    }
}
