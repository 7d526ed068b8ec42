//! Model — BuilderConfig and its defaults.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Token bound to the container id when a template is rendered.
pub const CONTAINER_ID_TOKEN: &str = "${data.container.id}";
/// Token bound to the container name.
pub const CONTAINER_NAME_TOKEN: &str = "${data.container.name}";
/// Token bound to the pod namespace.
pub const NAMESPACE_TOKEN: &str = "${data.container.namespace}";
/// List token spliced with the resolved host paths of an extern path set.
pub const EXTERN_PATHS_TOKEN: &str = "${data.extern_paths}";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Annotation namespace, e.g. `meitu.com` in `meitu.com.logs/topic`.
    pub prefix: String,
    /// Hint root consulted by the builder, e.g. `logs`.
    pub key: String,
    pub topic_prefix: String,
    /// Container names or ids that never get a configuration.
    pub skip: Vec<String>,
    pub stdout_template: Map<String, Value>,
    pub extern_template: Map<String, Value>,
    pub docker_host: String,
    pub docker_api_version: String,
    /// Deadline on the single mount inspection of an event.
    pub inspect_timeout_ms: u64,
    /// Indexed extern path sets scanned: `extern_paths0` up to
    /// `extern_paths{max - 1}`. A policy knob, not a format limit.
    pub max_extern_path_sets: usize,
    /// Processor name the shipper registers for field decoding.
    pub decode_processor: String,
    /// Events processed concurrently by the binary.
    pub max_concurrent_events: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            prefix: "meitu.com".to_string(),
            key: "logs".to_string(),
            topic_prefix: "k8s".to_string(),
            skip: Vec::new(),
            stdout_template: default_stdout_template(),
            extern_template: default_extern_template(),
            docker_host: "unix:///var/run/docker.sock".to_string(),
            docker_api_version: "1.23".to_string(),
            inspect_timeout_ms: 2000,
            max_extern_path_sets: 5,
            decode_processor: "mydecode_field".to_string(),
            max_concurrent_events: 16,
        }
    }
}

impl BuilderConfig {
    /// Whether an event for this container should be ignored.
    pub fn skips(&self, name: Option<&str>, id: Option<&str>) -> bool {
        self.skip
            .iter()
            .any(|s| Some(s.as_str()) == name || Some(s.as_str()) == id)
    }
}

/// Docker input reading the container's stdout/stderr.
pub fn default_stdout_template() -> Map<String, Value> {
    as_map(json!({
        "type": "docker",
        "containers": { "ids": [CONTAINER_ID_TOKEN] },
    }))
}

/// Log input reading files through the node's view of the container volumes.
pub fn default_extern_template() -> Map<String, Value> {
    as_map(json!({
        "type": "log",
        "paths": [EXTERN_PATHS_TOKEN],
    }))
}

fn as_map(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(m) => m,
        _ => Map::new(),
    }
}
