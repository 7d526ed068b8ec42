//! Merger — override fields derived from one hint scope.
//!
//! The result is merged into a template by [`ConfigDocument::merge`]; fields
//! the hints do not mention never appear here, so the template keeps them.
//!
//! [`ConfigDocument::merge`]: super::document::ConfigDocument::merge

use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use super::check;
use super::SourceContext;
use crate::conf::model::{CONTAINER_NAME_TOKEN, NAMESPACE_TOKEN};
use crate::hints::HintScope;

pub const MULTILINE: &str = "multiline";
pub const INCLUDE_LINES: &str = "include_lines";
pub const EXCLUDE_LINES: &str = "exclude_lines";
pub const TOPIC: &str = "topic";
pub const FORMAT: &str = "format";

/// Logical source name of the stdout/stderr document.
pub const STDLOG: &str = "stdlog";

/// Compute the override fields for `scope`.
///
/// `source` names the log source (`stdlog`, `extern_paths0`, ...) and is the
/// topic suffix unless a `topic` hint says otherwise.
pub fn process_config(scope: &HintScope<'_>, source: &str, ctx: &SourceContext<'_>) -> Map<String, Value> {
    let mut fields = Map::new();

    if let Some(multiline) = scope.mapping(MULTILINE) {
        report(ctx, source, MULTILINE, check::multiline_problems(&multiline));
        fields.insert(MULTILINE.to_string(), Value::Object(multiline));
    }

    for field in [INCLUDE_LINES, EXCLUDE_LINES] {
        let lines = scope.list(field);
        if !lines.is_empty() {
            report(ctx, source, field, check::invalid_patterns(&lines));
            fields.insert(field.to_string(), json!(lines));
        }
    }

    let suffix = scope.string(TOPIC).filter(|t| !t.is_empty()).unwrap_or(source);
    fields.insert(
        "fields".to_string(),
        json!({ TOPIC: topic_of(&ctx.config.topic_prefix, suffix) }),
    );

    let decode = match scope.mapping(FORMAT) {
        Some(format) => {
            report(ctx, source, FORMAT, check::format_problems(&format));
            Value::Object(format)
        }
        None => json!({"type": "json", "field": "message"}),
    };
    let mut processor = Map::new();
    processor.insert(ctx.config.decode_processor.clone(), decode);
    fields.insert("processors".to_string(), json!([processor]));

    let rendered = serde_json::Value::Object(fields.clone());
    debug!(
        container = ctx.container_id,
        source,
        scope = %scope.path(),
        "process config {}",
        rendered
    );
    fields
}

/// `<prefix>_<namespace>_<container>_<suffix>`, with namespace and container
/// left as tokens bound at render time.
pub fn topic_of(prefix: &str, suffix: &str) -> String {
    format!("{}_{}_{}_{}", prefix, NAMESPACE_TOKEN, CONTAINER_NAME_TOKEN, suffix)
}

fn report(ctx: &SourceContext<'_>, source: &str, field: &str, problems: Vec<String>) {
    for problem in problems {
        warn!(
            container = ctx.container_id,
            source,
            "suspicious {} hint: {}",
            field,
            problem
        );
    }
}
