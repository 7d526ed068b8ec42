//! Check — advisory validation of hint values.
//!
//! Nothing here rejects a hint: the shipper owns final validation. The
//! findings are logged so that a broken annotation is visible on the node
//! that generated the config.

use grep_regex::RegexMatcher;
use serde_json::{Map, Value};

/// Options the decode processor recognizes.
const DECODE_OPTIONS: &[&str] = &[
    "type",
    "field",
    "preserve_old_field",
    "target",
    "max_depth",
    "process_array",
    "overwrite_keys",
    "expression",
    "when",
];

/// Decode types the processor supports.
const DECODE_TYPES: &[&str] = &["json", "regex"];

/// Patterns that do not compile.
pub fn invalid_patterns(patterns: &[String]) -> Vec<String> {
    patterns
        .iter()
        .filter_map(|p| {
            RegexMatcher::new(p)
                .err()
                .map(|e| format!("pattern '{}' does not compile: {}", p, e))
        })
        .collect()
}

/// Problems with a `multiline` hint.
pub fn multiline_problems(multiline: &Map<String, Value>) -> Vec<String> {
    match multiline.get("pattern") {
        Some(Value::String(p)) => invalid_patterns(std::slice::from_ref(p)),
        Some(_) => vec!["multiline.pattern is not a string".to_string()],
        None => vec!["multiline hint has no pattern".to_string()],
    }
}

/// Problems with a `format` hint, judged against the decode processor.
pub fn format_problems(format: &Map<String, Value>) -> Vec<String> {
    let mut problems: Vec<String> = format
        .keys()
        .filter(|k| !DECODE_OPTIONS.contains(&k.as_str()))
        .map(|k| format!("format.{} is not a decode option", k))
        .collect();

    match format.get("type").and_then(Value::as_str) {
        Some(t) if DECODE_TYPES.contains(&t) => {}
        Some(t) => problems.push(format!("format.type '{}' is not one of {:?}", t, DECODE_TYPES)),
        None => problems.push("format.type is required".to_string()),
    }

    if let Some(Value::String(expression)) = format.get("expression") {
        problems.extend(invalid_patterns(std::slice::from_ref(expression)));
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_valid_patterns() {
        assert!(invalid_patterns(&["^ERROR".to_string(), "^\\[".to_string()]).is_empty());
    }

    #[test]
    fn test_invalid_pattern_reported() {
        let problems = invalid_patterns(&["^ok".to_string(), "(unclosed".to_string()]);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("(unclosed"));
    }

    #[test]
    fn test_multiline_needs_pattern() {
        assert!(multiline_problems(&map(json!({"pattern": "^\\d", "negate": "true"}))).is_empty());
        assert_eq!(multiline_problems(&map(json!({"negate": "true"}))).len(), 1);
    }

    #[test]
    fn test_format_regex_ok() {
        let format = map(json!({"type": "regex", "expression": "^(?P<level>\\w+) (?P<msg>.*)$"}));
        assert!(format_problems(&format).is_empty());
    }

    #[test]
    fn test_format_unknown_option_and_type() {
        let format = map(json!({"type": "xml", "depth": "3"}));
        let problems = format_problems(&format);
        assert_eq!(problems.len(), 2);
        assert!(problems.iter().any(|p| p.contains("format.depth")));
        assert!(problems.iter().any(|p| p.contains("xml")));
    }

    #[test]
    fn test_format_missing_type() {
        let problems = format_problems(&map(json!({"field": "log"})));
        assert_eq!(problems, vec!["format.type is required".to_string()]);
    }
}
