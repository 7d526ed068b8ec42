//! Tree — the typed hint tree resolved once per event.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use super::grammar::{HintKey, KeyScope};
use crate::error::BuildError;
use crate::event::DiscoveryEvent;

/// Hints filed under one root (`logs`, ...), split by override group.
#[derive(Debug, Clone, Default, PartialEq)]
struct ScopedHints {
    unscoped: Map<String, Value>,
    named: Map<String, Value>,
}

/// Hints of one container, keyed by root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HintTree {
    roots: BTreeMap<String, ScopedHints>,
}

impl HintTree {
    /// Build the hint tree of `container` from its annotations.
    ///
    /// Never fails: keys outside the grammar, hints addressed to other
    /// containers and non-string values are skipped.
    pub fn resolve(annotations: &BTreeMap<String, Value>, container: &str, prefix: &str) -> Self {
        let mut tree = HintTree::default();

        for (raw_key, raw_value) in annotations {
            let Some(key) = HintKey::parse(raw_key, prefix) else {
                continue;
            };
            let Value::String(value) = raw_value else {
                debug!("dropping hint '{}': value is not a string", raw_key);
                continue;
            };

            let scoped = match key.scope {
                KeyScope::Unscoped => &mut tree.roots.entry(key.root.to_string()).or_default().unscoped,
                KeyScope::Container(name) if name == container => {
                    &mut tree.roots.entry(key.root.to_string()).or_default().named
                }
                KeyScope::Container(_) => continue,
            };
            put_path(scoped, &key.field, Value::String(value.clone()));
        }

        tree
    }

    /// Resolve the hints of the container described by `event`.
    pub fn from_event(event: &DiscoveryEvent, prefix: &str) -> Result<Self, BuildError> {
        let name = event
            .name()
            .ok_or_else(|| BuildError::HintParseIncomplete("event has no container name".to_string()))?;
        let annotations = event.annotations.as_ref().ok_or_else(|| {
            BuildError::HintParseIncomplete(format!("container '{}' has no annotations", name))
        })?;
        Ok(Self::resolve(annotations, name, prefix))
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// View of the hints under `root`.
    pub fn scope<'a>(&'a self, root: &str) -> HintScope<'a> {
        HintScope {
            hints: self.roots.get(root),
            base: Vec::new(),
        }
    }

    /// JSON rendering for diagnostics.
    pub fn to_value(&self) -> Value {
        let roots = self
            .roots
            .iter()
            .map(|(root, scoped)| {
                let mut m = Map::new();
                m.insert("unscoped".to_string(), Value::Object(scoped.unscoped.clone()));
                m.insert("named".to_string(), Value::Object(scoped.named.clone()));
                (root.clone(), Value::Object(m))
            })
            .collect();
        Value::Object(roots)
    }
}

/// Set `value` at the dotted `path`, replacing scalars that sit on the way.
fn put_path(map: &mut Map<String, Value>, path: &[&str], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = map;
    for segment in parents {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(m) => m,
            _ => unreachable!("slot was just made an object"),
        };
    }
    current.insert(last.to_string(), value);
}

/// Copy `src` over `dst`; nested mappings merge, anything else replaces.
fn overlay(dst: &mut Map<String, Value>, src: &Map<String, Value>) {
    for (key, value) in src {
        match (dst.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) => overlay(existing, nested),
            _ => {
                dst.insert(key.clone(), value.clone());
            }
        }
    }
}

fn get_path<'v>(map: &'v Map<String, Value>, path: &[&str]) -> Option<&'v Value> {
    let (first, rest) = path.split_first()?;
    let mut value = map.get(*first)?;
    for segment in rest {
        value = value.as_object()?.get(*segment)?;
    }
    Some(value)
}

/// A read view over one root, optionally narrowed to a sub-path
/// (`extern_path_conf0`, ...).
///
/// Every lookup prefers the named-container group and falls back to the
/// unscoped group, field by field. A value of the wrong type is skipped as
/// if it were absent.
#[derive(Debug, Clone)]
pub struct HintScope<'a> {
    hints: Option<&'a ScopedHints>,
    base: Vec<String>,
}

impl<'a> HintScope<'a> {
    /// Narrow the view to `sub` (a dotted path) below the current base.
    pub fn nested(&self, sub: &str) -> HintScope<'a> {
        let mut base = self.base.clone();
        base.extend(sub.split('.').filter(|s| !s.is_empty()).map(str::to_string));
        HintScope { hints: self.hints, base }
    }

    /// Dotted path of this view below its root.
    pub fn path(&self) -> String {
        self.base.join(".")
    }

    fn candidates(&self, field: &str) -> Vec<&'a Value> {
        let path: Vec<&str> = self
            .base
            .iter()
            .map(String::as_str)
            .chain(field.split('.'))
            .collect();
        self.hints
            .into_iter()
            .flat_map(|h| [&h.named, &h.unscoped])
            .filter_map(|group| get_path(group, &path))
            .collect()
    }

    /// A string-valued hint.
    pub fn string(&self, field: &str) -> Option<&'a str> {
        self.candidates(field).into_iter().find_map(Value::as_str)
    }

    /// A comma separated hint as a trimmed list. Empty items are dropped.
    pub fn list(&self, field: &str) -> Vec<String> {
        self.string(field)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// A mapping-valued hint (`multiline.*`, `format.*`): the unscoped
    /// mapping overlaid leaf by leaf with the named one. A group whose value
    /// is not a mapping is skipped. Empty maps count as absent.
    pub fn mapping(&self, field: &str) -> Option<Map<String, Value>> {
        let mut merged = Map::new();
        for group in self.candidates(field).into_iter().rev() {
            if let Value::Object(m) = group {
                overlay(&mut merged, m);
            }
        }
        (!merged.is_empty()).then_some(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PREFIX: &str = "meitu.com";

    fn annotations(pairs: &[(&str, &str)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn test_unscoped_list() {
        let tree = HintTree::resolve(
            &annotations(&[("meitu.com.logs/include_lines", "^a, ^b")]),
            "foo",
            PREFIX,
        );
        assert_eq!(tree.scope("logs").list("include_lines"), vec!["^a", "^b"]);
    }

    #[test]
    fn test_named_override_wins_per_field() {
        let tree = HintTree::resolve(
            &annotations(&[
                ("meitu.com.logs/include_lines", "^a"),
                ("meitu.com.logs/exclude_lines", "^debug"),
                ("meitu.com.logs.foo/include_lines", "^x"),
            ]),
            "foo",
            PREFIX,
        );
        let scope = tree.scope("logs");
        assert_eq!(scope.list("include_lines"), vec!["^x"]);
        // Not overridden: the unscoped value survives.
        assert_eq!(scope.list("exclude_lines"), vec!["^debug"]);
    }

    #[test]
    fn test_other_container_hints_ignored() {
        let tree = HintTree::resolve(
            &annotations(&[("meitu.com.logs.bar/include_lines", "^x")]),
            "foo",
            PREFIX,
        );
        assert!(tree.scope("logs").list("include_lines").is_empty());
    }

    #[test]
    fn test_nested_fields_materialize_as_mapping() {
        let tree = HintTree::resolve(
            &annotations(&[
                ("meitu.com.logs/multiline.pattern", "^\\["),
                ("meitu.com.logs/multiline.negate", "true"),
            ]),
            "foo",
            PREFIX,
        );
        let multiline = tree.scope("logs").mapping("multiline").expect("mapping");
        assert_eq!(
            Value::Object(multiline),
            json!({"pattern": "^\\[", "negate": "true"})
        );
    }

    #[test]
    fn test_nested_scope_view() {
        let tree = HintTree::resolve(
            &annotations(&[
                ("meitu.com.logs.foo/extern_path_conf0.include_lines", "^x"),
                ("meitu.com.logs/extern_path_conf0.exclude_lines", "^y"),
            ]),
            "foo",
            PREFIX,
        );
        let conf = tree.scope("logs").nested("extern_path_conf0");
        assert_eq!(conf.path(), "extern_path_conf0");
        assert_eq!(conf.list("include_lines"), vec!["^x"]);
        assert_eq!(conf.list("exclude_lines"), vec!["^y"]);
    }

    #[test]
    fn test_wrong_type_dropped() {
        let tree = HintTree::resolve(
            &annotations(&[
                ("meitu.com.logs/multiline", "oops"),
                ("meitu.com.logs/topic.name", "nested"),
            ]),
            "foo",
            PREFIX,
        );
        let scope = tree.scope("logs");
        assert!(scope.mapping("multiline").is_none());
        assert!(scope.string("topic").is_none());
    }

    #[test]
    fn test_malformed_named_value_falls_back_to_unscoped() {
        let tree = HintTree::resolve(
            &annotations(&[
                ("meitu.com.logs/topic", "app"),
                ("meitu.com.logs.foo/topic.x", "nested"),
            ]),
            "foo",
            PREFIX,
        );
        assert_eq!(tree.scope("logs").string("topic"), Some("app"));
    }

    #[test]
    fn test_non_string_annotation_dropped() {
        let mut ann = annotations(&[("meitu.com.logs/topic", "app")]);
        ann.insert("meitu.com.logs/include_lines".to_string(), json!(["^a"]));
        let tree = HintTree::resolve(&ann, "foo", PREFIX);
        assert!(tree.scope("logs").list("include_lines").is_empty());
        assert_eq!(tree.scope("logs").string("topic"), Some("app"));
    }

    #[test]
    fn test_unknown_root_is_empty_scope() {
        let tree = HintTree::resolve(
            &annotations(&[("meitu.com.logs/topic", "app")]),
            "foo",
            PREFIX,
        );
        assert!(tree.scope("metrics").string("topic").is_none());
    }

    #[test]
    fn test_from_event_requires_name_and_annotations() {
        let mut event = DiscoveryEvent::default();
        event.id = Some("abc".to_string());
        assert!(matches!(
            HintTree::from_event(&event, PREFIX),
            Err(BuildError::HintParseIncomplete(_))
        ));

        event.name = Some("foo".to_string());
        assert!(matches!(
            HintTree::from_event(&event, PREFIX),
            Err(BuildError::HintParseIncomplete(ref m)) if m.contains("foo")
        ));

        event.annotations = Some(annotations(&[("meitu.com.logs/topic", "app")]));
        let tree = HintTree::from_event(&event, PREFIX).expect("complete event");
        assert!(!tree.is_empty());
    }

    #[test]
    fn test_empty_list_items_dropped() {
        let tree = HintTree::resolve(
            &annotations(&[("meitu.com.logs/exclude_lines", " ^a ,, ,^b,")]),
            "foo",
            PREFIX,
        );
        assert_eq!(tree.scope("logs").list("exclude_lines"), vec!["^a", "^b"]);
    }

    #[test]
    fn test_named_mapping_overrides_per_leaf() {
        let tree = HintTree::resolve(
            &annotations(&[
                ("meitu.com.logs/multiline.pattern", "^a"),
                ("meitu.com.logs/multiline.negate", "true"),
                ("meitu.com.logs.foo/multiline.pattern", "^x"),
            ]),
            "foo",
            PREFIX,
        );
        let multiline = tree.scope("logs").mapping("multiline").expect("mapping");
        assert_eq!(
            Value::Object(multiline),
            json!({"pattern": "^x", "negate": "true"})
        );
    }

    #[test]
    fn test_named_scalar_does_not_hide_unscoped_mapping() {
        let tree = HintTree::resolve(
            &annotations(&[
                ("meitu.com.logs/format.type", "json"),
                ("meitu.com.logs.foo/format", "regex"),
            ]),
            "foo",
            PREFIX,
        );
        let format = tree.scope("logs").mapping("format").expect("mapping");
        assert_eq!(Value::Object(format), json!({"type": "json"}));
    }

    #[test]
    fn test_nested_scope_mapping_overrides_per_leaf() {
        let tree = HintTree::resolve(
            &annotations(&[
                ("meitu.com.logs/extern_path_conf0.multiline.pattern", "^a"),
                ("meitu.com.logs/extern_path_conf0.multiline.match", "after"),
                ("meitu.com.logs.foo/extern_path_conf0.multiline.pattern", "^x"),
            ]),
            "foo",
            PREFIX,
        );
        let conf = tree.scope("logs").nested("extern_path_conf0");
        let multiline = conf.mapping("multiline").expect("mapping");
        assert_eq!(
            Value::Object(multiline),
            json!({"pattern": "^x", "match": "after"})
        );
    }
}
