//! Grammar — parsing of a single annotation key.
//!
//! ```text
//! key        = prefix "." root [ "." container ] "/" field-path
//! field-path = segment *( "." segment )
//! ```
//!
//! e.g. `meitu.com.logs.nginx/multiline.pattern` with prefix `meitu.com`
//! parses to root `logs`, container `nginx`, field path `multiline.pattern`.

/// Which override group a hint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope<'a> {
    /// `prefix.root/field`: applies to every container of the pod.
    Unscoped,
    /// `prefix.root.container/field`: applies to the named container only.
    Container(&'a str),
}

/// A parsed annotation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintKey<'a> {
    pub root: &'a str,
    pub scope: KeyScope<'a>,
    pub field: Vec<&'a str>,
}

impl<'a> HintKey<'a> {
    /// Parse `key` against `prefix`. Returns `None` for keys outside the
    /// prefix or not matching the grammar.
    pub fn parse(key: &'a str, prefix: &str) -> Option<Self> {
        let rest = key.strip_prefix(prefix)?.strip_prefix('.')?;
        let (scope_path, field_path) = rest.split_once('/')?;

        if field_path.contains('/') {
            return None;
        }
        let field: Vec<&str> = field_path.split('.').collect();
        if field.iter().any(|s| s.is_empty()) {
            return None;
        }

        let (root, scope) = match scope_path.split_once('.') {
            Some((root, container)) if !container.is_empty() => {
                (root, KeyScope::Container(container))
            }
            Some(_) => return None,
            None => (scope_path, KeyScope::Unscoped),
        };
        if root.is_empty() {
            return None;
        }

        Some(HintKey { root, scope, field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "meitu.com";

    #[test]
    fn test_unscoped_key() {
        let key = HintKey::parse("meitu.com.logs/include_lines", PREFIX).expect("valid");
        assert_eq!(key.root, "logs");
        assert_eq!(key.scope, KeyScope::Unscoped);
        assert_eq!(key.field, vec!["include_lines"]);
    }

    #[test]
    fn test_container_key_with_nested_field() {
        let key = HintKey::parse("meitu.com.logs.foobar/extern_path_conf0.multiline.pattern", PREFIX)
            .expect("valid");
        assert_eq!(key.root, "logs");
        assert_eq!(key.scope, KeyScope::Container("foobar"));
        assert_eq!(key.field, vec!["extern_path_conf0", "multiline", "pattern"]);
    }

    #[test]
    fn test_wrong_prefix_rejected() {
        assert!(HintKey::parse("example.org.logs/include_lines", PREFIX).is_none());
        // Prefix must be followed by a dot, not merely share a head.
        assert!(HintKey::parse("meitu.company.logs/include_lines", PREFIX).is_none());
    }

    #[test]
    fn test_missing_separator_rejected() {
        assert!(HintKey::parse("meitu.com.logs.include_lines", PREFIX).is_none());
    }

    #[test]
    fn test_malformed_paths_rejected() {
        assert!(HintKey::parse("meitu.com.logs/", PREFIX).is_none());
        assert!(HintKey::parse("meitu.com./include_lines", PREFIX).is_none());
        assert!(HintKey::parse("meitu.com.logs./include_lines", PREFIX).is_none());
        assert!(HintKey::parse("meitu.com.logs/multiline..pattern", PREFIX).is_none());
        assert!(HintKey::parse("meitu.com.logs/a/b", PREFIX).is_none());
    }

    #[test]
    fn test_unrelated_annotation_rejected() {
        assert!(HintKey::parse("kubernetes.io/config.seen", PREFIX).is_none());
    }
}
