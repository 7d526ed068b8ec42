//! Mount — container mount tables and in-container → host path mapping.
//!
//! A log path declared inside a container (`/data/*.log`) is only readable by
//! the shipper through the volume that backs it on the node. [`MountTable::host_path_of`]
//! walks the path upwards until it hits a mount destination and re-roots the
//! remainder onto that mount's host source.

use std::collections::HashMap;

/// One volume mount as reported by container inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    /// Absolute path inside the container.
    pub destination: String,
    /// Absolute path on the host.
    pub source: String,
}

impl MountPoint {
    pub fn new(destination: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            source: source.into(),
        }
    }
}

/// Destination → source lookup for a single container.
#[derive(Debug, Clone, Default)]
pub struct MountTable {
    mounts: HashMap<String, String>,
}

impl MountTable {
    /// Build a table from inspection output. A later duplicate destination wins.
    pub fn from_mounts(mounts: impl IntoIterator<Item = MountPoint>) -> Self {
        Self {
            mounts: mounts
                .into_iter()
                .map(|m| (m.destination, m.source))
                .collect(),
        }
    }

    /// Map an in-container path pattern to the host path pattern that reaches
    /// the same files, or `None` when no mount encloses it.
    ///
    /// The walk works on the raw string: each step cuts the pattern at its
    /// last `/`. Nothing is normalized, so glob segments (`*`, `?`, `[...]`),
    /// `.` segments and doubled separators are carried verbatim in the
    /// remainder. A trailing `/` on the pattern maps onto `source/.`. The
    /// filesystem root itself is never treated as a mount destination.
    pub fn host_path_of(&self, path: &str) -> Option<String> {
        let mut current = path;

        loop {
            if let Some(source) = self.mounts.get(current) {
                if current.len() == path.len() {
                    return Some(source.clone());
                }
                let rel = &path[current.len() + 1..];
                return Some(join_host(source, if rel.is_empty() { "." } else { rel }));
            }

            current = match current.rfind('/') {
                Some(idx) if idx > 0 => &current[..idx],
                _ => return None,
            };
        }
    }
}

/// `source + "/" + rel` without doubling the separator when the source
/// already ends with one.
fn join_host(source: &str, rel: &str) -> String {
    let trimmed = source.trim_end_matches('/');
    if trimmed.is_empty() {
        format!("/{}", rel)
    } else {
        format!("{}/{}", trimmed, rel)
    }
}
