//! Extern path — documents for log files living inside the container.
//!
//! Two kinds of path sets are read from the hint root:
//!
//! - the unindexed set: `extern_paths`, configured by `extern_path_conf.*`
//! - indexed sets: `extern_paths0`, `extern_paths1`, ... configured by
//!   `extern_path_conf0.*`, ... scanned in order and stopping at the first
//!   index without paths.
//!
//! Every set is resolved on its own: a set with a path no mount encloses is
//! dropped without affecting the others.

use std::time::Duration;

use tracing::{debug, error, warn};

use super::document::ConfigDocument;
use super::merger::process_config;
use super::SourceContext;
use crate::client::MountInspector;
use crate::docker::client::DockerError;
use crate::docker::mount::MountTable;
use crate::error::BuildError;
use crate::hints::{HintScope, HintTree};

pub const EXTERN_PATHS: &str = "extern_paths";
pub const EXTERN_PATH_CONF: &str = "extern_path_conf";

/// One group of in-container path patterns sharing a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSet {
    /// `None` for the unindexed set.
    pub index: Option<usize>,
    pub paths: Vec<String>,
}

impl PathSet {
    /// Hint field holding the paths; also the set's logical source name.
    pub fn paths_field(&self) -> String {
        match self.index {
            Some(i) => format!("{}{}", EXTERN_PATHS, i),
            None => EXTERN_PATHS.to_string(),
        }
    }

    /// Hint sub-path holding the set's overrides.
    pub fn conf_field(&self) -> String {
        match self.index {
            Some(i) => format!("{}{}", EXTERN_PATH_CONF, i),
            None => EXTERN_PATH_CONF.to_string(),
        }
    }
}

/// The configured path sets, in emission order: the unindexed set when it
/// has paths, then indexed sets from 0 up to the first gap (at most
/// `max_indexed` of them).
pub fn collect_path_sets(scope: &HintScope<'_>, max_indexed: usize) -> Vec<PathSet> {
    let mut sets = Vec::new();

    let unindexed = PathSet {
        index: None,
        paths: scope.list(EXTERN_PATHS),
    };
    if !unindexed.paths.is_empty() {
        sets.push(unindexed);
    }

    for i in 0..max_indexed {
        let set = PathSet {
            index: Some(i),
            paths: Vec::new(),
        };
        let paths = scope.list(&set.paths_field());
        if paths.is_empty() {
            break;
        }
        sets.push(PathSet { paths, ..set });
    }
    sets
}

/// Fetch the container's mount table, bounded by `timeout`.
pub async fn fetch_mounts(
    inspector: &dyn MountInspector,
    container_id: &str,
    timeout: Duration,
) -> Result<MountTable, DockerError> {
    match tokio::time::timeout(timeout, inspector.inspect_mounts(container_id)).await {
        Ok(Ok(mounts)) => Ok(MountTable::from_mounts(mounts)),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(DockerError::Timeout(timeout.as_millis() as u64)),
    }
}

/// Build the document of one path set.
///
/// Fails fast: one unresolvable pattern drops the whole set.
pub fn resolve_set(
    set: &PathSet,
    mounts: Option<&MountTable>,
    hints: &HintTree,
    ctx: &SourceContext<'_>,
) -> Result<ConfigDocument, BuildError> {
    let source = set.paths_field();
    let mounts = mounts.ok_or_else(|| BuildError::MountResolutionFailed {
        set: source.clone(),
        reason: "mount table unavailable".to_string(),
    })?;

    let host_paths = set
        .paths
        .iter()
        .map(|path| {
            mounts
                .host_path_of(path)
                .ok_or_else(|| BuildError::MountResolutionFailed {
                    set: source.clone(),
                    reason: format!("no mount encloses '{}'", path),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut doc = ConfigDocument::new(ctx.config.extern_template.clone());
    let scope = hints.scope(&ctx.config.key).nested(&set.conf_field());
    for conflict in doc.merge(process_config(&scope, &source, ctx)) {
        warn!(container = ctx.container_id, set = %source, "extern path config: {}", conflict);
    }

    let doc = doc.render(&ctx.bindings().with_paths(&host_paths));
    debug!(container = ctx.container_id, set = %source, "extern path config {}", doc);
    Ok(doc)
}

/// Build the documents of every configured path set of the container.
///
/// The mount table is fetched at most once, and only when some set has
/// paths. An inspection failure drops every set of this event.
pub async fn build_extern(
    hints: &HintTree,
    ctx: &SourceContext<'_>,
    inspector: &dyn MountInspector,
    timeout: Duration,
) -> Vec<ConfigDocument> {
    let sets = collect_path_sets(&hints.scope(&ctx.config.key), ctx.config.max_extern_path_sets);
    if sets.is_empty() {
        return Vec::new();
    }

    let mounts = match fetch_mounts(inspector, ctx.container_id, timeout).await {
        Ok(mounts) => Some(mounts),
        Err(e) => {
            error!(container = ctx.container_id, "get container mounts failed: {}", e);
            None
        }
    };

    sets.iter()
        .filter_map(|set| match resolve_set(set, mounts.as_ref(), hints, ctx) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!(container = ctx.container_id, "dropping extern path set: {}", e);
                None
            }
        })
        .collect()
}
