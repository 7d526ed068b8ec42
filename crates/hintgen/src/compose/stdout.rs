//! Stdout — the document collecting a container's stdout/stderr stream.

use tracing::{debug, warn};

use super::document::ConfigDocument;
use super::merger::{process_config, STDLOG};
use super::SourceContext;
use crate::hints::HintTree;

/// Build the stdout/stderr document: the stdout template merged with the
/// overrides of the container's hint root. Always yields a document.
pub fn build_stdout(hints: &HintTree, ctx: &SourceContext<'_>) -> ConfigDocument {
    let mut doc = ConfigDocument::new(ctx.config.stdout_template.clone());
    let overrides = process_config(&hints.scope(&ctx.config.key), STDLOG, ctx);

    for conflict in doc.merge(overrides) {
        warn!(container = ctx.container_id, "stdout config: {}", conflict);
    }

    let doc = doc.render(&ctx.bindings());
    debug!(container = ctx.container_id, "stdout config {}", doc);
    doc
}
