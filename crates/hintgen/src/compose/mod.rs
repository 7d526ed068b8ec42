//! Compose module — turning a hint tree into configuration documents.
//!
//! - `document.rs`: the document type and field-by-field merging
//! - `template.rs`: binding container data into templates
//! - `merger.rs`: override fields derived from a hint scope
//! - `stdout.rs`: the stdout/stderr document
//! - `extern_path.rs`: documents for log files inside the container
//! - `check.rs`: advisory validation of hint values

pub mod check;
pub mod document;
pub mod extern_path;
pub mod merger;
pub mod stdout;
pub mod template;

pub use document::ConfigDocument;
pub use template::Bindings;

use crate::conf::BuilderConfig;

/// Who the documents are for, plus the builder configuration.
#[derive(Debug, Clone, Copy)]
pub struct SourceContext<'a> {
    pub container_id: &'a str,
    pub container_name: &'a str,
    pub namespace: &'a str,
    pub config: &'a BuilderConfig,
}

impl<'a> SourceContext<'a> {
    pub fn bindings(&self) -> Bindings<'a> {
        Bindings {
            container_id: self.container_id,
            container_name: self.container_name,
            namespace: self.namespace,
            extern_paths: None,
        }
    }
}
