//! Builder — the entry point turning a discovery event into documents.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::client::MountInspector;
use crate::compose::extern_path::build_extern;
use crate::compose::stdout::build_stdout;
use crate::compose::{ConfigDocument, SourceContext};
use crate::conf::BuilderConfig;
use crate::docker::DockerClient;
use crate::error::BuildError;
use crate::event::DiscoveryEvent;
use crate::hints::HintTree;

/// Builds the log-collection inputs of one container per discovery event.
///
/// Cheap to clone and safe to share between tasks; each call to
/// [`HintBuilder::create_configs`] is independent.
#[derive(Clone)]
pub struct HintBuilder {
    config: Arc<BuilderConfig>,
    inspector: Arc<dyn MountInspector>,
}

impl HintBuilder {
    /// Create a builder over an existing mount inspector.
    pub fn new(config: BuilderConfig, inspector: Arc<dyn MountInspector>) -> Result<Self, BuildError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
            inspector,
        })
    }

    /// Create a builder talking to the Docker daemon named in `config`.
    pub fn connect(config: BuilderConfig) -> Result<Self, BuildError> {
        config.validate()?;
        let client = DockerClient::new(&config.docker_host, &config.docker_api_version)?;
        info!("Docker client ready for {}", client.host());
        Self::new(config, Arc::new(client))
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// All documents for the container described by `event`: the stdout
    /// document first, then one per resolvable extern path set in
    /// declaration order.
    ///
    /// Never fails. Skipped containers and events without a container id
    /// yield nothing; other problems only shrink the result.
    pub async fn create_configs(&self, event: &DiscoveryEvent) -> Vec<ConfigDocument> {
        let config = self.config.as_ref();

        if config.skips(event.name(), event.id()) {
            debug!(container = ?event.name(), "container in skip list");
            return Vec::new();
        }
        let Some(container_id) = event.id() else {
            warn!("dropping event without container id");
            return Vec::new();
        };

        let hints = HintTree::from_event(event, &config.prefix).unwrap_or_else(|e| {
            warn!(container = container_id, "{}", e);
            HintTree::default()
        });
        debug!(container = container_id, "hints {}", hints.to_value());

        let ctx = SourceContext {
            container_id,
            container_name: event.name().unwrap_or_default(),
            namespace: event.namespace(),
            config,
        };

        let mut docs = vec![build_stdout(&hints, &ctx)];
        docs.extend(
            build_extern(
                &hints,
                &ctx,
                self.inspector.as_ref(),
                Duration::from_millis(config.inspect_timeout_ms),
            )
            .await,
        );

        info!(container = container_id, "generated {} config(s)", docs.len());
        docs
    }
}
