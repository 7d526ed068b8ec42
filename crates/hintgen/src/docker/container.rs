//! Container domain — inspection of a single container's mounts.

use super::client::{DockerClient, DockerError};
use super::mount::MountPoint;

use bollard::models::ContainerInspectResponse;

impl DockerClient {
    /// Returns the full `ContainerInspectResponse` from Docker for a container.
    pub async fn inspect_container_raw(
        &self,
        id: &str,
    ) -> Result<ContainerInspectResponse, DockerError> {
        self.client
            .inspect_container(id, None)
            .await
            .map_err(|e| match e {
                bollard::errors::Error::DockerResponseServerError { status_code: 404, .. } => {
                    DockerError::ContainerNotFound(id.to_string())
                }
                other => DockerError::BollardError(other),
            })
    }

    /// Inspect a container and return its (destination, source) mount pairs.
    pub async fn inspect_mounts(&self, id: &str) -> Result<Vec<MountPoint>, DockerError> {
        let details = self.inspect_container_raw(id).await?;
        Ok(mounts_of(details))
    }
}

/// Extract mount pairs from an inspect response, skipping entries that lack
/// either side.
pub(crate) fn mounts_of(details: ContainerInspectResponse) -> Vec<MountPoint> {
    details
        .mounts
        .unwrap_or_default()
        .into_iter()
        .filter_map(|m| match (m.destination, m.source) {
            (Some(destination), Some(source)) => Some(MountPoint { destination, source }),
            _ => None,
        })
        .collect()
}
