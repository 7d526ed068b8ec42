//! Live — implements `MountInspector` for the real Bollard-backed `DockerClient`.

use crate::client::docker::{MountFuture, MountInspector};
use crate::docker::client::DockerClient;

impl MountInspector for DockerClient {
    fn inspect_mounts<'a>(&'a self, container_id: &'a str) -> MountFuture<'a> {
        Box::pin(DockerClient::inspect_mounts(self, container_id))
    }
}
