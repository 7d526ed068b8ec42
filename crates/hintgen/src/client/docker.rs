//! Mount inspection trait — the one Docker capability the builder needs.
//!
//! `live.rs` provides the real Bollard-backed implementation.
//! `fake.rs` provides a test double.

use std::future::Future;
use std::pin::Pin;

use crate::docker::client::DockerError;
use crate::docker::mount::MountPoint;

/// Boxed future returned by [`MountInspector::inspect_mounts`].
pub type MountFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<MountPoint>, DockerError>> + Send + 'a>>;

/// Fetch the mount table of one container.
///
/// Object-safe thanks to the `Pin<Box<…>>` return. Implementations must be
/// `Send + Sync` so a single inspector can serve concurrent events.
pub trait MountInspector: Send + Sync {
    fn inspect_mounts<'a>(&'a self, container_id: &'a str) -> MountFuture<'a>;
}
