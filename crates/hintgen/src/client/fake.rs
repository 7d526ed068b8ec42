//! Fake — test double for mount inspection.
//!
//! Provides a deterministic [`FakeInspector`] that implements
//! [`MountInspector`] using in-memory state, so the builder can be exercised
//! without a running Docker daemon.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;

use crate::client::docker::{MountFuture, MountInspector};
use crate::docker::client::DockerError;
use crate::docker::mount::MountPoint;

#[derive(Default)]
struct Inner {
    mounts: HashMap<String, Vec<MountPoint>>,
    failing: HashSet<String>,
    delay: Option<Duration>,
}

/// A fake inspector for deterministic testing.
///
/// Unknown container ids answer `ContainerNotFound`, ids marked with
/// [`FakeInspector::fail_for`] answer `ConnectionFailed`.
pub struct FakeInspector {
    inner: Mutex<Inner>,
    calls: AtomicUsize,
}

impl FakeInspector {
    /// Create an empty fake inspector.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Seed the mounts of a container.
    pub async fn add_mounts(&self, container_id: &str, mounts: Vec<MountPoint>) {
        self.inner
            .lock()
            .await
            .mounts
            .insert(container_id.to_string(), mounts);
    }

    /// Make every inspection of `container_id` fail.
    pub async fn fail_for(&self, container_id: &str) {
        self.inner.lock().await.failing.insert(container_id.to_string());
    }

    /// Delay every answer, to exercise the inspection deadline.
    pub async fn set_delay(&self, delay: Duration) {
        self.inner.lock().await.delay = Some(delay);
    }

    /// Number of inspections served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for FakeInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl MountInspector for FakeInspector {
    fn inspect_mounts<'a>(&'a self, container_id: &'a str) -> MountFuture<'a> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);

            let (delay, result) = {
                let state = self.inner.lock().await;
                let result = if state.failing.contains(container_id) {
                    Err(DockerError::ConnectionFailed("fake daemon unavailable".to_string()))
                } else {
                    state
                        .mounts
                        .get(container_id)
                        .cloned()
                        .ok_or_else(|| DockerError::ContainerNotFound(container_id.to_string()))
                };
                (state.delay, result)
            };

            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            result
        })
    }
}
