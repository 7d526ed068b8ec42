//! Client module — the mount-inspection capability and its implementations.

pub mod docker;
pub mod fake;
pub mod live;

pub use docker::MountInspector;
pub use fake::FakeInspector;
