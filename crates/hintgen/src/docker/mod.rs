//! Docker module — bollard client, container inspection, mount tables.

pub mod client;
pub mod container;
pub mod mount;

pub use client::{DockerClient, DockerError};
pub use mount::{MountPoint, MountTable};
