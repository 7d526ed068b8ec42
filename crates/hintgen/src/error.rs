//! Error — builder error kinds.
//!
//! Only `Construction` is fatal. The other kinds are logged where they occur
//! and shrink the document set of a single event.

use thiserror::Error;

use crate::docker::client::DockerError;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Hint parse incomplete: {0}")]
    HintParseIncomplete(String),
    #[error("Mount resolution failed for '{set}': {reason}")]
    MountResolutionFailed { set: String, reason: String },
    #[error("Merge conflict on field '{field}': {reason}")]
    MergeConflict { field: String, reason: String },
    #[error("Construction error: {0}")]
    Construction(String),
}

impl From<DockerError> for BuildError {
    fn from(e: DockerError) -> Self {
        BuildError::Construction(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_resolution_message_names_set() {
        let err = BuildError::MountResolutionFailed {
            set: "extern_paths0".to_string(),
            reason: "no mount encloses /opt/app.log".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("extern_paths0"));
        assert!(msg.contains("/opt/app.log"));
    }

    #[test]
    fn test_docker_error_becomes_construction() {
        let err: BuildError = DockerError::ConnectionFailed("no socket".to_string()).into();
        assert!(matches!(err, BuildError::Construction(ref m) if m.contains("no socket")));
    }
}
