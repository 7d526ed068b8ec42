//! Docker client — core struct, constructor, error types.
//!
//! Domain methods live in sibling modules (`container`) which add
//! `impl DockerClient` blocks.

use bollard::{ClientVersion, Docker};
use thiserror::Error;

/// Seconds bollard waits on the daemon socket before giving up on a request.
const CONNECT_TIMEOUT_SECS: u64 = 120;

#[derive(Error, Debug)]
pub enum DockerError {
    #[error("Docker connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Container not found: {0}")]
    ContainerNotFound(String),
    #[error("Container inspection timed out after {0}ms")]
    Timeout(u64),
    #[error("Bollard error: {0}")]
    BollardError(#[from] bollard::errors::Error),
}

#[derive(Debug, Clone)]
pub struct DockerClient {
    /// The bollard Docker client.  `pub(super)` so that domain modules
    /// in sibling files can call bollard APIs directly.
    pub(super) client: Docker,
    /// The endpoint this client is connected to.
    pub(super) host: String,
}

impl DockerClient {
    /// Connect to the daemon at `host` speaking API version `api_version`
    /// (`MAJOR.MINOR`). An empty host falls back to bollard's defaults.
    pub fn new(host: &str, api_version: &str) -> Result<Self, DockerError> {
        let version = parse_api_version(api_version).ok_or_else(|| {
            DockerError::ConnectionFailed(format!("invalid API version '{}'", api_version))
        })?;

        let connection = if host.is_empty() {
            Docker::connect_with_defaults()
                .map_err(|e| DockerError::ConnectionFailed(e.to_string()))?
        } else if host.starts_with("tcp://") || host.starts_with("http://") {
            Docker::connect_with_http(host, CONNECT_TIMEOUT_SECS, &version)
                .map_err(|e| DockerError::ConnectionFailed(e.to_string()))?
        } else {
            let clean_path = host.trim_start_matches("unix://");
            Docker::connect_with_socket(clean_path, CONNECT_TIMEOUT_SECS, &version)
                .map_err(|e| DockerError::ConnectionFailed(e.to_string()))?
        };

        Ok(DockerClient {
            client: connection,
            host: host.to_string(),
        })
    }

    /// The endpoint this client talks to.
    pub fn host(&self) -> &str {
        &self.host
    }
}

/// Parse a `MAJOR.MINOR` Docker API version string.
pub fn parse_api_version(raw: &str) -> Option<ClientVersion> {
    let (major, minor) = raw.trim().trim_start_matches('v').split_once('.')?;
    Some(ClientVersion {
        major_version: major.parse().ok()?,
        minor_version: minor.parse().ok()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_api_version() {
        let v = parse_api_version("1.23").expect("valid version");
        assert_eq!(v.major_version, 1);
        assert_eq!(v.minor_version, 23);
    }

    #[test]
    fn test_parse_api_version_with_prefix() {
        let v = parse_api_version("v1.41").expect("valid version");
        assert_eq!(v.minor_version, 41);
    }

    #[test]
    fn test_parse_api_version_rejects_garbage() {
        assert!(parse_api_version("1").is_none());
        assert!(parse_api_version("one.two").is_none());
        assert!(parse_api_version("").is_none());
    }

    #[test]
    fn test_new_rejects_bad_version() {
        let err = DockerClient::new("unix:///var/run/docker.sock", "latest").unwrap_err();
        assert!(matches!(err, DockerError::ConnectionFailed(ref m) if m.contains("latest")));
    }
}
