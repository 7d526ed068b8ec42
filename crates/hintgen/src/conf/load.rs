//! Load — config loading from file and environment variables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::model::BuilderConfig;
use crate::docker::client::parse_api_version;
use crate::error::BuildError;

const DEFAULT_CONFIG_PATH: &str = "/etc/hintgen/hintgen.toml";

impl BuilderConfig {
    /// Load configuration from file or environment variables
    /// Priority: Environment Variables > Config File > Defaults
    pub fn load() -> Result<Self, BuildError> {
        let config_path = std::env::var("HINTGEN_CONFIG_FILE")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let mut config = if Path::new(&config_path).exists() {
            tracing::info!("Loading configuration from: {}", config_path);
            Self::from_file(&config_path)?
        } else {
            tracing::info!("Config file not found at {}, using environment variables", config_path);
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: &str) -> Result<Self, BuildError> {
        let mut file = File::open(path)
            .map_err(|e| BuildError::Construction(format!("open {}: {}", path, e)))?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| BuildError::Construction(format!("read {}: {}", path, e)))?;

        Self::from_toml(&contents)
            .map_err(|e| BuildError::Construction(format!("parse {}: {}", path, e)))
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Environment variables override file config for the settings that
    /// differ per node.
    pub fn apply_env(&mut self) {
        if let Ok(prefix) = std::env::var("HINTGEN_PREFIX") {
            self.prefix = prefix;
        }
        if let Ok(key) = std::env::var("HINTGEN_KEY") {
            self.key = key;
        }
        if let Ok(topic_prefix) = std::env::var("HINTGEN_TOPIC_PREFIX") {
            self.topic_prefix = topic_prefix;
        }
        if let Ok(host) = std::env::var("DOCKER_HOST") {
            self.docker_host = host;
        }
        if let Ok(version) = std::env::var("HINTGEN_DOCKER_API_VERSION") {
            self.docker_api_version = version;
        }
        if let Ok(skip) = std::env::var("HINTGEN_SKIP") {
            self.skip = skip
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(timeout) = std::env::var("HINTGEN_INSPECT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            self.inspect_timeout_ms = timeout;
        }
    }

    /// Validate configuration values. Every failure here is fatal at startup.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.prefix.is_empty() {
            return Err(BuildError::Construction("prefix must not be empty".to_string()));
        }
        if self.key.is_empty() {
            return Err(BuildError::Construction("key must not be empty".to_string()));
        }
        if self.key.contains('.') || self.key.contains('/') {
            return Err(BuildError::Construction(format!(
                "key '{}' must be a single segment",
                self.key
            )));
        }
        if parse_api_version(&self.docker_api_version).is_none() {
            return Err(BuildError::Construction(format!(
                "docker_api_version '{}' is not MAJOR.MINOR",
                self.docker_api_version
            )));
        }
        if !self.docker_host.is_empty()
            && !["unix://", "tcp://", "http://"]
                .iter()
                .any(|scheme| self.docker_host.starts_with(scheme))
        {
            return Err(BuildError::Construction(format!(
                "docker_host '{}' must use unix://, tcp:// or http://",
                self.docker_host
            )));
        }
        if self.inspect_timeout_ms == 0 {
            return Err(BuildError::Construction("inspect_timeout_ms must be > 0".to_string()));
        }
        if self.decode_processor.is_empty() {
            return Err(BuildError::Construction("decode_processor must not be empty".to_string()));
        }
        if self.max_concurrent_events == 0 {
            return Err(BuildError::Construction("max_concurrent_events must be > 0".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(BuilderConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_key() {
        let cfg = BuilderConfig {
            key: String::new(),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("key"), "Error should mention key: {}", err);
    }

    #[test]
    fn test_validate_rejects_dotted_key() {
        let cfg = BuilderConfig {
            key: "logs.app".to_string(),
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(BuildError::Construction(_))));
    }

    #[test]
    fn test_validate_rejects_bad_api_version() {
        let cfg = BuilderConfig {
            docker_api_version: "latest".to_string(),
            ..Default::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("docker_api_version"));
    }

    #[test]
    fn test_validate_rejects_unknown_scheme() {
        let cfg = BuilderConfig {
            docker_host: "ssh://node".to_string(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let cfg = BuilderConfig {
            inspect_timeout_ms: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_allows_zero_indexed_sets() {
        // Disables indexed sets; the unindexed set still applies.
        let cfg = BuilderConfig {
            max_extern_path_sets: 0,
            ..Default::default()
        };
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_from_file_missing_is_construction_error() {
        let err = BuilderConfig::from_file("/nonexistent/hintgen.toml").unwrap_err();
        assert!(matches!(err, BuildError::Construction(_)));
    }

    #[test]
    fn test_from_file_reads_toml() {
        let path = std::env::temp_dir().join(format!("hintgen-test-{}.toml", std::process::id()));
        std::fs::write(&path, "topic_prefix = \"prod\"\nmax_extern_path_sets = 3\n")
            .expect("write temp config");
        let cfg = BuilderConfig::from_file(path.to_str().expect("utf8 path")).expect("valid file");
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.topic_prefix, "prod");
        assert_eq!(cfg.max_extern_path_sets, 3);
        assert_eq!(cfg.key, "logs");
    }

    #[test]
    fn test_from_toml_rejects_wrong_type() {
        assert!(BuilderConfig::from_toml("skip = \"not-a-list\"").is_err());
    }
}
