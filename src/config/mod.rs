use crate::utils::hash::DEFAULT_BLOCK_SIZE;
use std::env;
use std::path::PathBuf;

/// Runtime configuration for the hashing service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Bind address (default: "0.0.0.0")
    pub host: String,

    /// Bind port (default: 8080)
    pub port: u16,

    /// Verbose logging (default: false)
    pub debug: bool,

    /// Maximum request body size in bytes (default: 1 GB)
    pub max_upload_size: usize,

    /// Read size for the digest loop in bytes (default: 64 KB)
    pub block_size: usize,

    /// Directory for staged uploads (default: system temp dir)
    pub temp_dir: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            debug: false,
            max_upload_size: 1024 * 1024 * 1024, // 1 GB
            block_size: DEFAULT_BLOCK_SIZE,
            temp_dir: None,
        }
    }
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();

        Self {
            host: var("HOST")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(default.host),

            port: var("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            debug: var("DEBUG")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(default.debug),

            max_upload_size: var("MAX_UPLOAD_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|&v: &usize| v > 0)
                .unwrap_or(default.max_upload_size),

            block_size: var("HASH_BLOCK_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|&v: &usize| v > 0)
                .unwrap_or(default.block_size),

            temp_dir: var("UPLOAD_TEMP_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .or(default.temp_dir),
        }
    }

    /// Local development: loopback only, verbose logging
    pub fn development() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            debug: true,
            ..Self::default()
        }
    }

    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.debug {
            "hashd=debug,tower_http=debug"
        } else {
            "hashd=info,tower_http=info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert!(!config.debug);
        assert_eq!(config.block_size, 65536);
        assert!(config.temp_dir.is_none());
    }

    #[test]
    fn test_development_config() {
        let config = ServiceConfig::development();
        assert!(config.debug);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.log_filter(), "hashd=debug,tower_http=debug");
    }

    #[test]
    fn test_env_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("DEBUG", "TRUE"),
            ("MAX_UPLOAD_SIZE", "1048576"),
            ("HASH_BLOCK_SIZE", "4096"),
            ("UPLOAD_TEMP_DIR", "/var/tmp/hashd"),
        ]));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9000);
        assert!(config.debug);
        assert_eq!(config.max_upload_size, 1_048_576);
        assert_eq!(config.block_size, 4096);
        assert_eq!(config.temp_dir, Some(PathBuf::from("/var/tmp/hashd")));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("PORT", "not-a-port"),
            ("DEBUG", "nope"),
            ("HASH_BLOCK_SIZE", "0"),
            ("UPLOAD_TEMP_DIR", "  "),
        ]));
        let default = ServiceConfig::default();
        assert_eq!(config.port, default.port);
        assert!(!config.debug);
        assert_eq!(config.block_size, default.block_size);
        assert!(config.temp_dir.is_none());
    }
}
