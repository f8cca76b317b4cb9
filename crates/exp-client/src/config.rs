//! Client configuration management

use std::path::{Path, PathBuf};

use exp_primitives::Address;
use exp_rpc::BlockParam;
use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// RPC endpoint URL
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Block used when a call leaves its block argument out
    #[serde(default)]
    pub default_block: BlockParam,
    /// Sender used when a call object has no `from`
    #[serde(default)]
    pub default_account: Option<String>,
    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Log filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Properties served from cache instead of read live
    #[serde(default)]
    pub cached_properties: Vec<String>,
}

fn default_rpc_url() -> String {
    "http://localhost:8545".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            default_block: BlockParam::default(),
            default_account: None,
            timeout_secs: default_timeout_secs(),
            log_level: default_log_level(),
            cached_properties: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Get the config directory path
    pub fn config_dir() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".exp"))
    }

    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|d| d.join("config.toml"))
    }

    /// Load config from the default location or return defaults
    ///
    /// A missing or unreadable file yields the defaults; use
    /// [`from_file`](Self::from_file) to see the error instead.
    pub fn load() -> Self {
        Self::config_path()
            .filter(|path| path.exists())
            .and_then(|path| match Self::from_file(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                    None
                }
            })
            .unwrap_or_default()
    }

    /// Read and parse a config file
    pub fn from_file(path: impl AsRef<Path>) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse config from TOML text
    pub fn from_toml(content: &str) -> ClientResult<Self> {
        let config: Self = toml::from_str(content)?;
        config.default_account()?;
        Ok(config)
    }

    /// Parsed default account
    pub fn default_account(&self) -> ClientResult<Option<Address>> {
        self.default_account
            .as_deref()
            .map(|s| {
                Address::from_hex(s)
                    .map_err(|e| ClientError::Config(format!("default_account: {}", e)))
            })
            .transpose()
    }

    /// Whether reads of `property` should be cached
    pub fn is_cached(&self, property: &str) -> bool {
        self.cached_properties.iter().any(|p| p == property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.default_block, BlockParam::Latest);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.log_level, "info");
        assert!(config.default_account.is_none());
        assert!(config.cached_properties.is_empty());
    }

    #[test]
    fn test_config_deserialize() {
        let toml = r#"
            rpc_url = "http://example.com:8545"
            default_block = 1200
            default_account = "0x407d73d8a49eeb85d32cf465507dd71d507100c1"
            timeout_secs = 5
            cached_properties = ["coinbase", "accounts"]
        "#;
        let config = ClientConfig::from_toml(toml).unwrap();
        assert_eq!(config.rpc_url, "http://example.com:8545");
        assert_eq!(config.default_block, BlockParam::Number(1200));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.log_level, "info");
        assert!(config.is_cached("coinbase"));
        assert!(!config.is_cached("blockNumber"));
        assert_eq!(
            config.default_account().unwrap().unwrap().to_hex(),
            "0x407d73d8a49eeb85d32cf465507dd71d507100c1"
        );
    }

    #[test]
    fn test_config_block_tokens() {
        let config = ClientConfig::from_toml(r#"default_block = "pending""#).unwrap();
        assert_eq!(config.default_block, BlockParam::Pending);
    }

    #[test]
    fn test_config_rejects_bad_account() {
        let result = ClientConfig::from_toml(r#"default_account = "0x1234""#);
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_config_rejects_bad_toml() {
        let result = ClientConfig::from_toml("rpc_url = ");
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"rpc_url = "http://127.0.0.1:9000""#).unwrap();
        let config = ClientConfig::from_file(file.path()).unwrap();
        assert_eq!(config.rpc_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ClientConfig::from_file(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ClientError::Io(_))));
    }

    #[test]
    fn test_config_serialize_roundtrip() {
        let config = ClientConfig {
            default_block: BlockParam::Earliest,
            cached_properties: vec!["mining".to_string()],
            ..ClientConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("rpc_url"));
        assert_eq!(ClientConfig::from_toml(&text).unwrap(), config);
    }
}
