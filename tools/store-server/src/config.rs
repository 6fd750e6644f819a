//! Server configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use store_api::StoreSection;

/// Server configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Store behaviour: currency, shipping, tax.
    #[serde(default)]
    pub store: StoreSection,

    /// HTTP listener.
    #[serde(default)]
    pub server: ServerConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StoreConfig {
    /// Load config from a file. `.json` files are read as JSON, anything
    /// else as TOML.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind (default: 127.0.0.1:8080).
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Answer cross-origin requests from any origin.
    #[serde(default)]
    pub enable_cors: bool,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            enable_cors: false,
        }
    }
}

/// Logging configuration. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

/// A commented starting point for `store.toml`.
pub fn generate_default_config() -> String {
    r#"# Store server configuration

[store]
currency = "USD"
shipping_enabled = true
tax_rate_percent = 0.0
tax_shipping = true

[server]
listen_addr = "127.0.0.1:8080"
enable_cors = false

[logging]
level = "info"
json = false
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let parsed: StoreConfig = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(parsed, StoreConfig::default());
    }

    #[test]
    fn test_partial_toml() {
        let parsed: StoreConfig = toml::from_str(
            r#"
[store]
currency = "EUR"
shipping_enabled = false

[logging]
json = true
"#,
        )
        .unwrap();
        assert_eq!(parsed.store.currency, "EUR");
        assert!(!parsed.store.shipping_enabled);
        assert_eq!(parsed.server.listen_addr, "127.0.0.1:8080");
        assert_eq!(parsed.logging.level, "info");
        assert!(parsed.logging.json);
    }

    #[test]
    fn test_load_json_file() {
        let path = std::env::temp_dir().join(format!("store-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"server": {"listen_addr": "0.0.0.0:9000", "enable_cors": true}}"#).unwrap();

        let loaded = StoreConfig::load(path.to_str().unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded.server.listen_addr, "0.0.0.0:9000");
        assert!(loaded.server.enable_cors);
        assert_eq!(loaded.store, StoreSection::default());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = StoreConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read config file"));
    }
}
