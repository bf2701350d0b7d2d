use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub etcd: EtcdConfig,
    pub pd: PdConfig,
    pub logging: LoggingConfig,
    /// Overall deadline for one topology query, in seconds
    pub query_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            etcd: EtcdConfig::default(),
            pd: PdConfig::default(),
            logging: LoggingConfig::default(),
            query_timeout_secs: 30,
        }
    }
}

/// Coordination service (etcd) connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EtcdConfig {
    pub endpoints: Vec<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub connect_timeout_secs: u64,
    /// Per-request timeout applied on top of the caller's deadline
    pub request_timeout_secs: u64,
}

impl Default for EtcdConfig {
    fn default() -> Self {
        Self {
            endpoints: vec!["http://127.0.0.1:2379".to_string()],
            username: None,
            password: None,
            connect_timeout_secs: 5,
            request_timeout_secs: 2,
        }
    }
}

impl EtcdConfig {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Cluster-management (PD HTTP API) settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdConfig {
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for PdConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:2379".to_string(),
            connect_timeout_secs: 5,
            timeout_secs: 10,
        }
    }
}

impl PdConfig {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // CLUSTERTOPO_PD__ENDPOINT, CLUSTERTOPO_ETCD__REQUEST_TIMEOUT_SECS, ...
        builder = builder.add_source(
            Environment::with_prefix("CLUSTERTOPO")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("etcd.endpoints")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Check the loaded values, collecting every problem found
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.etcd.endpoints.is_empty() {
            errors.push("etcd.endpoints must list at least one endpoint".to_string());
        }
        if self.etcd.endpoints.iter().any(|e| e.trim().is_empty()) {
            errors.push("etcd.endpoints contains an empty entry".to_string());
        }
        if self.etcd.username.is_some() != self.etcd.password.is_some() {
            errors.push("etcd.username and etcd.password must be set together".to_string());
        }
        if self.etcd.request_timeout_secs == 0 {
            errors.push("etcd.request_timeout_secs must be greater than 0".to_string());
        }

        if url::Url::parse(&self.pd.endpoint).is_err() {
            errors.push(format!("pd.endpoint is not a valid URL: {}", self.pd.endpoint));
        }
        if self.pd.timeout_secs == 0 {
            errors.push("pd.timeout_secs must be greater than 0".to_string());
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!(
                "logging.format must be \"json\" or \"pretty\", got {:?}",
                self.logging.format
            ));
        }
        if self.query_timeout_secs == 0 {
            errors.push("query_timeout_secs must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
