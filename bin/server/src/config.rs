//! Centralized server configuration.
//!
//! Loaded via the `config` crate from environment variables, with `__`
//! separating nested keys (`STORAGE__DATABASE_URL`, `REGISTRY__UNIQUE_NAMES`).

use serde::Deserialize;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Storage backend configuration.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Registry behaviour.
    #[serde(default)]
    pub registry: RegistryConfig,
}

/// Which store backs the registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local storage, lost on restart.
    Memory,
    /// PostgreSQL via `storage.database_url`.
    Postgres,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage backend.
    #[serde(default = "default_backend")]
    pub backend: StorageBackend,

    /// PostgreSQL connection URL, required for the postgres backend.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Registry-related configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Reject a second relationship type or privacy attribute with the same
    /// name under the same owner or object.
    #[serde(default)]
    pub unique_names: bool,
}

fn default_bind_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_backend() -> StorageBackend {
    StorageBackend::Memory
}

fn default_max_connections() -> u32 {
    5
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            database_url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is malformed.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(
            config::Environment::default()
                .separator("__")
                .try_parsing(true),
        )
    }

    fn from_source(
        source: impl config::Source + Send + Sync + 'static,
    ) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::default()
            .separator("__")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn defaults_to_memory_storage() {
        let config = ServerConfig::from_source(env(&[])).expect("defaults");
        assert_eq!(config.bind_addr, "127.0.0.1:3000");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.max_connections, 5);
        assert!(!config.registry.unique_names);
    }

    #[test]
    fn reads_nested_keys() {
        let config = ServerConfig::from_source(env(&[
            ("STORAGE__BACKEND", "postgres"),
            ("STORAGE__DATABASE_URL", "postgres://localhost/tether"),
            ("REGISTRY__UNIQUE_NAMES", "true"),
        ]))
        .expect("parse");

        assert_eq!(config.storage.backend, StorageBackend::Postgres);
        assert_eq!(
            config.storage.database_url.as_deref(),
            Some("postgres://localhost/tether")
        );
        assert!(config.registry.unique_names);
    }
}
