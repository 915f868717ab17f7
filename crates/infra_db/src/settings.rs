//! Store configuration

use serde::Deserialize;

/// Runtime configuration for the dairy store
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Database URL
    pub database_url: String,
    /// Maximum database connections
    pub max_connections: u32,
    /// Log level
    pub log_level: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/dairy".to_string(),
            max_connections: 10,
            log_level: "info".to_string(),
        }
    }
}

impl StoreSettings {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("DAIRY"))
            .build()?
            .try_deserialize()
    }

    /// Builds a pool configuration from these settings
    pub fn pool_config(&self) -> crate::DatabaseConfig {
        crate::DatabaseConfig::new(&self.database_url).max_connections(self.max_connections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = StoreSettings::default();
        assert_eq!(settings.database_url, "postgres://localhost/dairy");
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_pool_config_carries_url() {
        let settings = StoreSettings {
            database_url: "postgres://test/dairy".to_string(),
            max_connections: 25,
            ..StoreSettings::default()
        };
        let config = settings.pool_config();
        assert_eq!(config.url, "postgres://test/dairy");
        assert_eq!(config.max_connections, 25);
    }
}
