use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors produced by configuration validation
#[derive(Error, Debug)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid configuration value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Main configuration for the simulator
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Service configuration
    #[serde(default)]
    pub service: ServiceConfig,
    /// Data loading configuration
    #[serde(default)]
    pub data: DataConfig,
    /// Query engine configuration
    #[serde(default)]
    pub query: QueryConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// Service name for logging
    #[serde(default = "default_service_name")]
    pub name: String,
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output format (pretty or json)
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

/// Where the three collection resources live and how loading behaves
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Directory containing the collection JSON files
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
    /// File name of the movies resource
    #[serde(default = "default_movies_file")]
    pub movies_file: String,
    /// File name of the persons resource
    #[serde(default = "default_persons_file")]
    pub persons_file: String,
    /// File name of the producers resource
    #[serde(default = "default_producers_file")]
    pub producers_file: String,
    /// Artificial latency added to each fetch, in milliseconds
    #[serde(default = "default_simulated_delay_ms")]
    pub simulated_delay_ms: u64,
}

/// Query engine defaults and caps
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// Page size used when the request gives no usable limit
    #[serde(default = "default_page_limit")]
    pub default_limit: usize,
    /// Hard cap applied to requested page sizes
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

// Default value functions
fn default_service_name() -> String {
    "cinemock".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_movies_file() -> String {
    "movies.json".to_string()
}

fn default_persons_file() -> String {
    "persons.json".to_string()
}

fn default_producers_file() -> String {
    "producers.json".to_string()
}

fn default_simulated_delay_ms() -> u64 {
    250
}

fn default_page_limit() -> usize {
    10
}

fn default_max_limit() -> usize {
    100
}

impl Config {
    /// Load configuration from config files and environment variables.
    ///
    /// Environment overrides use the `CINEMOCK` prefix with `__` as the
    /// section separator: `CINEMOCK__DATA__DIR` -> `data.dir`.
    pub fn load() -> anyhow::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/cinemock").required(false))
            .add_source(config::File::with_name("/etc/cinemock/config").required(false))
            .add_source(
                config::Environment::with_prefix("CINEMOCK")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize().map_err(Into::into)
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.query.default_limit == 0 {
            return Err(ConfigValidationError::InvalidValue {
                field: "query.default_limit".to_string(),
                message: "Default page size must be greater than 0".to_string(),
            });
        }

        if self.query.max_limit < self.query.default_limit {
            return Err(ConfigValidationError::InvalidValue {
                field: "query.max_limit".to_string(),
                message: "Cap must not be below the default page size".to_string(),
            });
        }

        for (field, value) in [
            ("data.movies_file", &self.data.movies_file),
            ("data.persons_file", &self.data.persons_file),
            ("data.producers_file", &self.data.producers_file),
        ] {
            if value.is_empty() {
                return Err(ConfigValidationError::MissingField(field.to_string()));
            }
        }

        Ok(())
    }

    /// Artificial fetch latency as a Duration
    pub fn simulated_delay(&self) -> Duration {
        Duration::from_millis(self.data.simulated_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            data: DataConfig::default(),
            query: QueryConfig::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            movies_file: default_movies_file(),
            persons_file: default_persons_file(),
            producers_file: default_producers_file(),
            simulated_delay_ms: default_simulated_delay_ms(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_limit: default_page_limit(),
            max_limit: default_max_limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.query.default_limit, 10);
        assert_eq!(config.query.max_limit, 100);
        assert_eq!(config.data.movies_file, "movies.json");
        assert_eq!(config.simulated_delay(), Duration::from_millis(250));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_default_limit() {
        let mut config = Config::default();
        config.query.default_limit = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_cap_below_default() {
        let mut config = Config::default();
        config.query.max_limit = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_file_name() {
        let mut config = Config::default();
        config.data.persons_file = String::new();
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::MissingField(field)) if field == "data.persons_file"
        ));
    }
}
