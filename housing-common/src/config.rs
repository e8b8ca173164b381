//! Configuration loading and data folder resolution
//!
//! Each setting resolves in priority order:
//! 1. Command-line argument (applied by the binary, highest priority)
//! 2. Environment variable (`HOUSING_*`)
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "HOUSING_CONFIG";

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Document and prediction store settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Folder holding both database files; `None` means the platform default
    pub data_folder: Option<PathBuf>,
    /// Document store file name (relative to the data folder unless absolute)
    pub documents_db: PathBuf,
    /// Prediction store file name (relative to the data folder unless absolute)
    pub predictions_db: PathBuf,
    pub default_db_name: String,
    pub default_collection: String,
    pub predictions_table: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_folder: None,
            documents_db: PathBuf::from("documents.db"),
            predictions_db: PathBuf::from("predictions.db"),
            default_db_name: "housing".to_string(),
            default_collection: "data".to_string(),
            predictions_table: "predictions".to_string(),
        }
    }
}

/// Model artifact settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Artifact path (relative to the data folder unless absolute)
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models").join("model.json"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter directive used when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
        }
    }
}

/// Complete service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

impl HousingConfig {
    /// Parse TOML text; absent keys take compiled defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration from the first TOML file found, then apply environment overrides
    ///
    /// A missing config file is not an error: defaults are used and a warning logged.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match locate_config_file(explicit_path) {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
                info!("Loaded configuration from {}", path.display());
                Self::from_toml_str(&content)?
            }
            Some(path) => {
                warn!("Config file not found: {} (using defaults)", path.display());
                Self::default()
            }
            None => {
                warn!("No config file found (using defaults)");
                Self::default()
            }
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Override settings from `HOUSING_*` environment variables
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("HOUSING_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("HOUSING_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("Invalid HOUSING_PORT: {}", port)))?;
        }
        if let Ok(folder) = std::env::var("HOUSING_DATA_FOLDER") {
            self.storage.data_folder = Some(PathBuf::from(folder));
        }
        if let Ok(path) = std::env::var("HOUSING_MODEL_PATH") {
            self.model.path = PathBuf::from(path);
        }
        if let Ok(level) = std::env::var("HOUSING_LOG_LEVEL") {
            self.logging.level = level.to_lowercase();
        }
        Ok(())
    }

    /// Data folder, falling back to the platform default
    pub fn data_folder(&self) -> PathBuf {
        self.storage
            .data_folder
            .clone()
            .unwrap_or_else(get_default_data_folder)
    }

    pub fn documents_db_path(&self) -> PathBuf {
        self.resolve(&self.storage.documents_db)
    }

    pub fn predictions_db_path(&self) -> PathBuf {
        self.resolve(&self.storage.predictions_db)
    }

    pub fn model_path(&self) -> PathBuf {
        self.resolve(&self.model.path)
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_folder().join(path)
        }
    }
}

/// Pick the config file to read: explicit path, then `HOUSING_CONFIG`, then platform locations
fn locate_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("housing").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/housing/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Get OS-dependent default data folder path
fn get_default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("housing"))
        .unwrap_or_else(|| PathBuf::from("./housing_data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HousingConfig::default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.storage.default_db_name, "housing");
        assert_eq!(config.storage.default_collection, "data");
        assert_eq!(config.storage.predictions_table, "predictions");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = HousingConfig::from_toml_str(
            r#"
            [server]
            port = 9000

            [storage]
            data_folder = "/srv/housing"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(
            config.documents_db_path(),
            PathBuf::from("/srv/housing/documents.db")
        );
        assert_eq!(
            config.model_path(),
            PathBuf::from("/srv/housing/models/model.json")
        );
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let mut config = HousingConfig::default();
        config.model.path = PathBuf::from("/opt/model.json");
        assert_eq!(config.model_path(), PathBuf::from("/opt/model.json"));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = HousingConfig::from_toml_str("[server\nport = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
