//! Bootstrap configuration and root folder resolution
//!
//! Every setting is resolved in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Built-in default (fallback)
//!
//! A missing config file is not an error: the service logs a warning and
//! starts on defaults. A present but unparseable file is an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 5780;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_VISION_BASE_URL: &str = "https://vision.googleapis.com/v1";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

pub const ENV_ROOT_FOLDER: &str = "CROPWISE_ROOT_FOLDER";
pub const ENV_PORT: &str = "CROPWISE_PORT";
pub const ENV_OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_OPENWEATHER_BASE_URL: &str = "OPENWEATHER_BASE_URL";
pub const ENV_VISION_API_KEY: &str = "GOOGLE_VISION_API_KEY";
pub const ENV_VISION_BASE_URL: &str = "GOOGLE_VISION_BASE_URL";

const DATABASE_FILE: &str = "cropwise.db";
const UPLOADS_DIR: &str = "uploads";

/// Configuration as written in `config.toml`
///
/// All fields are optional; anything left out falls through to the
/// built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default)]
    pub bind_address: Option<String>,

    /// OpenWeather `appid`
    #[serde(default)]
    pub openweather_api_key: Option<String>,

    #[serde(default)]
    pub openweather_base_url: Option<String>,

    /// Google Cloud Vision API key
    #[serde(default)]
    pub vision_api_key: Option<String>,

    #[serde(default)]
    pub vision_base_url: Option<String>,

    /// Timeout applied to every outbound HTTP call
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Parse TOML text
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    ///
    /// `path` overrides the default location. An explicitly requested file
    /// that is missing still falls back. Does not log: the caller reports
    /// the returned [`ConfigSource`].
    pub fn load_or_default(path: Option<&Path>) -> Result<(Self, ConfigSource)> {
        let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
            Some(p) => p,
            None => return Ok((Self::default(), ConfigSource::NoConfigDir)),
        };

        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Missing(path)));
        }

        let config = Self::load(&path)?;
        Ok((config, ConfigSource::File(path)))
    }
}

/// Where the bootstrap configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// Nothing at this path, built-in defaults used
    Missing(PathBuf),
    /// Platform has no config directory, built-in defaults used
    NoConfigDir,
}

/// Default config file location: `<config dir>/cropwise/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cropwise").join("config.toml"))
}

/// OS-dependent default root folder (database and uploads live here)
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("cropwise"))
        .unwrap_or_else(|| PathBuf::from("./cropwise_data"))
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub root_folder: Option<PathBuf>,
    pub port: Option<u16>,
}

/// Connection settings for one external HTTP API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoint {
    /// Absent key means calls are still attempted and fail upstream
    pub api_key: Option<String>,
    pub base_url: String,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub bind_address: String,
    pub port: u16,
    pub weather: ApiEndpoint,
    pub vision: ApiEndpoint,
    pub http_timeout: Duration,
}

impl ServiceConfig {
    /// Resolve every setting from CLI, environment, TOML and defaults
    pub fn resolve(cli: &CliOverrides, toml: TomlConfig) -> Result<Self> {
        let root_folder = cli
            .root_folder
            .clone()
            .or_else(|| env_value(ENV_ROOT_FOLDER).map(PathBuf::from))
            .or(toml.root_folder)
            .unwrap_or_else(default_root_folder);

        let env_port = match env_value(ENV_PORT) {
            Some(raw) => Some(raw.parse::<u16>().map_err(|e| {
                Error::Config(format!("{} must be a port number: {}", ENV_PORT, e))
            })?),
            None => None,
        };
        let port = cli.port.or(env_port).or(toml.port).unwrap_or(DEFAULT_PORT);

        let weather = ApiEndpoint {
            api_key: env_value(ENV_OPENWEATHER_API_KEY)
                .or(toml.openweather_api_key)
                .filter(|k| is_valid_key(k)),
            base_url: env_value(ENV_OPENWEATHER_BASE_URL)
                .or(toml.openweather_base_url)
                .unwrap_or_else(|| DEFAULT_OPENWEATHER_BASE_URL.to_string()),
        };

        let vision = ApiEndpoint {
            api_key: env_value(ENV_VISION_API_KEY)
                .or(toml.vision_api_key)
                .filter(|k| is_valid_key(k)),
            base_url: env_value(ENV_VISION_BASE_URL)
                .or(toml.vision_base_url)
                .unwrap_or_else(|| DEFAULT_VISION_BASE_URL.to_string()),
        };

        if weather.api_key.is_none() {
            warn!("OpenWeather API key not configured; season lookups will use the month-only rule");
        }
        if vision.api_key.is_none() {
            warn!("Google Vision API key not configured; OCR requests will fail");
        }

        Ok(Self {
            root_folder,
            bind_address: toml
                .bind_address
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            port,
            weather,
            vision,
            http_timeout: Duration::from_secs(
                toml.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
        })
    }

    /// Path to the SQLite database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    /// Directory that receives uploaded images
    pub fn uploads_dir(&self) -> PathBuf {
        self.root_folder.join(UPLOADS_DIR)
    }

    /// Create the root folder and uploads directory if missing
    pub fn ensure_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        std::fs::create_dir_all(self.uploads_dir())?;
        Ok(())
    }

    /// `host:port` for the listener
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Validate API key (non-empty, non-whitespace)
pub fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_key() {
        assert!(is_valid_key("abc123"));
        assert!(!is_valid_key(""));
        assert!(!is_valid_key("   "));
    }

    #[test]
    fn test_parse_empty_toml_uses_defaults() {
        let config = TomlConfig::parse("").unwrap();
        assert!(config.root_folder.is_none());
        assert!(config.port.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_parse_full_toml() {
        let config = TomlConfig::parse(
            r#"
            root_folder = "/srv/cropwise"
            port = 6000
            bind_address = "0.0.0.0"
            openweather_api_key = "weather-key"
            vision_api_key = "vision-key"
            http_timeout_secs = 3

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.root_folder, Some(PathBuf::from("/srv/cropwise")));
        assert_eq!(config.port, Some(6000));
        assert_eq!(config.bind_address.as_deref(), Some("0.0.0.0"));
        assert_eq!(config.openweather_api_key.as_deref(), Some("weather-key"));
        assert_eq!(config.vision_api_key.as_deref(), Some("vision-key"));
        assert_eq!(config.http_timeout_secs, Some(3));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        assert!(TomlConfig::parse("port = \"not a number\"").is_err());
    }

    #[test]
    fn test_paths_derive_from_root_folder() {
        let config = ServiceConfig {
            root_folder: PathBuf::from("/data/cropwise"),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            weather: ApiEndpoint {
                api_key: None,
                base_url: DEFAULT_OPENWEATHER_BASE_URL.to_string(),
            },
            vision: ApiEndpoint {
                api_key: None,
                base_url: DEFAULT_VISION_BASE_URL.to_string(),
            },
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        assert_eq!(config.database_path(), PathBuf::from("/data/cropwise/cropwise.db"));
        assert_eq!(config.uploads_dir(), PathBuf::from("/data/cropwise/uploads"));
        assert_eq!(config.listen_address(), "127.0.0.1:5780");
    }
}
