//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and `IMPLEXA_*` environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Hosted backend project (auth, content store, image bucket)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: String,

    /// Public anonymous key
    #[serde(default)]
    pub anon_key: String,

    #[serde(default = "default_storage_bucket")]
    pub storage_bucket: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_storage_bucket() -> String {
    "implexa-images".to_string()
}

fn default_request_timeout() -> u64 {
    10_000
}

impl BackendConfig {
    /// Both the URL and the key are set
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.anon_key.trim().is_empty()
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            storage_bucket: default_storage_bucket(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

/// Session gate configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// How long the initial session lookup may take before the site
    /// continues signed out
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout_ms: u64,
}

fn default_resolve_timeout() -> u64 {
    5000
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_ms: default_resolve_timeout(),
        }
    }
}

/// Static site host configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding the built browser bundle
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Document served for every path that is not a file
    #[serde(default = "default_index_file")]
    pub index_file: String,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_static_dir() -> String {
    "./implexa-ui/dist".to_string()
}

fn default_index_file() -> String {
    "index.html".to_string()
}

impl ServerConfig {
    pub fn index_path(&self) -> PathBuf {
        Path::new(&self.static_dir).join(&self.index_file)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
            index_file: default_index_file(),
            cors_origins: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            default_config_path(),
            Some(PathBuf::from("/etc/implexa/config.toml")),
            Some(PathBuf::from("./implexa.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Backend
        if let Some(url) = var("IMPLEXA_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Some(key) = var("IMPLEXA_BACKEND_ANON_KEY") {
            self.backend.anon_key = key;
        }
        if let Some(bucket) = var("IMPLEXA_STORAGE_BUCKET") {
            self.backend.storage_bucket = bucket;
        }
        if let Some(ms) = var("IMPLEXA_REQUEST_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.backend.request_timeout_ms = ms;
        }

        // Session
        if let Some(ms) = var("IMPLEXA_SESSION_TIMEOUT_MS").and_then(|v| v.parse().ok()) {
            self.session.resolve_timeout_ms = ms;
        }

        // Server
        if let Some(host) = var("IMPLEXA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("IMPLEXA_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Some(dir) = var("IMPLEXA_STATIC_DIR") {
            self.server.static_dir = dir;
        }

        // Logging
        if let Some(level) = var("IMPLEXA_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("IMPLEXA_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Public runtime settings handed to the browser bundle
///
/// Only values that are already public (project URL, anonymous key) belong here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiteConfig {
    pub backend_url: String,
    pub anon_key: String,
    pub storage_bucket: String,
    pub session_resolve_timeout_ms: u64,
}

impl SiteConfig {
    /// The public subset of `config`, or `None` when no backend is configured
    pub fn from_config(config: &Config) -> Option<Self> {
        if !config.backend.is_configured() {
            return None;
        }
        Some(Self {
            backend_url: config.backend.url.clone(),
            anon_key: config.backend.anon_key.clone(),
            storage_bucket: config.backend.storage_bucket.clone(),
            session_resolve_timeout_ms: config.session.resolve_timeout_ms,
        })
    }

    /// Backend connection settings for the browser side
    pub fn backend(&self) -> BackendConfig {
        BackendConfig {
            url: self.backend_url.clone(),
            anon_key: self.anon_key.clone(),
            storage_bucket: self.storage_bucket.clone(),
            ..BackendConfig::default()
        }
    }
}

/// Per-user config file, e.g. `~/.config/implexa/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("implexa").join("config.toml"))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Implexa Configuration
#
# Environment variables override these settings:
# - IMPLEXA_BACKEND_URL
# - IMPLEXA_BACKEND_ANON_KEY
# - IMPLEXA_STORAGE_BUCKET
# - IMPLEXA_REQUEST_TIMEOUT_MS
# - IMPLEXA_SESSION_TIMEOUT_MS
# - IMPLEXA_HOST
# - IMPLEXA_PORT
# - IMPLEXA_STATIC_DIR
# - IMPLEXA_LOG_LEVEL
# - IMPLEXA_LOG_FORMAT

[backend]
# Hosted project URL
url = ""

# Public anonymous key
anon_key = ""

# Bucket for blog and executive images
storage_bucket = "implexa-images"

# Per-request timeout (ms)
request_timeout_ms = 10000

[session]
# How long the initial session lookup may take before continuing signed out (ms)
resolve_timeout_ms = 5000

[server]
# Site host address
host = "0.0.0.0"

# Site host port
port = 8080

# Built browser bundle
static_dir = "./implexa-ui/dist"

# Served for every path that is not a file
index_file = "index.html"

# Allowed CORS origins
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/implexa/implexa.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.storage_bucket, "implexa-images");
        assert_eq!(config.session.resolve_timeout_ms, 5000);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert!(!config.backend.is_configured());
    }

    #[test]
    fn test_site_config_exposes_public_settings_only() {
        let mut config = Config::default();
        assert!(SiteConfig::from_config(&config).is_none());

        config.backend.url = "https://project.example.co".to_string();
        config.backend.anon_key = "anon".to_string();
        config.backend.request_timeout_ms = 2500;
        let site = SiteConfig::from_config(&config).unwrap();
        assert_eq!(site.session_resolve_timeout_ms, 5000);

        let backend = site.backend();
        assert!(backend.is_configured());
        assert_eq!(backend.storage_bucket, "implexa-images");
        assert_eq!(backend.request_timeout_ms, 10000);
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        let defaults = Config::default();
        assert_eq!(config.backend.storage_bucket, defaults.backend.storage_bucket);
        assert_eq!(config.backend.request_timeout_ms, defaults.backend.request_timeout_ms);
        assert_eq!(config.session.resolve_timeout_ms, defaults.session.resolve_timeout_ms);
        assert_eq!(config.server.static_dir, defaults.server.static_dir);
        assert_eq!(config.logging.format, defaults.logging.format);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[backend]\nurl = \"https://example.supabase.co\"\nanon_key = \"anon\"\n\n[server]\nport = 9000"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert!(config.backend.is_configured());
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.session.resolve_timeout_ms, 5000);
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/nonexistent/implexa.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nport = \"not a number\"").unwrap();
        assert!(matches!(Config::load(file.path()), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("IMPLEXA_BACKEND_URL", "https://env.supabase.co"),
            ("IMPLEXA_SESSION_TIMEOUT_MS", "250"),
            ("IMPLEXA_PORT", "not-a-port"),
            ("IMPLEXA_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend.url, "https://env.supabase.co");
        assert_eq!(config.session.resolve_timeout_ms, 250);
        // Unparseable values are ignored
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_index_path() {
        let server = ServerConfig {
            static_dir: "/srv/site".into(),
            ..Default::default()
        };
        assert_eq!(server.index_path(), PathBuf::from("/srv/site/index.html"));
    }
}
