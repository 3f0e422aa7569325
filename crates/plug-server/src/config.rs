//! Configuration file management.
//!
//! `$PLUG_DATA_DIR/config.toml` is read when present; every section falls
//! back to defaults. Deployment secrets and URLs come from the environment
//! and override the file.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Complete server configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP settings.
    #[serde(default)]
    pub server: HttpConfig,
    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Outbound email settings.
    #[serde(default)]
    pub email: EmailConfig,
    /// Abuse limits.
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Socket address to bind.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Public application URL used to build referral and confirmation links.
    #[serde(default = "default_app_url")]
    pub app_url: String,
    /// Allowed CORS origin. `*` allows any.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory. Empty = platform default.
    #[serde(default)]
    pub data_dir: String,
    /// Database file name inside the data directory.
    #[serde(default = "default_db_file")]
    pub db_file: String,
}

/// Email configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Provider API key. Empty = log messages instead of sending.
    #[serde(default)]
    pub api_key: String,
    /// Provider base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// `From:` header.
    #[serde(default = "default_from_address")]
    pub from_address: String,
    /// Per-request timeout.
    #[serde(default = "default_email_timeout")]
    pub timeout_secs: u64,
}

/// Confirmation rate limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Attempts allowed per caller address within the window.
    #[serde(default = "default_confirm_max_attempts")]
    pub confirm_max_attempts: usize,
    /// Rolling window length in minutes.
    #[serde(default = "default_confirm_window_minutes")]
    pub confirm_window_minutes: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "debug" | "info" | "warn" | "error". `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_listen_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_app_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_cors_origin() -> String {
    "*".to_string()
}

fn default_db_file() -> String {
    "waitlist.db".to_string()
}

fn default_api_base_url() -> String {
    plug_mail::resend::DEFAULT_API_BASE.to_string()
}

fn default_from_address() -> String {
    plug_mail::templates::DEFAULT_FROM.to_string()
}

fn default_email_timeout() -> u64 {
    10
}

fn default_confirm_max_attempts() -> usize {
    5
}

fn default_confirm_window_minutes() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            app_url: default_app_url(),
            cors_origin: default_cors_origin(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: String::new(),
            db_file: default_db_file(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            from_address: default_from_address(),
            timeout_secs: default_email_timeout(),
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            confirm_max_attempts: default_confirm_max_attempts(),
            confirm_window_minutes: default_confirm_window_minutes(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the default config file location, then apply
    /// environment overrides.
    ///
    /// Falls back to defaults if file does not exist.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get("PLUG_DATA_DIR") {
            self.storage.data_dir = dir;
        }
        if let Some(addr) = get("PLUG_LISTEN_ADDR") {
            self.server.listen_addr = addr;
        }
        if let Some(url) = get("PLUG_APP_URL").or_else(|| get("NEXT_PUBLIC_APP_URL")) {
            self.server.app_url = url;
        }
        if let Some(key) = get("EMAIL_API_KEY") {
            self.email.api_key = key;
        }
        if let Some(from) = get("PLUG_EMAIL_FROM") {
            self.email.from_address = from;
        }
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        if self.storage.data_dir.is_empty() {
            Self::default_data_dir()
        } else {
            PathBuf::from(&self.storage.data_dir)
        }
    }

    /// Full path of the SQLite database.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir().join(&self.storage.db_file)
    }

    /// Confirmation rate-limit window.
    pub fn confirm_window(&self) -> Duration {
        Duration::from_secs(self.limits.confirm_window_minutes.saturating_mul(60))
    }

    /// Get the config file path.
    fn config_path() -> PathBuf {
        Self::default_data_dir().join("config.toml")
    }

    /// Default data directory: `$PLUG_DATA_DIR`, else `$HOME/.plug-waitlist`.
    fn default_data_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("PLUG_DATA_DIR") {
            return PathBuf::from(dir);
        }
        std::env::var("HOME")
            .map(|h| PathBuf::from(h).join(".plug-waitlist"))
            .unwrap_or_else(|_| PathBuf::from("/tmp/plug-waitlist"))
    }
}
