use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

use crate::application::dto::MediaPolicy;

/// Runtime mode for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeMode {
    Local,
    Production,
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!("Invalid runtime mode: {s}. Valid values: local, production")),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub mode: RuntimeMode,
    pub api: ApiConfig,
    pub media: MediaConfig,
    pub logging: LoggingConfig,
}

/// Listing media API client configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_seconds: u64,
    pub access_token: Option<String>,
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

/// Per-listing media limits and polling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    pub max_photos: usize,
    pub max_videos: usize,
    pub max_photo_size: u64, // bytes
    pub near_limit_threshold: usize,
    pub poll_interval_seconds: u64,
    pub upload_chunk_size: usize, // bytes
}

impl MediaConfig {
    #[must_use]
    pub fn policy(&self) -> MediaPolicy {
        MediaPolicy {
            max_photos: self.max_photos,
            max_videos: self.max_videos,
            max_photo_size: self.max_photo_size,
            near_limit_threshold: self.near_limit_threshold,
            poll_interval: Duration::from_secs(self.poll_interval_seconds.max(1)),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub filter: Option<String>,
    pub console_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
    Compact,
}

impl AppConfig {
    /// Load configuration based on runtime mode
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load() -> Result<Self, config::ConfigError> {
        // Detect runtime mode from environment (default: local)
        let mode = std::env::var("RUN_MODE")
            .unwrap_or_else(|_| "local".to_string())
            .parse::<RuntimeMode>()
            .map_err(config::ConfigError::Message)?;

        Self::load_for_mode(mode)
    }

    /// Load configuration for a specific runtime mode
    ///
    /// Defaults, then `.env.local` (local mode only), then `LISTING_MEDIA_*`
    /// variables such as `LISTING_MEDIA_API__BASE_URL`.
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or invalid
    pub fn load_for_mode(mode: RuntimeMode) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if mode == RuntimeMode::Local {
            builder = builder.add_source(config::File::with_name(".env.local").required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("LISTING_MEDIA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let (console_format, level) = match mode {
            RuntimeMode::Local => ("pretty", "debug"),
            RuntimeMode::Production => ("json", "info"),
        };

        let settings = builder
            .set_default("mode", mode.to_string())?
            .set_default("api.base_url", "http://localhost:8000")?
            .set_default("api.request_timeout_seconds", 30)?
            .set_default("api.access_token", None::<String>)?
            .set_default("media.max_photos", 50)?
            .set_default("media.max_videos", 2)?
            .set_default("media.max_photo_size", 20_971_520)? // 20MB
            .set_default("media.near_limit_threshold", 5)?
            .set_default("media.poll_interval_seconds", 5)?
            .set_default("media.upload_chunk_size", 262_144)? // 256KB
            .set_default("logging.level", level)?
            .set_default("logging.filter", None::<String>)?
            .set_default("logging.console_format", console_format)?
            .build()?;

        settings.try_deserialize()
    }
}
