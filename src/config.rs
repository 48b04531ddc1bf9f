//! Configuration management for the contacts API.
//!
//! This module handles loading and validating configuration from environment variables,
//! with an optional `.env` file loaded first.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Default avatar upload limit: 5 MiB.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Configuration for the contacts API server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address (default: "0.0.0.0")
    pub host: String,

    /// Bind port (default: 5000)
    pub port: u16,

    /// Directory where uploaded avatars are stored (default: "uploads")
    pub upload_dir: PathBuf,

    /// Maximum avatar upload size in bytes (default: 5 MiB)
    pub max_upload_bytes: usize,

    /// Maximum number of contacts in one sync batch (default: 1000)
    pub max_sync_batch: usize,

    /// Maximum number of favorite contacts (default: 5)
    pub favorite_limit: usize,

    /// Base URL used to build links to uploaded files.
    /// When unset, the request's Host header is used.
    pub public_base_url: Option<String>,

    /// Log level used when RUST_LOG is unset (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    /// - `HOST`: Bind address (default: 0.0.0.0)
    /// - `PORT`: Bind port (default: 5000)
    /// - `UPLOAD_DIR`: Avatar directory (default: uploads)
    /// - `MAX_UPLOAD_BYTES`: Upload size limit (default: 5242880)
    /// - `MAX_SYNC_BATCH`: Sync batch bound (default: 1000)
    /// - `FAVORITE_LIMIT`: Favorite quota (default: 5)
    /// - `PUBLIC_BASE_URL`: Base for upload URLs (default: derived from Host)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        // Try to load .env file if it exists (but don't fail if it doesn't)
        let _ = dotenvy::dotenv();

        let defaults = Config::default();

        let host = env::var("HOST").unwrap_or(defaults.host);
        let port = Self::parse_env::<u16>("PORT", defaults.port)?;
        let upload_dir = env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.upload_dir);
        let max_upload_bytes = Self::parse_positive("MAX_UPLOAD_BYTES", defaults.max_upload_bytes)?;
        let max_sync_batch = Self::parse_positive("MAX_SYNC_BATCH", defaults.max_sync_batch)?;
        let favorite_limit = Self::parse_positive("FAVORITE_LIMIT", defaults.favorite_limit)?;

        let public_base_url = match env::var("PUBLIC_BASE_URL") {
            Ok(url) if !url.trim().is_empty() => {
                let url = url.trim().trim_end_matches('/').to_string();
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::InvalidValue {
                        var: "PUBLIC_BASE_URL".to_string(),
                        reason: "Must start with http:// or https://".to_string(),
                    });
                }
                Some(url)
            }
            _ => None,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        let config = Config {
            host,
            port,
            upload_dir,
            max_upload_bytes,
            max_sync_batch,
            favorite_limit,
            public_base_url,
            log_level,
        };
        config.socket_addr()?;
        Ok(config)
    }

    /// Address the server binds to.
    pub fn socket_addr(&self) -> ConfigResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                var: "HOST".to_string(),
                reason: format!("Not a valid IP address: {}", self.host),
            })
    }

    /// Parse an environment variable with a default value.
    fn parse_env<T: std::str::FromStr>(var_name: &str, default: T) -> ConfigResult<T> {
        match env::var(var_name) {
            Ok(val) => val.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as a non-zero usize with a default value.
    fn parse_positive(var_name: &str, default: usize) -> ConfigResult<usize> {
        let value = Self::parse_env::<usize>(var_name, default)?;
        if value == 0 {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }
        Ok(value)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 5000,
            upload_dir: PathBuf::from("uploads"),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            max_sync_batch: crate::services::DEFAULT_MAX_SYNC_BATCH,
            favorite_limit: crate::services::DEFAULT_FAVORITE_LIMIT,
            public_base_url: None,
            log_level: "info".to_string(),
        }
    }
}
