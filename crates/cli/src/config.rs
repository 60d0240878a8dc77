//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required (network commands only)
//! - `RED_LANTERN_API_URL` - Base URL of the ordering backend
//!
//! ## Optional
//! - `RED_LANTERN_DATA_DIR` - Directory for cart/identity storage
//!   (default: .red-lantern)

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use url::Url;

use red_lantern_cart::{CartManager, CartStorage, DeviceIdentity, FileStorage};
use red_lantern_client::ApiClient;

const DEFAULT_DATA_DIR: &str = ".red-lantern";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CLI application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend base URL; commands that stay on-device work without it.
    api_url: Option<Url>,
    /// Where cart state and the installation identity live.
    data_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a provided variable fails to parse. A
    /// missing API URL is not an error here - only network commands
    /// need it, and they fail when they ask for the client.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = match std::env::var("RED_LANTERN_API_URL") {
            Ok(raw) => Some(Url::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("RED_LANTERN_API_URL".to_string(), e.to_string())
            })?),
            Err(_) => None,
        };

        let data_dir = std::env::var("RED_LANTERN_DATA_DIR")
            .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
            .into();

        Ok(Self { api_url, data_dir })
    }

    /// Build the backend API client.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` when `RED_LANTERN_API_URL`
    /// is not set.
    pub fn api_client(&self) -> Result<ApiClient, ConfigError> {
        self.api_url.as_ref().map(ApiClient::new).ok_or_else(|| {
            ConfigError::MissingEnvVar("RED_LANTERN_API_URL".to_string())
        })
    }

    /// Build the cart manager over file-backed storage in the data
    /// directory, with the device-derived identity.
    #[must_use]
    pub fn cart_manager(&self) -> CartManager {
        let storage: Arc<dyn CartStorage> = Arc::new(FileStorage::new(&self.data_dir));
        let identity = Arc::new(DeviceIdentity::new(Arc::clone(&storage)));
        CartManager::new(storage, identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_client_requires_url() {
        let config = AppConfig {
            api_url: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        };
        let err = config.api_client().err().map(|e| e.to_string());
        assert_eq!(
            err.as_deref(),
            Some("Missing environment variable: RED_LANTERN_API_URL")
        );
    }

    #[test]
    fn test_cart_manager_without_api_url() {
        let config = AppConfig {
            api_url: None,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        };
        // On-device commands never need the backend.
        let _manager = config.cart_manager();
    }
}
