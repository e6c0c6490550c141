//! Environment-driven server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "MediScrape";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Model used when `MEDISCRAPE_MODEL` is not set.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Bind address used when `MEDISCRAPE_ADDR` is not set.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// Gemini API key (`GEMINI_API_KEY`, required).
    pub gemini_api_key: String,
    /// Gemini model name.
    pub gemini_model: String,
    /// Directory holding the SQLite database.
    pub data_dir: PathBuf,
    /// Exact CORS origin to allow. `None` allows any origin.
    pub allowed_origin: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingVar(&'static str),

    #[error("Invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

impl Config {
    /// Read configuration from the environment.
    ///
    /// `GEMINI_API_KEY` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingVar("GEMINI_API_KEY"))?;

        let addr_raw =
            std::env::var("MEDISCRAPE_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = addr_raw.parse().map_err(|_| ConfigError::Invalid {
            name: "MEDISCRAPE_ADDR",
            value: addr_raw.clone(),
        })?;

        let gemini_model = std::env::var("MEDISCRAPE_MODEL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());

        let data_dir = std::env::var("MEDISCRAPE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_data_dir());

        let allowed_origin = std::env::var("MEDISCRAPE_ALLOWED_ORIGIN")
            .ok()
            .filter(|o| !o.trim().is_empty());

        Ok(Self {
            bind_addr,
            gemini_api_key,
            gemini_model,
            data_dir,
            allowed_origin,
        })
    }
}

/// Get the application data directory
/// ~/MediScrape/ on all platforms (user-visible)
pub fn default_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Default `RUST_LOG`-style filter when the env var is absent.
pub fn default_log_filter() -> &'static str {
    "mediscrape=info,tower_http=info"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_data_dir_under_home() {
        let dir = default_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("MediScrape"));
    }

    #[test]
    fn default_bind_addr_parses() {
        let addr: SocketAddr = DEFAULT_BIND_ADDR.parse().unwrap();
        assert_eq!(addr.port(), 5000);
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn log_filter_covers_own_crate() {
        assert!(default_log_filter().contains("mediscrape"));
    }
}
