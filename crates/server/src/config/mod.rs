//! Configuration for the organizer server.
//!
//! Settings are read from a RON file (see [`loader`]) and may be overridden
//! by environment variables. Every section has defaults, so an empty or
//! missing file yields a runnable configuration.

pub mod loader;

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

pub const DB_PATH_ENV: &str = "ORGANIZER_DB_PATH";
pub const BIND_ENV: &str = "ORGANIZER_BIND";

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerSettings,

    #[serde(default)]
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ServerSettings {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Base URL used to build absolute links in API responses. When unset,
    /// links are derived from `bind`.
    #[serde(default)]
    pub public_url: Option<String>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            public_url: None,
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        self.bind
            .parse()
            .map_err(|_| format!("Bind address '{}' is not a valid socket address", self.bind))
    }

    /// Public base URL without a trailing slash.
    pub fn base_url(&self) -> Result<String, String> {
        let raw = match &self.public_url {
            Some(url) => url.clone(),
            None => {
                let addr = self.bind_addr()?;
                let host = if addr.ip().is_unspecified() {
                    "localhost".to_string()
                } else {
                    addr.ip().to_string()
                };
                format!("http://{host}:{}", addr.port())
            }
        };

        let url = Url::parse(&raw).map_err(|_| format!("Public URL '{raw}' is not a valid URL"))?;
        Ok(url.as_str().trim_end_matches('/').to_string())
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct DatabaseSettings {
    /// Directory holding `organizer.db`
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl Config {
    /// Applies `ORGANIZER_DB_PATH` and `ORGANIZER_BIND` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            self.database.path = PathBuf::from(path);
        }
        if let Ok(bind) = std::env::var(BIND_ENV) {
            self.server.bind = bind;
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        self.server.bind_addr()?;
        self.server.base_url()?;

        if self.database.max_connections == 0 {
            return Err("database.max_connections must be at least 1".to_string());
        }

        Ok(())
    }
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from(".organizer")
}

fn default_max_connections() -> u32 {
    5
}
