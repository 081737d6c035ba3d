use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::crypto::PBKDF2_ITERATIONS;

/// Application-level constants
pub const APP_NAME: &str = "VitalMape UTI";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_BIND_ADDR: &str = "VITALMAPE_BIND_ADDR";
pub const ENV_DB_PATH: &str = "VITALMAPE_DB_PATH";
pub const ENV_CORS_ORIGIN: &str = "VITALMAPE_CORS_ORIGIN";
pub const ENV_PBKDF2_ITERATIONS: &str = "VITALMAPE_PBKDF2_ITERATIONS";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },

    #[error("Cannot determine a default database location; set {ENV_DB_PATH}")]
    NoDataDir,
}

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    if cfg!(debug_assertions) {
        "info,vitalmape_lib=debug"
    } else {
        "info"
    }
}

/// Get the application data directory
/// ~/VitalMape/ on all platforms
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("VitalMape"))
}

/// Runtime settings, supplied by the environment. Nothing secret is
/// embedded here; the database is a local SQLite file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub db_path: PathBuf,
    pub cors_origin: Option<HeaderValue>,
    pub pbkdf2_iterations: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_raw = lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw.parse().map_err(|e| ConfigError::Invalid {
            var: ENV_BIND_ADDR,
            reason: format!("{bind_raw:?}: {e}"),
        })?;

        let db_path = match lookup(ENV_DB_PATH).filter(|p| !p.trim().is_empty()) {
            Some(p) => PathBuf::from(p),
            None => app_data_dir()
                .ok_or(ConfigError::NoDataDir)?
                .join("vitalmape.db"),
        };

        let cors_origin = match lookup(ENV_CORS_ORIGIN).filter(|o| !o.trim().is_empty()) {
            Some(origin) => Some(HeaderValue::from_str(&origin).map_err(|e| {
                ConfigError::Invalid {
                    var: ENV_CORS_ORIGIN,
                    reason: e.to_string(),
                }
            })?),
            None => None,
        };

        let pbkdf2_iterations = match lookup(ENV_PBKDF2_ITERATIONS) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: ENV_PBKDF2_ITERATIONS,
                        reason: format!("{raw:?} is not a positive integer"),
                    })
                }
            },
            None => PBKDF2_ITERATIONS,
        };

        Ok(Self {
            bind_addr,
            db_path,
            cors_origin,
            pbkdf2_iterations,
        })
    }
}
