//! Shared state for the API layer.

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderValue;
use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::config::Settings;
use crate::db;
use crate::scoring::ScoringTables;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub db_path: Arc<PathBuf>,
    pub tables: Arc<ScoringTables>,
    pub pbkdf2_iterations: u32,
    pub cors_origin: Option<HeaderValue>,
}

impl ApiContext {
    pub fn new(settings: &Settings, tables: ScoringTables) -> Self {
        Self {
            db_path: Arc::new(settings.db_path.clone()),
            tables: Arc::new(tables),
            pbkdf2_iterations: settings.pbkdf2_iterations,
            cors_origin: settings.cors_origin.clone(),
        }
    }

    /// One connection per request; the schema is migrated at startup.
    pub fn open_db(&self) -> Result<Connection, ApiError> {
        db::open_connection(&self.db_path).map_err(ApiError::from)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Context over a migrated on-disk database in a temp dir. Keep the
    /// returned `TempDir` alive for the duration of the test.
    pub fn test_context() -> (ApiContext, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("uti.db");
        db::open_database(&path).unwrap();
        let ctx = ApiContext {
            db_path: Arc::new(path),
            tables: Arc::new(ScoringTables::standard().unwrap()),
            pbkdf2_iterations: 1_000,
            cors_origin: None,
        };
        (ctx, dir)
    }
}
