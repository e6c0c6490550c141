//! Shared application state — database location plus the vision model client.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;

use crate::db::{sqlite::open_database, DatabaseError};
use crate::gemini::VisionModel;

/// Process-wide state handed to the API layer.
///
/// Holds the database path rather than a connection: handlers open a
/// short-lived connection per request, so no connection ever crosses an
/// await point.
pub struct AppState {
    db_path: PathBuf,
    pub vision: Arc<dyn VisionModel>,
}

impl AppState {
    /// Create the state and run migrations against the database once.
    pub fn new(
        db_path: PathBuf,
        vision: Arc<dyn VisionModel>,
    ) -> Result<Self, DatabaseError> {
        // Opening runs migrations; do it eagerly so a broken schema fails
        // at startup instead of on the first request.
        let _ = open_database(&db_path)?;
        Ok(Self { db_path, vision })
    }

    /// Open a connection for the current request.
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        open_database(&self.db_path)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}
