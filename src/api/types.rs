//! Shared API handler state.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;

use crate::db::{self, DatabaseError};
use crate::extraction::VisionClient;

/// Shared state available to every endpoint handler.
///
/// Cheap to clone: both fields are `Arc`s.
#[derive(Clone)]
pub struct ApiContext {
    /// Path to the SQLite database file.
    pub db_path: Arc<PathBuf>,
    /// Client for the vision model used by prescription analysis.
    pub vision: Arc<dyn VisionClient + Send + Sync>,
}

impl ApiContext {
    pub fn new(db_path: PathBuf, vision: Arc<dyn VisionClient + Send + Sync>) -> Self {
        Self {
            db_path: Arc::new(db_path),
            vision,
        }
    }

    /// Open a database connection for the current request.
    ///
    /// Most common operation in handlers: `let conn = ctx.open_db()?;`
    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        db::open_database(&self.db_path)
    }
}
