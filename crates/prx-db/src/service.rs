//! Service layer orchestrating database mutations.
//!
//! `PraxisService` wraps `PraxisDb` (raw database access). All repo methods
//! are implemented as `impl PraxisService` blocks in `repos/`.
//!
//! Every multi-statement mutation (lesson insert/move/delete, enroll,
//! complete-lesson) runs inside one `conn.transaction()` scope: commit on
//! success, rollback on any early return. A crash mid-shift can therefore
//! never leave the lesson sequence with a duplicate or a gap, and two racing
//! completions cannot persist a stale percentage.

use prx_config::PraxisConfig;

use crate::PraxisDb;
use crate::error::DatabaseError;

/// Orchestrates all Praxis database operations.
pub struct PraxisService {
    db: PraxisDb,
}

impl PraxisService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` — Path to the libSQL database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or migrations fail.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = PraxisDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create a service from loaded configuration.
    ///
    /// Creates the parent directory of the database file if needed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created or the
    /// database cannot be opened.
    pub async fn from_config(config: &PraxisConfig) -> Result<Self, DatabaseError> {
        if !config.database.is_ephemeral() {
            if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DatabaseError::Other(anyhow::anyhow!(e)))?;
            }
        }
        Self::new_local(&config.database.path).await
    }

    /// Create from an existing `PraxisDb` (for testing).
    #[must_use]
    pub const fn from_db(db: PraxisDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &PraxisDb {
        &self.db
    }
}
