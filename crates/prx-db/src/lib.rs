//! # prx-db
//!
//! libSQL database operations for Praxis learning state.
//!
//! Handles all relational state: content items, ordered lessons, learner
//! enrollments, and lesson completion facts. The two subsystems with real
//! invariants live in `repos/`:
//!
//! - the **lesson sequencer** keeps each content item's `order_index` values
//!   dense and contiguous (`0..n-1`) across insert, move, and delete;
//! - the **enrollment ledger** records completion facts idempotently and
//!   keeps each enrollment's percentage and status consistent with them.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29) — native foreign-key
//! cascades, `ON CONFLICT DO NOTHING`, and interactive transactions.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::Builder;

/// Central database handle for all Praxis state operations.
///
/// Wraps a libSQL database and connection. Provides ID generation; all
/// domain operations live on [`service::PraxisService`].
pub struct PraxisDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl PraxisDb {
    /// Open a local-only database at the given path.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let praxis_db = Self { db, conn };
        praxis_db.run_migrations().await?;
        Ok(praxis_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"lsn-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
