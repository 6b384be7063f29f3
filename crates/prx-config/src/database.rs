//! Database location configuration.

use serde::{Deserialize, Serialize};

/// Default on-disk database path, relative to the working directory.
fn default_path() -> String {
    ".praxis/praxis.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the libSQL database file. `":memory:"` for ephemeral use.
    #[serde(default = "default_path")]
    pub path: String,
}

impl DatabaseConfig {
    /// Whether the database is in-memory (no durable state).
    #[must_use]
    pub fn is_ephemeral(&self) -> bool {
        self.path == ":memory:"
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
        }
    }
}
