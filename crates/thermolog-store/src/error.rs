//! Error types for thermolog-store.

use std::path::PathBuf;

/// Result type for thermolog-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in thermolog-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The database file does not exist. The store never creates one.
    #[error("Database file not found: {}", .0.display())]
    MissingDatabase(PathBuf),

    /// One of the expected relations is absent.
    #[error("Required table '{0}' is missing")]
    MissingTable(&'static str),

    /// A relation exists but lacks a column the queries rely on.
    #[error("Table '{table}' has no column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// A stored timestamp is not in canonical form.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
