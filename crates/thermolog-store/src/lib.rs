//! Read-only access to thermolog temperature series.
//!
//! This crate opens the SQLite database maintained by the ingestion process
//! and answers range, latest-row and aggregate queries over its three
//! series tables (`temperature_all`, `temperature_hour`, `temperature_day`).
//!
//! # Features
//!
//! - Read-only connections; the store never creates or alters a database
//! - Fully parameterized range queries built from validated bounds
//! - Schema verification on open
//! - `test-util` feature: writable in-memory stores for tests
//!
//! # Example
//!
//! ```no_run
//! use thermolog_store::{RangeQuery, Store};
//! use thermolog_types::{RangeNormalizer, Series};
//!
//! let store = Store::open_default()?;
//!
//! let range = RangeNormalizer::default()
//!     .normalize_day(Some("2024-01-05"))
//!     .expect("valid date");
//! let readings = store.query_range(&RangeQuery::new(Series::All).range(&range))?;
//! # Ok::<(), thermolog_store::Error>(())
//! ```

mod error;
mod models;
mod queries;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::Summary;
pub use queries::RangeQuery;
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/thermolog/temperature_logs.db`
/// - macOS: `~/Library/Application Support/thermolog/temperature_logs.db`
/// - Windows: `C:\Users\<user>\AppData\Local\thermolog\temperature_logs.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("thermolog")
        .join("temperature_logs.db")
}
