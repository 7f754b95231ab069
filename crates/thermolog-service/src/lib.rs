//! Read-only HTTP API over the thermolog temperature database.
//!
//! This crate provides a service that:
//! - Opens the database written by the ingestion process, read-only
//! - Validates client dates before any query is built
//! - Serves raw readings, hourly and daily rollups as JSON for charting
//!
//! # REST API Endpoints
//!
//! - `GET /api/health` - Service health check
//! - `GET /getAllData` - Every row of the three series
//! - `GET /getCurrentTemperature` - Temperature of the newest reading
//! - `GET /getTemperatureData?selectedDate=YYYY-MM-DD` - Readings of one day
//! - `GET /getPeriodTemperatureData?selectedStartDate=YYYY-MM-DDTHH:MM&selectedEndDate=YYYY-MM-DDTHH:MM` -
//!   Readings strictly between two minutes
//! - `GET /getStats` - Count, mean, minimum and maximum over the last day of data
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/thermolog/server.toml`:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:3000"
//!
//! [storage]
//! path = "~/.local/share/thermolog/temperature_logs.db"
//! busy_timeout_ms = 5000
//!
//! [query]
//! # "full-day" covers [D 00:00:00, D+1 00:00:00)
//! # "reference" covers (D 00:00:00, D 23:59:59)
//! day_boundary = "full-day"
//! ```

pub mod api;
pub mod config;
pub mod query;
pub mod state;

pub use config::{Config, ConfigError, QueryConfig, ServerConfig, StorageConfig};
pub use query::{QueryError, QueryService};
pub use state::AppState;
