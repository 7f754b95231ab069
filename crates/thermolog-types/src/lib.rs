//! Shared types for thermolog temperature data.
//!
//! This crate holds the domain types used by both the store and the HTTP
//! service, plus the date-range normalization applied to client input.
//! It performs no I/O.
//!
//! # Features
//!
//! - Row and response types ([`Reading`], [`ChartPayload`], [`AllData`])
//! - Canonical store timestamps and range bounds
//! - Validation of client-supplied dates ([`RangeNormalizer`])
//!
//! # Example
//!
//! ```
//! use thermolog_types::{RangeNormalizer, ValidationError};
//!
//! let normalizer = RangeNormalizer::default();
//! assert!(normalizer.normalize_day(Some("2024-01-05")).is_ok());
//! assert!(matches!(
//!     normalizer.normalize_day(Some("2024-01-05' OR 1=1")),
//!     Err(ValidationError::Malformed { .. })
//! ));
//! ```

pub mod error;
pub mod range;
pub mod types;

pub use error::{ValidationError, ValidationResult};
pub use range::{
    Bound, CanonicalTimestamp, DateRange, DayBoundary, ParseDayBoundaryError,
    ParseTimestampError, RangeNormalizer,
};
pub use types::{AllData, ChartPayload, CurrentTemperature, Reading, Series, TemperatureStats};
