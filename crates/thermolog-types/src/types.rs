//! Core types for stored temperature data and the response shapes built from it.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the three relations maintained by the ingestion process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Series {
    /// Every raw reading (`temperature_all`).
    All,
    /// Hourly rollups (`temperature_hour`).
    Hourly,
    /// Daily rollups (`temperature_day`).
    Daily,
}

impl Series {
    /// All series, in the order they appear in a full data dump.
    pub const ALL: [Series; 3] = [Series::All, Series::Hourly, Series::Daily];

    /// Name of the backing table.
    ///
    /// # Examples
    ///
    /// ```
    /// use thermolog_types::Series;
    ///
    /// assert_eq!(Series::All.table(), "temperature_all");
    /// assert_eq!(Series::Hourly.table(), "temperature_hour");
    /// assert_eq!(Series::Daily.table(), "temperature_day");
    /// ```
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Series::All => "temperature_all",
            Series::Hourly => "temperature_hour",
            Series::Daily => "temperature_day",
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table())
    }
}

/// A temperature row, either a raw reading or a rollup bucket.
///
/// `timestamp` is kept exactly as the store holds it (`YYYY/MM/DD HH:MM:SS`),
/// so chart labels match the records they were derived from byte for byte.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reading {
    /// Row ID, monotonic in insertion order.
    pub id: i64,
    /// Store-local civil datetime in canonical text form.
    pub timestamp: String,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
}

impl Reading {
    /// Create a new reading.
    pub fn new(id: i64, timestamp: impl Into<String>, temperature: f64) -> Self {
        Self {
            id,
            timestamp: timestamp.into(),
            temperature,
        }
    }
}

/// Records plus the parallel label and value sequences a chart needs.
///
/// The only way to build a payload is from a list of records, which keeps
/// `records`, `labels` and `values` the same length and positionally aligned.
///
/// # Examples
///
/// ```
/// use thermolog_types::{ChartPayload, Reading};
///
/// let payload = ChartPayload::from(vec![
///     Reading::new(1, "2024/01/05 10:00:00", 20.5),
///     Reading::new(2, "2024/01/05 11:00:00", 21.0),
/// ]);
///
/// assert_eq!(payload.labels(), ["2024/01/05 10:00:00", "2024/01/05 11:00:00"]);
/// assert_eq!(payload.values(), [20.5, 21.0]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ChartPayload {
    #[cfg_attr(feature = "serde", serde(rename = "temperatureData"))]
    records: Vec<Reading>,
    #[cfg_attr(feature = "serde", serde(rename = "chartLabels"))]
    labels: Vec<String>,
    #[cfg_attr(feature = "serde", serde(rename = "chartData"))]
    values: Vec<f64>,
}

impl ChartPayload {
    /// The records, in query order.
    #[must_use]
    pub fn records(&self) -> &[Reading] {
        &self.records
    }

    /// One label per record (its timestamp).
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// One value per record (its temperature).
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the payload holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the payload, returning the records.
    #[must_use]
    pub fn into_records(self) -> Vec<Reading> {
        self.records
    }
}

impl From<Vec<Reading>> for ChartPayload {
    fn from(records: Vec<Reading>) -> Self {
        let labels = records.iter().map(|r| r.timestamp.clone()).collect();
        let values = records.iter().map(|r| r.temperature).collect();
        Self {
            records,
            labels,
            values,
        }
    }
}

/// Complete contents of all three relations.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AllData {
    /// Raw readings.
    pub temperature_all: Vec<Reading>,
    /// Hourly rollups.
    pub temperature_hour: Vec<Reading>,
    /// Daily rollups.
    pub temperature_day: Vec<Reading>,
}

/// The most recent temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CurrentTemperature {
    /// Temperature of the newest reading.
    pub current_temperature: f64,
}

/// Summary of the readings recorded over the last day of data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TemperatureStats {
    /// Exclusive lower bound of the window, in canonical form.
    pub since: String,
    /// Number of readings in the window.
    pub count: u64,
    /// Mean temperature.
    pub average_temperature: f64,
    /// Lowest temperature.
    pub min_temperature: f64,
    /// Highest temperature.
    pub max_temperature: f64,
}
