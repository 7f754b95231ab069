//! Read operations behind the HTTP endpoints.
//!
//! [`QueryService`] validates client input with a [`RangeNormalizer`], runs the
//! resulting query against the shared [`Store`] and shapes the rows into the
//! response models. Input is always validated before the store lock is taken.

use thermolog_store::{Store, Summary};
use thermolog_types::{
    AllData, ChartPayload, CurrentTemperature, DateRange, RangeNormalizer, Series,
    TemperatureStats, ValidationError,
};
use tokio::sync::Mutex;
use tracing::debug;

/// Errors returned by [`QueryService`].
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Client input failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The requested data does not exist.
    #[error("{0}")]
    NotFound(String),
    /// The store failed to answer.
    #[error("store error: {0}")]
    Store(#[from] thermolog_store::Error),
}

/// Temperature series queries over a shared store.
pub struct QueryService {
    store: Mutex<Store>,
    normalizer: RangeNormalizer,
}

impl QueryService {
    /// Create a service over `store`, normalizing dates with `normalizer`.
    pub fn new(store: Store, normalizer: RangeNormalizer) -> Self {
        Self {
            store: Mutex::new(store),
            normalizer,
        }
    }

    /// The normalizer applied to client dates.
    pub fn normalizer(&self) -> &RangeNormalizer {
        &self.normalizer
    }

    /// Full contents of the three series, each in primary-key order.
    pub async fn all_data(&self) -> Result<AllData, QueryError> {
        let store = self.store.lock().await;
        Ok(AllData {
            temperature_all: store.all(Series::All)?,
            temperature_hour: store.all(Series::Hourly)?,
            temperature_day: store.all(Series::Daily)?,
        })
    }

    /// Temperature of the newest raw reading.
    pub async fn current_temperature(&self) -> Result<CurrentTemperature, QueryError> {
        let latest = self.store.lock().await.latest(Series::All)?;
        let reading =
            latest.ok_or_else(|| QueryError::NotFound("no temperature data available".into()))?;

        Ok(CurrentTemperature {
            current_temperature: reading.temperature,
        })
    }

    /// Raw readings of one calendar day (`YYYY-MM-DD`).
    pub async fn temperature_data(&self, date: Option<&str>) -> Result<ChartPayload, QueryError> {
        let range = self.normalizer.normalize_day(date)?;
        self.chart(&range).await
    }

    /// Raw readings strictly between two minutes (`YYYY-MM-DDTHH:MM`).
    ///
    /// An end before the start is not an error; it matches nothing.
    pub async fn period_temperature_data(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<ChartPayload, QueryError> {
        let range = self.normalizer.normalize_period(start, end)?;
        self.chart(&range).await
    }

    /// Count, mean, minimum and maximum over the day before the newest reading.
    pub async fn stats(&self) -> Result<TemperatureStats, QueryError> {
        let window = self.store.lock().await.summarize_last_day(Series::All)?;
        let (since, summary) =
            window.ok_or_else(|| QueryError::NotFound("no temperature data available".into()))?;

        let Summary {
            count,
            average: Some(average),
            min: Some(min),
            max: Some(max),
        } = summary
        else {
            return Err(QueryError::NotFound(
                "no temperature data in the last day".into(),
            ));
        };

        Ok(TemperatureStats {
            since: since.timestamp().to_string(),
            count,
            average_temperature: average,
            min_temperature: min,
            max_temperature: max,
        })
    }

    async fn chart(&self, range: &DateRange) -> Result<ChartPayload, QueryError> {
        let query = thermolog_store::RangeQuery::new(Series::All).range(range);
        let readings = self.store.lock().await.query_range(&query)?;
        debug!(rows = readings.len(), "range query complete");
        Ok(ChartPayload::from(readings))
    }
}
