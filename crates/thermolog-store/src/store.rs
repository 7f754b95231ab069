//! Main store implementation.

use std::path::Path;
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, Row};
use tracing::{debug, info};

use thermolog_types::{Bound, Reading, Series};

use crate::error::{Error, Result};
use crate::models::Summary;
use crate::queries::RangeQuery;
use crate::schema;

/// Read-only SQLite store over the temperature series.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open an existing database at the given path, read-only.
    ///
    /// The file must already exist and contain the three series tables.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        info!("Opening database at {} (read-only)", path.display());
        // Read-only opens never create the file, so a missing one surfaces here.
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::CannotOpen =>
            {
                Error::MissingDatabase(path.to_path_buf())
            }
            other => Error::Database(other),
        })?;
        conn.execute_batch("PRAGMA query_only = ON;")?;

        schema::verify(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open a writable in-memory database with empty series tables (for testing).
    #[cfg(any(test, feature = "test-util"))]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::create(&conn)?;
        Ok(Self { conn })
    }

    /// How long a query waits on a locked database before failing.
    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }
}

fn reading_from_row(row: &Row<'_>) -> rusqlite::Result<Reading> {
    Ok(Reading {
        id: row.get(0)?,
        timestamp: row.get(1)?,
        temperature: row.get(2)?,
    })
}

// Read operations
impl Store {
    /// Every row of a series, in primary-key (insertion) order.
    pub fn all(&self, series: Series) -> Result<Vec<Reading>> {
        let sql = format!(
            "SELECT id, timestamp, temperature FROM {} ORDER BY id",
            series.table()
        );
        debug!("Executing query: {}", sql);

        let mut stmt = self.conn.prepare(&sql)?;
        let readings = stmt
            .query_map([], reading_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Query rows matching a range query.
    pub fn query_range(&self, query: &RangeQuery) -> Result<Vec<Reading>> {
        let (sql, params) = query.build_select();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let readings = stmt
            .query_map(params_ref.as_slice(), reading_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// The row with the greatest timestamp, ties going to the greatest id.
    pub fn latest(&self, series: Series) -> Result<Option<Reading>> {
        let query = RangeQuery::new(series).newest_first().limit(1);
        let mut readings = self.query_range(&query)?;
        Ok(readings.pop())
    }

    /// Count, mean, minimum and maximum temperature of the matching rows.
    pub fn summarize(&self, query: &RangeQuery) -> Result<Summary> {
        let (sql, params) = query.build_summary();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let summary = self
            .conn
            .query_row(&sql, params_ref.as_slice(), |row| {
                Ok(Summary {
                    count: row.get::<_, i64>(0)? as u64,
                    average: row.get(1)?,
                    min: row.get(2)?,
                    max: row.get(3)?,
                })
            })?;

        Ok(summary)
    }

    /// Summarize the day of data leading up to the newest row of a series.
    ///
    /// Returns `None` when the series is empty.
    pub fn summarize_last_day(&self, series: Series) -> Result<Option<(Bound, Summary)>> {
        let Some(latest) = self.latest(series)? else {
            return Ok(None);
        };

        let newest: thermolog_types::CanonicalTimestamp = latest
            .timestamp
            .parse()
            .map_err(|_| Error::InvalidTimestamp(latest.timestamp.clone()))?;
        let since = Bound::Exclusive(
            newest
                .previous_day()
                .ok_or_else(|| Error::InvalidTimestamp(latest.timestamp.clone()))?,
        );

        let summary = self.summarize(&RangeQuery::new(series).after(since))?;
        Ok(Some((since, summary)))
    }

    /// Number of rows in a series.
    pub fn count(&self, series: Series) -> Result<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", series.table()),
            [],
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }
}

// Seeding (tests only)
#[cfg(any(test, feature = "test-util"))]
impl Store {
    /// Insert a row, returning its id.
    pub fn insert(&self, series: Series, timestamp: &str, temperature: f64) -> Result<i64> {
        self.conn.execute(
            &format!(
                "INSERT INTO {} (timestamp, temperature) VALUES (?1, ?2)",
                series.table()
            ),
            rusqlite::params![timestamp, temperature],
        )?;

        Ok(self.conn.last_insert_rowid())
    }
}
