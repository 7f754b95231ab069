//! Query builder for bounded range reads.
//!
//! [`RangeQuery`] renders a `SELECT` over one series table. The table name
//! comes from [`Series`] and the comparison operators from the [`Bound`]
//! kind, so the SQL text only ever contains fixed fragments. Timestamps and
//! the row limit are always bound as parameters.
//!
//! # Example
//!
//! ```
//! use thermolog_store::RangeQuery;
//! use thermolog_types::{RangeNormalizer, Series};
//!
//! let range = RangeNormalizer::default().normalize_day(Some("2024-01-05"))?;
//! let query = RangeQuery::new(Series::All).range(&range);
//!
//! assert!(query.start.is_some());
//! assert!(query.end.is_some());
//! # Ok::<(), thermolog_types::ValidationError>(())
//! ```

use rusqlite::ToSql;
use thermolog_types::{Bound, DateRange, Series};

/// Fluent query builder for one series table.
///
/// By default, results are ordered by `timestamp` ascending (oldest first),
/// ties broken by `id`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeQuery {
    /// Table to read.
    pub series: Series,
    /// Lower bound on `timestamp`.
    pub start: Option<Bound>,
    /// Upper bound on `timestamp`.
    pub end: Option<Bound>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Order by timestamp descending (newest first).
    pub newest_first: bool,
}

impl RangeQuery {
    /// Create an unbounded, oldest-first query over `series`.
    pub fn new(series: Series) -> Self {
        Self {
            series,
            start: None,
            end: None,
            limit: None,
            newest_first: false,
        }
    }

    /// Restrict to the given range.
    pub fn range(mut self, range: &DateRange) -> Self {
        self.start = Some(range.start);
        self.end = Some(range.end);
        self
    }

    /// Restrict to rows after the given lower bound.
    pub fn after(mut self, start: Bound) -> Self {
        self.start = Some(start);
        self
    }

    /// Restrict to rows before the given upper bound.
    pub fn before(mut self, end: Bound) -> Self {
        self.end = Some(end);
        self
    }

    /// Limit the maximum number of results returned.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Order results newest first.
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Build the SQL WHERE clause and its parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(start) = self.start {
            conditions.push(if start.is_inclusive() {
                "timestamp >= ?"
            } else {
                "timestamp > ?"
            });
            params.push(Box::new(start.timestamp().to_string()));
        }

        if let Some(end) = self.end {
            conditions.push(if end.is_inclusive() {
                "timestamp <= ?"
            } else {
                "timestamp < ?"
            });
            params.push(Box::new(end.timestamp().to_string()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Build the full SQL query and its parameters.
    pub(crate) fn build_select(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let (where_clause, mut params) = self.build_where();
        let order = if self.newest_first { "DESC" } else { "ASC" };

        let mut sql = format!(
            "SELECT id, timestamp, temperature FROM {} {} ORDER BY timestamp {order}, id {order}",
            self.series.table(),
            where_clause,
        );

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit));
        }

        (sql, params)
    }

    /// Build an aggregate query over the same rows (order and limit ignored).
    pub(crate) fn build_summary(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let (where_clause, params) = self.build_where();
        let sql = format!(
            "SELECT COUNT(*), AVG(temperature), MIN(temperature), MAX(temperature) FROM {} {}",
            self.series.table(),
            where_clause,
        );
        (sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thermolog_types::{DayBoundary, RangeNormalizer};

    fn day(policy: DayBoundary) -> DateRange {
        RangeNormalizer::new(policy)
            .normalize_day(Some("2024-01-05"))
            .unwrap()
    }

    #[test]
    fn test_range_query_new_defaults() {
        let query = RangeQuery::new(Series::Hourly);
        assert_eq!(query.series, Series::Hourly);
        assert!(query.start.is_none());
        assert!(query.end.is_none());
        assert!(query.limit.is_none());
        assert!(!query.newest_first);
    }

    #[test]
    fn test_range_query_chaining() {
        let range = day(DayBoundary::FullDay);
        let query = RangeQuery::new(Series::All)
            .range(&range)
            .limit(10)
            .newest_first();

        assert_eq!(query.start, Some(range.start));
        assert_eq!(query.end, Some(range.end));
        assert_eq!(query.limit, Some(10));
        assert!(query.newest_first);
    }

    #[test]
    fn test_build_where_empty() {
        let (clause, params) = RangeQuery::new(Series::All).build_where();
        assert!(clause.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_build_where_full_day_operators() {
        let (clause, params) = RangeQuery::new(Series::All)
            .range(&day(DayBoundary::FullDay))
            .build_where();
        assert_eq!(clause, "WHERE timestamp >= ? AND timestamp < ?");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_build_where_reference_operators() {
        let (clause, _) = RangeQuery::new(Series::All)
            .range(&day(DayBoundary::Reference))
            .build_where();
        assert_eq!(clause, "WHERE timestamp > ? AND timestamp < ?");
    }

    #[test]
    fn test_build_select_binds_limit() {
        let (sql, params) = RangeQuery::new(Series::Daily)
            .newest_first()
            .limit(1)
            .build_select();

        assert_eq!(
            sql,
            "SELECT id, timestamp, temperature FROM temperature_day  ORDER BY timestamp DESC, id DESC LIMIT ?"
        );
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_sql_never_contains_timestamps() {
        let (sql, _) = RangeQuery::new(Series::All)
            .range(&day(DayBoundary::Reference))
            .build_select();
        assert!(!sql.contains("2024"));
        assert!(!sql.contains('\''));
    }

    #[test]
    fn test_build_summary() {
        let (sql, params) = RangeQuery::new(Series::All)
            .after(Bound::Exclusive("2024/01/04 12:00:00".parse().unwrap()))
            .limit(5)
            .build_summary();

        assert_eq!(
            sql,
            "SELECT COUNT(*), AVG(temperature), MIN(temperature), MAX(temperature) FROM temperature_all WHERE timestamp > ?"
        );
        assert_eq!(params.len(), 1);
    }
}
