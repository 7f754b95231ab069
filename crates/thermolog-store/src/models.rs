//! Data models computed from stored rows.

/// Aggregate over the rows matched by a range query.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    /// Number of matching rows.
    pub count: u64,
    /// Mean temperature, `None` when no rows matched.
    pub average: Option<f64>,
    /// Lowest temperature, `None` when no rows matched.
    pub min: Option<f64>,
    /// Highest temperature, `None` when no rows matched.
    pub max: Option<f64>,
}
