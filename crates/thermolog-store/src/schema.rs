//! Expected database layout.
//!
//! The relations are owned by the ingestion process. This module only checks
//! that they are present, and creates them for in-memory test stores.

use rusqlite::Connection;
use thermolog_types::Series;

use crate::error::{Error, Result};

/// Columns every series table must expose.
pub const COLUMNS: [&str; 3] = ["id", "timestamp", "temperature"];

/// Check that every series table exists with the expected columns.
pub fn verify(conn: &Connection) -> Result<()> {
    for series in Series::ALL {
        let table = series.table();
        if !table_exists(conn, table)? {
            return Err(Error::MissingTable(table));
        }

        let columns: Vec<String> = conn
            .prepare("SELECT name FROM pragma_table_info(?1)")?
            .query_map([table], |row| row.get(0))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for column in COLUMNS {
            if !columns.iter().any(|c| c.eq_ignore_ascii_case(column)) {
                return Err(Error::MissingColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name=?1",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Create the series tables the way the ingestion process lays them out.
#[cfg(any(test, feature = "test-util"))]
pub fn create(conn: &Connection) -> Result<()> {
    for series in Series::ALL {
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                timestamp DATETIME,
                temperature REAL
            );",
            series.table()
        ))?;
    }
    Ok(())
}
