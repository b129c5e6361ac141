//! Read queries against the SQLite store.
//!
//! The database is opened read-only for the duration of one query, so a
//! statement that tries to write is rejected by SQLite itself.
//!
//! # Example
//!
//! ```rust,ignore
//! use gdp_etl::query::{run_query, threshold_query};
//!
//! let sql = threshold_query("Countries_by_GDP", 100.0);
//! let result = run_query(&sql, Path::new("World_Economies.db"))?;
//! println!("{}", result.render());
//! ```

use std::path::Path;

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{QueryError, QueryResult};
use crate::models::GDP_BILLIONS_COLUMN;
use crate::sink::quote_identifier;

/// Rows returned by a query, in the order SQLite produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, by name.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_objects(&self) -> Vec<Value> {
        self.rows
            .iter()
            .map(|row| {
                let obj: Map<String, Value> = self
                    .columns
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect();
                Value::Object(obj)
            })
            .collect()
    }

    /// Plain-text table: text left-aligned, numbers right-aligned.
    pub fn render(&self) -> String {
        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(display_value).collect())
            .collect();

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| {
                cells
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(name.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut lines = Vec::with_capacity(cells.len() + 2);
        lines.push(
            self.columns
                .iter()
                .zip(&widths)
                .map(|(name, w)| pad(name, *w, false))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for (row, text) in self.rows.iter().zip(&cells) {
            lines.push(
                row.iter()
                    .zip(text)
                    .zip(&widths)
                    .map(|((value, cell), w)| pad(cell, *w, value.is_number()))
                    .collect::<Vec<_>>()
                    .join("  "),
            );
        }
        lines.push(format!("({} rows)", self.rows.len()));

        lines
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn pad(text: &str, width: usize, right: bool) -> String {
    if right {
        format!("{:>width$}", text, width = width)
    } else {
        format!("{:<width$}", text, width = width)
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(t) => Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::String(format!("<{} bytes>", b.len())),
    }
}

/// `SELECT * FROM <table> WHERE GDP_USD_Billions > <threshold>`
pub fn threshold_query(table: &str, threshold: f64) -> String {
    format!(
        "SELECT * FROM {} WHERE {} > {}",
        quote_identifier(table),
        GDP_BILLIONS_COLUMN,
        threshold
    )
}

/// Run `sql` against the database file at `db_path`.
pub fn run_query(sql: &str, db_path: &Path) -> QueryResult<ResultSet> {
    let conn = Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY).map_err(
        |source| QueryError::Open {
            path: db_path.display().to_string(),
            source,
        },
    )?;
    query_connection(&conn, sql)
}

/// Run `sql` on an open connection.
pub fn query_connection(conn: &Connection, sql: &str) -> QueryResult<ResultSet> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

    let mut rows = Vec::new();
    let mut cursor = stmt.query([])?;
    while let Some(row) = cursor.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            values.push(to_json(row.get_ref(i)?));
        }
        rows.push(values);
    }

    Ok(ResultSet { columns, rows })
}
