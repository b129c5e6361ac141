//! Relational sink backed by a SQLite file.
//!
//! Every save drops and recreates the target table inside one transaction,
//! so the table holds exactly the last run's rows. The connection lives only
//! for the duration of the call.

use std::path::Path;

use rusqlite::{params, Connection};

use crate::error::{StorageError, StorageResult};
use crate::models::{Record, COUNTRY_COLUMN, GDP_BILLIONS_COLUMN};

/// Quote an identifier for use in SQL text.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Replace `table` in the database at `db_path` with `records`.
pub fn save_sqlite(records: &[Record], db_path: &Path, table: &str) -> StorageResult<()> {
    let mut conn = Connection::open(db_path)?;
    replace_table(&mut conn, records, table)
}

/// Replace `table` on an already open connection.
pub fn replace_table(conn: &mut Connection, records: &[Record], table: &str) -> StorageResult<()> {
    if table.trim().is_empty() {
        return Err(StorageError::InvalidTableName(table.to_string()));
    }
    let quoted = quote_identifier(table);

    let tx = conn.transaction()?;
    tx.execute(&format!("DROP TABLE IF EXISTS {}", quoted), [])?;
    tx.execute(
        &format!(
            "CREATE TABLE {} ({} TEXT, {} REAL)",
            quoted, COUNTRY_COLUMN, GDP_BILLIONS_COLUMN
        ),
        [],
    )?;
    {
        let mut insert = tx.prepare(&format!(
            "INSERT INTO {} ({}, {}) VALUES (?1, ?2)",
            quoted, COUNTRY_COLUMN, GDP_BILLIONS_COLUMN
        ))?;
        for record in records {
            insert.execute(params![record.country, record.gdp_usd_billions])?;
        }
    }
    tx.commit()?;
    Ok(())
}
