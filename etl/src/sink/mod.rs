//! Persistence targets for the converted record set.
//!
//! - `csv_file`: comma-separated flat file
//! - `sqlite`: SQLite table with full-replace semantics

pub mod csv_file;
pub mod sqlite;

pub use csv_file::{save_csv, write_csv};
pub use sqlite::{quote_identifier, replace_table, save_sqlite};
