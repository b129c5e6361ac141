//! # gdp-etl - Countries by GDP, from HTML table to CSV and SQLite
//!
//! One run fetches a page, reads its GDP table, converts the figures from
//! millions to billions of USD, writes them to a CSV file and a SQLite
//! table, then queries the table for countries above a threshold.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌──────────┐   ┌───────────┐   ┌─────────────┐   ┌─────────┐
//! │  Fetch  │──▶│  Parser  │──▶│ Transform │──▶│ Sinks       │──▶│  Query  │
//! │ (HTTP)  │   │ (table)  │   │ (M → B)   │   │ CSV, SQLite │   │ (> N)   │
//! └─────────┘   └──────────┘   └───────────┘   └─────────────┘   └─────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gdp_etl::{run_etl, DocumentSource, EtlConfig, Fetcher, ProgressLog};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = EtlConfig::default();
//!     let log = ProgressLog::to_file(&config.log_file).unwrap();
//!     let source = DocumentSource::Fetch(Fetcher::from_config(&config).unwrap());
//!     let report = run_etl(&config, source, &log).await.unwrap();
//!     println!("{}", report.query.render());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per stage
//! - [`models`] - Records and row outcomes
//! - [`config`] - Defaults and environment overrides
//! - [`logs`] - Timestamped run log
//! - [`fetch`] - HTTP retrieval
//! - [`parser`] - Table location, row extraction, numeric cleanup
//! - [`transform`] - Unit conversion and the pipeline
//! - [`sink`] - CSV and SQLite writers
//! - [`query`] - Read queries and table rendering

// Core modules
pub mod config;
pub mod error;
pub mod logs;
pub mod models;

// Extract
pub mod fetch;
pub mod parser;

// Transform
pub mod transform;

// Load
pub mod query;
pub mod sink;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ConfigError, CsvSinkError, ExtractError, FetchError, ParseFailure, PipelineError, QueryError,
    StorageError,
};

// =============================================================================
// Re-exports - Models & config
// =============================================================================

pub use config::EtlConfig;
pub use models::{RawRecord, Record, RowOutcome, SkipReason, SkippedRow};

// =============================================================================
// Re-exports - Logging
// =============================================================================

pub use logs::{FileLogSink, LogEntry, LogLevel, LogSink, MemoryLogSink, NullLogSink, ProgressLog};

// =============================================================================
// Re-exports - Stages
// =============================================================================

pub use fetch::Fetcher;
pub use parser::{extract_document, normalize, Extraction, RowLayout, TableSelector};
pub use query::{run_query, threshold_query, ResultSet};
pub use sink::{save_csv, save_sqlite};
pub use transform::convert;

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::pipeline::{
    run_etl, run_extract, run_read_query, DocumentSource, EtlReport, ExtractReport,
};
