//! Error types for the GDP ETL pipeline.
//!
//! One enum per stage, plus a top-level [`PipelineError`]:
//!
//! - [`FetchError`] - HTTP retrieval of the source page
//! - [`ExtractError`] - Locating the table in the document
//! - [`ParseFailure`] - A single numeric cell that did not parse (never fatal)
//! - [`CsvSinkError`] - Writing the flat file
//! - [`StorageError`] - Writing the SQLite table
//! - [`QueryError`] - Running a read query
//! - [`ConfigError`] - Invalid environment overrides
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across stage boundaries.

use thiserror::Error;

// =============================================================================
// Fetch Errors
// =============================================================================

/// Errors while retrieving the source document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure (DNS, connection, timeout, TLS).
    #[error("GET {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body could not be read as text.
    #[error("Failed to read body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

// =============================================================================
// Extraction Errors
// =============================================================================

/// Errors while locating the data table.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The selector is not valid CSS.
    #[error("Invalid table selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// No element in the document matches the selector.
    #[error("No table matches selector '{selector}'")]
    TableNotFound { selector: String },
}

/// A numeric cell that could not be normalized.
///
/// This is a per-cell outcome: the row extractor turns it into a skipped row
/// and carries on with the next row.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseFailure {
    /// Nothing left to parse once separators and annotations are removed.
    #[error("empty numeric cell (raw '{raw}')")]
    Empty { raw: String },

    /// The cleaned text is not an unsigned base-10 number.
    #[error("'{cleaned}' is not a number (raw '{raw}')")]
    NotANumber { raw: String, cleaned: String },
}

// =============================================================================
// Sink Errors
// =============================================================================

/// Errors writing the CSV flat file.
#[derive(Debug, Error)]
pub enum CsvSinkError {
    /// The path could not be created or written.
    #[error("Failed to write CSV file: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV encoder failed.
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors writing the relational table.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Table names must be non-empty.
    #[error("Invalid table name: '{0}'")]
    InvalidTableName(String),

    /// Opening the database or writing rows failed.
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Errors running a read query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The database file could not be opened read-only.
    #[error("Cannot open database '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    /// The statement failed to prepare or execute.
    #[error("Query failed: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors loading configuration overrides.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held a value of the wrong shape.
    #[error("Invalid value for {key}: '{value}' ({message})")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// Every variant is fatal to the run. [`ParseFailure`] is deliberately
/// absent: it is consumed inside row extraction.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Configuration error.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Fetch error.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Table location error.
    #[error("Extract error: {0}")]
    Extract(#[from] ExtractError),

    /// Flat-file sink error.
    #[error("CSV sink error: {0}")]
    CsvSink(#[from] CsvSinkError),

    /// Relational sink error.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Query error.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Reading a local HTML document failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for table location.
pub type ExtractResult<T> = Result<T, ExtractError>;

/// Result type for the CSV sink.
pub type CsvSinkResult<T> = Result<T, CsvSinkError>;

/// Result type for the SQLite sink.
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type for queries.
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        // ExtractError -> PipelineError
        let err = ExtractError::TableNotFound {
            selector: "table.wikitable".into(),
        };
        let pipeline_err: PipelineError = err.into();
        assert!(pipeline_err.to_string().contains("table.wikitable"));

        // StorageError -> PipelineError
        let err = StorageError::InvalidTableName(String::new());
        let pipeline_err: PipelineError = err.into();
        assert!(pipeline_err.to_string().starts_with("Storage error"));
    }

    #[test]
    fn test_status_error_format() {
        let err = FetchError::Status {
            url: "http://example.test/page".into(),
            status: 404,
        };
        let msg = err.to_string();
        assert!(msg.contains("http://example.test/page"));
        assert!(msg.contains("404"));
    }

    #[test]
    fn test_parse_failure_format() {
        let err = ParseFailure::NotANumber {
            raw: "12a[1]".into(),
            cleaned: "12a".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'12a'"));
        assert!(msg.contains("12a[1]"));
    }
}
