//! Domain models for the GDP ETL pipeline.
//!
//! - [`RawRecord`] - A row as extracted, GDP still in millions
//! - [`Record`] - A row after conversion, GDP in billions
//! - [`RowOutcome`] - Whether one table row was kept or skipped
//! - [`SkippedRow`] / [`SkipReason`] - Why a row was dropped
//!
//! `RawRecord` and `Record` are separate types, so a converted record can
//! only carry the billions figure.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParseFailure;

/// Header of the country column in the CSV file and the SQLite table.
pub const COUNTRY_COLUMN: &str = "Country";

/// Header of the GDP column in the CSV file and the SQLite table.
pub const GDP_BILLIONS_COLUMN: &str = "GDP_USD_Billions";

// =============================================================================
// Records
// =============================================================================

/// A country's GDP as read from the source table, in millions of USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "GDP_USD_Millions")]
    pub gdp_usd_millions: f64,
}

/// A country's GDP in billions of USD, rounded to 2 decimal places.
///
/// This is what the sinks persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "GDP_USD_Billions")]
    pub gdp_usd_billions: f64,
}

// =============================================================================
// Row outcomes
// =============================================================================

/// Result of reading one table row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Kept(RawRecord),
    Skipped(SkippedRow),
}

/// A table row that produced no record.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    /// Index of the row inside the table (0 is the header row).
    pub row: usize,
    pub reason: SkipReason,
}

/// Why a row was skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// The row has fewer `<td>` cells than the layout reads.
    TooFewCells { found: usize, required: usize },
    /// The country cell is blank.
    EmptyCountry,
    /// The GDP cell did not normalize to a number.
    Unparseable(ParseFailure),
}

impl SkipReason {
    /// Short label used to group skips in the run log.
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::TooFewCells { .. } => "too few cells",
            SkipReason::EmptyCountry => "empty country",
            SkipReason::Unparseable(_) => "unparseable GDP",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::TooFewCells { found, required } => {
                write!(f, "{} data cell(s), need {}", found, required)
            }
            SkipReason::EmptyCountry => write!(f, "empty country cell"),
            SkipReason::Unparseable(failure) => write!(f, "{}", failure),
        }
    }
}

impl fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason)
    }
}
