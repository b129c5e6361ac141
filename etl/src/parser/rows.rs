//! Row extraction from the located table.
//!
//! The first `<tr>` is the header and is never read. Every other row yields a
//! [`RowOutcome`]: malformed rows are recorded as skipped, never raised.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};
use serde::{Deserialize, Serialize};

use super::numeric::normalize;
use crate::models::{RawRecord, RowOutcome, SkipReason, SkippedRow};

static ROWS: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("row selector is valid"));
static CELLS: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("cell selector is valid"));

/// Which `<td>` cells hold the country name and the GDP figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowLayout {
    pub country: usize,
    pub gdp: usize,
}

impl RowLayout {
    pub fn new(country: usize, gdp: usize) -> Self {
        Self { country, gdp }
    }

    /// Minimum number of data cells a row needs.
    pub fn required_cells(&self) -> usize {
        self.country.max(self.gdp) + 1
    }
}

impl Default for RowLayout {
    fn default() -> Self {
        Self { country: 0, gdp: 1 }
    }
}

/// Records kept from a table, plus the rows that were dropped.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<RawRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl Extraction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Kept(record) => self.records.push(record),
            RowOutcome::Skipped(skipped) => self.skipped.push(skipped),
        }
    }

    /// Number of data rows inspected (header excluded).
    pub fn rows_seen(&self) -> usize {
        self.records.len() + self.skipped.len()
    }

    pub fn summary(&self) -> String {
        format!(
            "Extracted: {} records, {} rows skipped",
            self.records.len(),
            self.skipped.len()
        )
    }
}

/// Read every data row of `table`.
pub fn extract_rows(table: ElementRef<'_>, layout: RowLayout) -> Extraction {
    let mut extraction = Extraction::new();
    for (index, row) in table.select(&ROWS).enumerate().skip(1) {
        let texts: Vec<String> = row
            .select(&CELLS)
            .map(|cell| cell.text().collect::<String>())
            .collect();
        extraction.push(read_row(index, &texts, layout));
    }
    extraction
}

/// Turn the cell texts of one row into a kept record or a skip.
pub fn read_row(index: usize, cells: &[String], layout: RowLayout) -> RowOutcome {
    let skip = |reason| RowOutcome::Skipped(SkippedRow { row: index, reason });

    let required = layout.required_cells();
    if cells.len() < required {
        return skip(SkipReason::TooFewCells {
            found: cells.len(),
            required,
        });
    }

    let country = cells[layout.country].trim();
    if country.is_empty() {
        return skip(SkipReason::EmptyCountry);
    }

    match normalize(&cells[layout.gdp]) {
        Ok(gdp_usd_millions) => RowOutcome::Kept(RawRecord {
            country: country.to_string(),
            gdp_usd_millions,
        }),
        Err(failure) => skip(SkipReason::Unparseable(failure)),
    }
}
