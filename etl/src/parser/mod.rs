//! HTML table parsing.
//!
//! - `table`: find the data table with a CSS selector
//! - `rows`: read country and GDP cells from each data row
//! - `numeric`: clean and parse a GDP cell
//!
//! ## Usage Flow
//!
//! ```text
//! HTML text → table::locate_table → rows::extract_rows (numeric::normalize per row) → Extraction
//! ```

pub mod numeric;
pub mod rows;
pub mod table;

pub use numeric::{clean, normalize};
pub use rows::{extract_rows, read_row, Extraction, RowLayout};
pub use table::{locate_table, TableSelector};

use scraper::Html;

use crate::error::ExtractResult;

/// Parse `document`, locate the table and extract its rows.
///
/// # Example
/// ```
/// use gdp_etl::parser::{extract_document, RowLayout, TableSelector};
///
/// let html = r#"<table class="wikitable">
///   <tr><th>Country</th><th>GDP</th></tr>
///   <tr><td>Peru</td><td>264,636[n 1]</td></tr>
/// </table>"#;
/// let selector = TableSelector::parse("table.wikitable").unwrap();
/// let result = extract_document(html, &selector, RowLayout::default()).unwrap();
///
/// assert_eq!(result.records[0].country, "Peru");
/// assert_eq!(result.records[0].gdp_usd_millions, 264_636.0);
/// ```
pub fn extract_document(
    document: &str,
    selector: &TableSelector,
    layout: RowLayout,
) -> ExtractResult<Extraction> {
    let html = Html::parse_document(document);
    let table = locate_table(&html, selector)?;
    Ok(extract_rows(table, layout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;

    #[test]
    fn test_missing_table_is_fatal() {
        let selector = TableSelector::parse("table.wikitable").unwrap();
        let result = extract_document(
            "<table class=\"other\"><tr><td>x</td></tr></table>",
            &selector,
            RowLayout::default(),
        );
        assert!(matches!(result, Err(ExtractError::TableNotFound { .. })));
    }

    #[test]
    fn test_header_only_table_is_empty() {
        let selector = TableSelector::parse("table").unwrap();
        let result = extract_document(
            "<table><tr><th>Country</th><th>GDP</th></tr></table>",
            &selector,
            RowLayout::default(),
        )
        .unwrap();
        assert!(result.records.is_empty());
        assert!(result.skipped.is_empty());
    }
}
