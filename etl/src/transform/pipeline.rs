//! High-level ETL run.
//!
//! Stages run strictly one after another; the first fatal error stops the
//! run. Whatever a completed stage already wrote (e.g. the CSV file) stays.
//!
//! # Example
//!
//! ```rust,ignore
//! use gdp_etl::{run_etl, DocumentSource, EtlConfig, Fetcher, ProgressLog};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EtlConfig::from_env()?;
//!     let log = ProgressLog::to_file(&config.log_file)?;
//!     let source = DocumentSource::Fetch(Fetcher::from_config(&config)?);
//!
//!     let report = run_etl(&config, source, &log).await?;
//!     println!("{}", report.query.render());
//!     log.close()?;
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use super::convert::convert;
use crate::config::EtlConfig;
use crate::error::PipelineResult;
use crate::fetch::Fetcher;
use crate::logs::ProgressLog;
use crate::models::{RawRecord, Record, SkippedRow};
use crate::parser::{extract_document, Extraction, TableSelector};
use crate::query::{run_query, threshold_query, ResultSet};
use crate::sink::{save_csv, save_sqlite};

/// Where the HTML comes from.
pub enum DocumentSource {
    /// GET the configured URL.
    Fetch(Fetcher),
    /// An already loaded document (saved page, fixtures).
    Html(String),
}

/// What a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct EtlReport {
    /// Data rows inspected in the table (header excluded).
    pub rows_seen: usize,
    /// Rows dropped during extraction.
    #[serde(skip)]
    pub skipped: Vec<SkippedRow>,
    /// Converted records, as persisted.
    pub records: Vec<Record>,
    /// SQL text of the final query.
    pub query_text: String,
    /// Rows returned by the final query.
    pub query: ResultSet,
}

/// Converted records without any sink, for the `extract` command.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    pub rows_seen: usize,
    #[serde(skip)]
    pub skipped: Vec<SkippedRow>,
    pub records: Vec<Record>,
}

/// Run every stage: extract, transform, load to CSV and SQLite, query.
pub async fn run_etl(
    config: &EtlConfig,
    source: DocumentSource,
    log: &ProgressLog,
) -> PipelineResult<EtlReport> {
    log.info("ETL process started");
    let report = run_stages(config, source, log).await;
    finish(report, log, "ETL process")
}

/// Extract and convert only; nothing is written.
pub async fn run_extract(
    config: &EtlConfig,
    source: DocumentSource,
    log: &ProgressLog,
) -> PipelineResult<ExtractReport> {
    log.info("Extraction started");
    let report = extract_stages(config, source, log).await;
    finish(report, log, "Extraction")
}

async fn extract_stages(
    config: &EtlConfig,
    source: DocumentSource,
    log: &ProgressLog,
) -> PipelineResult<ExtractReport> {
    config.validate()?;

    let extraction = extract(config, source, log).await?;
    let rows_seen = extraction.rows_seen();
    let records = transform(extraction.records, log);

    Ok(ExtractReport {
        rows_seen,
        skipped: extraction.skipped,
        records,
    })
}

/// Run a caller-supplied read query, logging the outcome.
pub fn run_read_query(sql: &str, db_path: &Path, log: &ProgressLog) -> PipelineResult<ResultSet> {
    let result = query(sql, db_path, log);
    if let Err(e) = &result {
        log.error(format!("Query failed: {}", e));
    }
    result
}

fn finish<T>(outcome: PipelineResult<T>, log: &ProgressLog, process: &str) -> PipelineResult<T> {
    match &outcome {
        Ok(_) => log.success(format!("{} completed successfully", process)),
        Err(e) => log.error(format!("{} failed: {}", process, e)),
    }
    outcome
}

async fn run_stages(
    config: &EtlConfig,
    source: DocumentSource,
    log: &ProgressLog,
) -> PipelineResult<EtlReport> {
    config.validate()?;

    let extraction = extract(config, source, log).await?;
    let rows_seen = extraction.rows_seen();

    let records = transform(extraction.records, log);

    load_to_csv(&records, &config.csv_path, log)?;
    load_to_db(&records, &config.db_path, &config.table_name, log)?;

    let query_text = threshold_query(&config.table_name, config.threshold);
    let query = query(&query_text, &config.db_path, log)?;

    Ok(EtlReport {
        rows_seen,
        skipped: extraction.skipped,
        records,
        query_text,
        query,
    })
}

/// Get the document and pull the raw records out of its table.
pub async fn extract(
    config: &EtlConfig,
    source: DocumentSource,
    log: &ProgressLog,
) -> PipelineResult<Extraction> {
    log.info("Starting data extraction");

    let html = match source {
        DocumentSource::Fetch(fetcher) => match fetcher.fetch(&config.url).await {
            Ok(html) => html,
            Err(e) => {
                log.error("Failed to fetch the webpage");
                return Err(e.into());
            }
        },
        DocumentSource::Html(html) => html,
    };

    let selector = TableSelector::parse(&config.table_selector)?;
    let extraction = extract_document(&html, &selector, config.layout)?;
    report_extraction(&extraction, log);

    log.success("Data extraction completed successfully");
    Ok(extraction)
}

/// Convert millions to billions.
pub fn transform(records: Vec<RawRecord>, log: &ProgressLog) -> Vec<Record> {
    log.info("Starting data transformation");
    let converted = convert(records);
    log.success("Data transformation completed successfully");
    converted
}

/// Write the CSV file.
pub fn load_to_csv(records: &[Record], path: &Path, log: &ProgressLog) -> PipelineResult<()> {
    log.info(format!("Saving data to CSV file at {}", path.display()));
    save_csv(records, path)?;
    log.success("Data successfully saved to CSV");
    Ok(())
}

/// Replace the SQLite table.
pub fn load_to_db(
    records: &[Record],
    db_path: &Path,
    table: &str,
    log: &ProgressLog,
) -> PipelineResult<()> {
    log.info(format!("Saving data to database table '{}'", table));
    save_sqlite(records, db_path, table)?;
    log.success(format!("Data successfully saved to database table '{}'", table));
    Ok(())
}

/// Run a read query.
pub fn query(sql: &str, db_path: &Path, log: &ProgressLog) -> PipelineResult<ResultSet> {
    log.info("Running query on the database");
    let result = run_query(sql, db_path)?;
    log.success("Query executed successfully");
    Ok(result)
}

/// Log counts and a sample of skipped rows, grouped by reason.
fn report_extraction(extraction: &Extraction, log: &ProgressLog) {
    log.info(extraction.summary());
    if extraction.skipped.is_empty() {
        return;
    }

    let mut reasons: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for skip in &extraction.skipped {
        reasons.entry(skip.reason.kind()).or_default().push(skip.row);
    }

    for (reason, rows) in &reasons {
        let sample: Vec<String> = rows.iter().take(5).map(|r| r.to_string()).collect();
        let more = if rows.len() > 5 {
            format!(" ... +{}", rows.len() - 5)
        } else {
            String::new()
        };
        log.warning(format!("Skipped ({}): rows {}{}", reason, sample.join(", "), more));
    }
}
