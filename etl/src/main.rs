//! gdp-etl CLI - Countries by GDP, HTML table → CSV + SQLite
//!
//! # Commands
//!
//! ```bash
//! gdp-etl                              # Full run with configured defaults
//! gdp-etl run --threshold 500          # Full run, overriding the query threshold
//! gdp-etl run --html-file page.html    # Full run from a saved page
//! gdp-etl extract -o records.json      # Extract + convert only, as JSON
//! gdp-etl query "SELECT COUNT(*) FROM Countries_by_GDP"
//! ```
//!
//! Settings come from `ETL_*` environment variables (or `.env`), then flags.

use clap::{Args, Parser, Subcommand};
use gdp_etl::{
    run_etl, run_extract, run_read_query, DocumentSource, EtlConfig, EtlReport, Fetcher,
    PipelineError, ProgressLog, ResultSet,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "gdp-etl")]
#[command(about = "Extract the countries-by-GDP table into CSV and SQLite", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Full pipeline: fetch → extract → transform → CSV + SQLite → query
    Run {
        #[command(flatten)]
        overrides: Overrides,

        /// Read the page from a file instead of fetching it
        #[arg(long)]
        html_file: Option<PathBuf>,

        /// Print query rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Fetch and extract only; print converted records as JSON
    Extract {
        #[command(flatten)]
        overrides: Overrides,

        /// Read the page from a file instead of fetching it
        #[arg(long)]
        html_file: Option<PathBuf>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run a read query against the SQLite database
    Query {
        /// SQL text
        sql: String,

        /// Database file (default: configured path)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Print rows as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// Flags that override configuration values.
#[derive(Args, Default)]
struct Overrides {
    /// Source page URL
    #[arg(long)]
    url: Option<String>,

    /// CSS selector of the data table
    #[arg(long)]
    selector: Option<String>,

    /// Cell index of the country name
    #[arg(long)]
    country_column: Option<usize>,

    /// Cell index of the GDP figure (millions)
    #[arg(long)]
    gdp_column: Option<usize>,

    /// CSV output path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// SQLite database path
    #[arg(long)]
    db: Option<PathBuf>,

    /// Table name in the database
    #[arg(long)]
    table: Option<String>,

    /// Query threshold in billions of USD
    #[arg(long)]
    threshold: Option<f64>,

    /// Run log file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Overrides {
    fn apply(self, mut config: EtlConfig) -> EtlConfig {
        if let Some(v) = self.url {
            config.url = v;
        }
        if let Some(v) = self.selector {
            config.table_selector = v;
        }
        if let Some(v) = self.country_column {
            config.layout.country = v;
        }
        if let Some(v) = self.gdp_column {
            config.layout.gdp = v;
        }
        if let Some(v) = self.csv {
            config.csv_path = v;
        }
        if let Some(v) = self.db {
            config.db_path = v;
        }
        if let Some(v) = self.table {
            config.table_name = v;
        }
        if let Some(v) = self.threshold {
            config.threshold = v;
        }
        if let Some(v) = self.log_file {
            config.log_file = v;
        }
        config
    }
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Run {
        overrides: Overrides::default(),
        html_file: None,
        json: false,
    });

    let result = match command {
        Commands::Run {
            overrides,
            html_file,
            json,
        } => cmd_run(overrides, html_file.as_deref(), json).await,

        Commands::Extract {
            overrides,
            html_file,
            output,
        } => cmd_extract(overrides, html_file.as_deref(), output.as_deref()).await,

        Commands::Query { sql, db, json } => cmd_query(&sql, db, json),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(overrides: Overrides) -> Result<EtlConfig, PipelineError> {
    let config = overrides.apply(EtlConfig::from_env()?);
    config.validate()?;
    Ok(config)
}

async fn document_source(
    config: &EtlConfig,
    html_file: Option<&Path>,
) -> Result<DocumentSource, PipelineError> {
    match html_file {
        Some(path) => Ok(DocumentSource::Html(tokio::fs::read_to_string(path).await?)),
        None => Ok(DocumentSource::Fetch(Fetcher::from_config(config)?)),
    }
}

async fn cmd_run(
    overrides: Overrides,
    html_file: Option<&Path>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(overrides)?;
    let log = ProgressLog::to_file(&config.log_file)?;

    let outcome = match document_source(&config, html_file).await {
        Ok(source) => run_etl(&config, source, &log).await,
        Err(e) => {
            log.error(format!("ETL process failed: {}", e));
            Err(e)
        }
    };
    log.close()?;

    let report = outcome?;
    print_report(&report);
    print_rows(&report.query, json)?;
    Ok(())
}

fn print_report(report: &EtlReport) {
    eprintln!("📄 Rows read: {}", report.rows_seen);
    eprintln!("   Kept: {}", report.records.len());
    if !report.skipped.is_empty() {
        eprintln!("   Skipped: {}", report.skipped.len());
        for skip in report.skipped.iter().take(5) {
            eprintln!("     - {}", skip);
        }
    }
    eprintln!("🔎 {}", report.query_text);
}

fn print_rows(result: &ResultSet, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&result.to_objects())?);
    } else {
        println!("{}", result.render());
    }
    Ok(())
}

async fn cmd_extract(
    overrides: Overrides,
    html_file: Option<&Path>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(overrides)?;
    let log = ProgressLog::to_file(&config.log_file)?;

    let outcome = match document_source(&config, html_file).await {
        Ok(source) => run_extract(&config, source, &log).await,
        Err(e) => {
            log.error(format!("Extraction failed: {}", e));
            Err(e)
        }
    };
    log.close()?;

    let report = outcome?;
    eprintln!("✅ {} records, {} rows skipped", report.records.len(), report.skipped.len());
    for skip in report.skipped.iter().take(5) {
        eprintln!("   - {}", skip);
    }

    let json = serde_json::to_string_pretty(&report.records)?;
    write_output(&json, output)?;
    Ok(())
}

fn cmd_query(sql: &str, db: Option<PathBuf>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = EtlConfig::from_env()?;
    let db_path = db.unwrap_or(config.db_path);
    let log = ProgressLog::to_file(&config.log_file)?;

    let result = run_read_query(sql, &db_path, &log);
    log.close()?;

    print_rows(&result?, json)
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
