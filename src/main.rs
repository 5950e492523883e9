// Cerebro - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation
// 3. Store and query bridge setup
// 4. Command dispatch

use cerebro::app::bridge;
use cerebro::app::catalog::{self, Catalog, ImportOutcome};
use cerebro::app::store::{IssueStore, JsonFileStore};
use cerebro::core::export;
use cerebro::core::model::IssueRecord;
use cerebro::platform::config::{self, AppConfig, PlatformPaths};
use cerebro::platform::fs;
use cerebro::util::{self, error::CerebroError};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Cerebro - chronological issue catalog.
///
/// Import a hand-maintained reading-order spreadsheet (CSV export), then
/// search it by year, month, or free text, or ask for today's feature.
#[derive(Parser, Debug)]
#[command(name = "cerebro", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file (default: platform config directory).
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Catalog file (overrides [storage] catalog_file).
    #[arg(short = 's', long = "store", global = true)]
    store: Option<PathBuf>,

    /// Never call the query bridge; use local substring search.
    #[arg(long = "offline", global = true)]
    offline: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract issues from a CSV export and add them to the catalog.
    Import {
        /// CSV file to import.
        file: PathBuf,
    },
    /// Search the catalog ("1991", "uncollected", "Fall of X", ...).
    Search {
        /// Query text; multiple words are joined with spaces.
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Show the daily featured year and its issues for this month.
    Today {
        /// Date to feature instead of today (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Print catalog statistics.
    Stats,
    /// Export the catalog (or a search result) to a file.
    Export {
        /// Output file.
        file: PathBuf,
        /// Output format.
        #[arg(short = 'f', long = "format", value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Only export records matching this query.
        #[arg(short = 'q', long = "query")]
        query: Option<String>,
    },
    /// Delete every record from the catalog.
    Clear,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ExportFormat {
    Csv,
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let paths = PlatformPaths::resolve();

    let (app_config, config_warnings) = match cli.config {
        Some(ref path) => match config::load_config_strict(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => config::load_config(&paths.config_file()),
    };

    util::logging::init(
        cli.debug,
        app_config.log_level.as_deref(),
        app_config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "Cerebro starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let store_path = cli
        .store
        .clone()
        .or_else(|| app_config.catalog_file.clone())
        .unwrap_or_else(|| paths.catalog_file());
    let mut store = JsonFileStore::new(store_path);

    match run(&cli, &app_config, &mut store) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, config: &AppConfig, store: &mut JsonFileStore) -> Result<ExitCode, CerebroError> {
    match cli.command {
        Command::Import { ref file } => {
            let raw = fs::read_import_file(file)?;
            match catalog::import_text(&raw, store, config.batch_size)? {
                ImportOutcome::Imported { count, .. } => {
                    println!("Found {count} issues. Catalog synced to {}.", store.path().display());
                }
                ImportOutcome::NoDataFound { .. } => {
                    eprintln!(
                        "No valid issues found in '{}'. Ensure the CSV has Month/Year columns.",
                        file.display()
                    );
                    return Ok(ExitCode::from(2));
                }
            }
        }
        Command::Search { ref query } => {
            let catalog = Catalog::load(&*store)?;
            let bridge = bridge::create_bridge(&config.bridge, cli.offline);
            let outcome = catalog.search(&query.join(" "), bridge.as_ref());
            if outcome.hits.is_empty() {
                println!("No signals detected matching that query.");
            } else {
                println!("Search results ({}) for {}:", outcome.hits.len(), outcome.descriptor);
                print_records(&outcome.hits);
            }
        }
        Command::Today { date } => {
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let catalog = Catalog::load(&*store)?;
            match catalog.daily_feature(date) {
                None => println!("The catalog is empty. Import a spreadsheet first."),
                Some(feature) => {
                    println!("Daily featured history: {} {}", feature.month, feature.year);
                    if feature.issues.is_empty() {
                        println!("No issues recorded for this month in {}.", feature.year);
                    } else {
                        print_records(&feature.issues);
                    }
                }
            }
        }
        Command::Stats => {
            let summary = Catalog::load(&*store)?.summary();
            println!("Issues:       {}", summary.total);
            println!("Uncollected:  {}", summary.uncollected);
            match (summary.first_year, summary.last_year) {
                (Some(first), Some(last)) => println!(
                    "Years:        {} ({first}-{last})",
                    summary.distinct_years
                ),
                _ => println!("Years:        0"),
            }
            for (format, count) in &summary.by_format {
                println!("  {format:<24} {count}");
            }
        }
        Command::Export {
            ref file,
            format,
            ref query,
        } => {
            let catalog = Catalog::load(&*store)?;
            let records: Vec<IssueRecord> = match query {
                Some(q) => {
                    let bridge = bridge::create_bridge(&config.bridge, cli.offline);
                    catalog.search(q, bridge.as_ref()).hits
                }
                None => catalog.records().to_vec(),
            };
            let count = write_export(file, format, &records)?;
            println!("Exported {count} issues to {}.", file.display());
        }
        Command::Clear => {
            let removed = store.clear()?;
            tracing::info!(removed, "Catalog cleared");
            println!("Timeline reset: {removed} issues removed.");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn write_export(
    path: &Path,
    format: ExportFormat,
    records: &[IssueRecord],
) -> Result<usize, CerebroError> {
    let file = std::fs::File::create(path).map_err(|e| CerebroError::Io {
        path: path.to_path_buf(),
        operation: "create export file",
        source: e,
    })?;
    let writer = std::io::BufWriter::new(file);
    let count = match format {
        ExportFormat::Csv => export::export_csv(records, writer, path)?,
        ExportFormat::Json => export::export_json(records, writer, path)?,
    };
    Ok(count)
}

fn print_records(records: &[IssueRecord]) {
    for r in records {
        let marker = if r.is_uncollected() { "!" } else { " " };
        println!(
            "{marker} {:<9} {} #{:<6} {:<40} {}",
            r.month().name(),
            r.year(),
            r.issue_number(),
            r.collection(),
            r.format()
        );
    }
}
