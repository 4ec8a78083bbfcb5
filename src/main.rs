//! scorecard-analytics - engagement analytics for security scorecards
//!
//! A CLI tool that loads company/contact engagement snapshots and reports
//! delivery status and engagement statistics.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad dataset, unknown id, config failure, etc.)
//!   2 - --validate found invalid records

use anyhow::{Context, Result};
use scorecard_analytics::analysis::filter_companies;
use scorecard_analytics::cli::{Args, OutputFormat};
use scorecard_analytics::config::{Config, CONFIG_FILE_NAME};
use scorecard_analytics::dataset::{self, Dataset};
use scorecard_analytics::models::SlideCatalog;
use scorecard_analytics::report;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // No logging needed to write the config file
    if args.init_config {
        return handle_init_config();
    }

    // Config comes first so `[general] verbose` can set the log level
    let mut config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    init_logging(&args, &config);

    info!("scorecard-analytics v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Configuration: {:?}", config);

    match run(args, config) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Report failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .scorecard.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the dataset path, slide names and report options.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so a report printed on stdout stays clean.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load, aggregate and write the report. Returns the exit code.
fn run(args: Args, config: Config) -> Result<i32> {
    let configured = config.slide_catalog();
    if configured.is_empty() {
        anyhow::bail!("Slide catalog is empty; set [slides] names in the config");
    }

    let catalog = dataset::catalog_for(config.data.path.as_deref(), configured.clone());
    if catalog != configured {
        warn!("Built-in sample uses its own slide names; [slides] names ignored");
    }

    if args.validate {
        return handle_validate(&config, &catalog);
    }

    let dataset = dataset::load_dataset(config.data.path.as_deref(), &catalog, config.data.strict)?;

    let dataset = match args.search.as_deref() {
        Some(query) => {
            let companies = filter_companies(&dataset.companies, query);
            info!(
                "Search '{}' kept {} of {} companies",
                query,
                companies.len(),
                dataset.companies.len()
            );
            Dataset::new(companies, dataset.source)
        }
        None => dataset,
    };

    let report = report::build_report(
        &dataset,
        &args.report_view(),
        &catalog,
        &config.report_options(),
        args.search.as_deref(),
    )?;

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    match config.general.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path))?;
            if !args.quiet {
                println!("✅ Report saved to: {}", path);
            }
        }
        None => print!("{}", output),
    }

    Ok(0)
}

/// Handle --validate: check the dataset, print violations, exit.
fn handle_validate(config: &Config, catalog: &SlideCatalog) -> Result<i32> {
    let dataset = match config.data.path {
        Some(ref path) => dataset::load_path(path)?,
        None => dataset::sample::sample_dataset(),
    };

    let violations = dataset.validate(catalog);

    if violations.is_empty() {
        println!(
            "✅ {} companies, {} contacts: no invalid records.",
            dataset.companies.len(),
            dataset.contact_count()
        );
        return Ok(0);
    }

    println!("⛔ {} invalid record(s):\n", violations.len());
    for violation in &violations {
        println!("   - {}", violation);
    }

    Ok(2)
}

/// Load configuration from file or use defaults.
///
/// Runs before logging is set up, so problems go straight to stderr.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Ignoring {}: {:#}", CONFIG_FILE_NAME, e);
            Ok(Config::default())
        }
    }
}
