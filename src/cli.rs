//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::report::ReportView;
use clap::Parser;
use std::path::PathBuf;

/// scorecard-analytics - engagement analytics for security scorecards
///
/// Loads companies, contacts and their scorecard engagement, then reports
/// delivery status and engagement statistics as Markdown or JSON.
///
/// Examples:
///   scorecard-analytics
///   scorecard-analytics --data ./companies.json --format json
///   scorecard-analytics --view company --company comp_3
///   scorecard-analytics --view contact --contact c_10 --output c_10.md
///   scorecard-analytics --data ./exports --validate
///   scorecard-analytics --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset to load: a JSON file or a directory of JSON files
    ///
    /// Uses the built-in sample dataset when neither this flag nor the
    /// config file names one.
    #[arg(short, long, value_name = "PATH", env = "SCORECARD_DATA")]
    pub data: Option<PathBuf>,

    /// Which view to report
    #[arg(long, default_value = "global", value_name = "VIEW")]
    pub view: ViewKind,

    /// Company id for --view company
    #[arg(long, value_name = "ID")]
    pub company: Option<String>,

    /// Contact id for --view contact
    #[arg(long, value_name = "ID")]
    pub contact: Option<String>,

    /// Only keep contacts matching this text (name, email, role, company)
    #[arg(short, long, value_name = "QUERY")]
    pub search: Option<String>,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Output file path for the report
    ///
    /// The report is printed to stdout when not set.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .scorecard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Refuse datasets containing invalid records
    #[arg(long)]
    pub strict: bool,

    /// Check the dataset and exit (exit code 2 when records are invalid)
    #[arg(long)]
    pub validate: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .scorecard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Report view selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ViewKind {
    /// Every company (default)
    #[default]
    Global,
    /// One company, chosen with --company
    Company,
    /// One contact, chosen with --contact
    Contact,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        match self.view {
            ViewKind::Company if self.company.is_none() => {
                return Err("--view company requires --company <ID>".to_string());
            }
            ViewKind::Contact if self.contact.is_none() => {
                return Err("--view contact requires --contact <ID>".to_string());
            }
            _ => {}
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref search) = self.search {
            if search.trim().is_empty() {
                return Err("Search query cannot be empty".to_string());
            }
        }

        if let Some(ref data) = self.data {
            if !data.exists() {
                return Err(format!("Dataset path does not exist: {}", data.display()));
            }
        }

        Ok(())
    }

    /// The report view described by the arguments.
    pub fn report_view(&self) -> ReportView {
        match self.view {
            ViewKind::Global => ReportView::Global,
            ViewKind::Company => ReportView::Company(self.company.clone().unwrap_or_default()),
            ViewKind::Contact => ReportView::Contact(self.contact.clone().unwrap_or_default()),
        }
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` setting; `--quiet` wins
    /// over both.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
