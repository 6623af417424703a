//! # Tally CLI
//!
//! Command-line adapter over the `tally-core` invoice pipeline.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              tally                                      │
//! │                                                                         │
//! │  file / stdin ──► JSON ──► tally-core ──► ProcessReport JSON ──► stdout │
//! │                                  │                                      │
//! │                                  └──► template merge ──────────► stdout │
//! │                                                                         │
//! │  tracing ──────────────────────────────────────────────────────► stderr │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exit Codes
//! - `0` - success
//! - `1` - the input failed validation (issues are printed as JSON)
//! - anything else - I/O, JSON or configuration error

mod config;
mod template;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Value};
use tally_core::format::format_currency;
use tally_core::{
    get_locale, is_supported_currency, process_with, validate_with, CurrencyDisplay, DateStyle,
    Issue, ProcessReport,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::template::render_template;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Validate, total and format invoices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate invoice JSON and print every issue found
    Validate {
        /// Input file, or `-` for stdin
        input: String,
    },
    /// Validate, compute and format an invoice
    Render {
        /// Input file, or `-` for stdin
        input: String,
        /// Locale tag, e.g. de-DE (default: derived from the currency)
        #[arg(long)]
        locale: Option<String>,
        /// short, medium or long
        #[arg(long)]
        date_style: Option<DateStyle>,
        /// symbol, code or name
        #[arg(long)]
        currency_display: Option<CurrencyDisplay>,
        /// Text template with {{placeholders}} to merge instead of printing JSON
        #[arg(long)]
        template: Option<PathBuf>,
        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },
    /// Print the locale used for a currency
    Locale {
        /// ISO 4217 code
        currency: String,
    },
    /// Format a single amount
    Amount {
        #[arg(allow_negative_numbers = true)]
        amount: f64,
        /// ISO 4217 code
        #[arg(long)]
        currency: String,
        /// Locale tag (default: derived from the currency)
        #[arg(long)]
        locale: Option<String>,
        /// symbol, code or name
        #[arg(long)]
        currency_display: Option<CurrencyDisplay>,
    },
}

fn main() -> Result<ExitCode> {
    init_tracing();

    let cli = Cli::parse();
    let config = CliConfig::load().context("Failed to load configuration")?;
    debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Validate { input } => {
            let raw = read_input(&input)?;
            match validate_with(&raw, &config.validate_options()) {
                Ok(draft) => {
                    info!(invoice_number = %draft.header.invoice_number, "Invoice is valid");
                    print_json(&json!({ "ok": true, "issues": [] }), false)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(errors) => {
                    log_issues(errors.issues());
                    print_json(&json!({ "ok": false, "issues": errors }), false)?;
                    Ok(ExitCode::FAILURE)
                }
            }
        }

        Commands::Render {
            input,
            locale,
            date_style,
            currency_display,
            template,
            compact,
        } => {
            let raw = read_input(&input)?;

            let mut options = config.format_options();
            if locale.is_some() {
                options.locale = locale;
            }
            if date_style.is_some() {
                options.date_style = date_style;
            }
            if currency_display.is_some() {
                options.currency_display = currency_display;
            }

            let processed = match process_with(&raw, &config.validate_options(), &options) {
                Ok(processed) => processed,
                Err(errors) => {
                    log_issues(errors.issues());
                    print_json(&ProcessReport::from(errors), compact)?;
                    return Ok(ExitCode::FAILURE);
                }
            };
            info!(
                invoice_number = %processed.invoice.header.invoice_number,
                locale = %processed.invoice.locale,
                total = %processed.invoice.totals.total,
                "Invoice rendered"
            );

            match template {
                Some(path) => {
                    let text = read_template(&path)?;
                    print!("{}", render_template(&text, &processed.invoice));
                }
                None => print_json(&ProcessReport::from(processed), compact)?,
            }
            Ok(ExitCode::SUCCESS)
        }

        Commands::Locale { currency } => {
            if !is_supported_currency(&currency) {
                warn!(%currency, "Unsupported currency, using fallback locale");
            }
            println!("{}", get_locale(&currency));
            Ok(ExitCode::SUCCESS)
        }

        Commands::Amount {
            amount,
            currency,
            locale,
            currency_display,
        } => {
            let locale = locale
                .or_else(|| config.locale.clone())
                .unwrap_or_else(|| get_locale(&currency).to_string());
            let display = currency_display.unwrap_or(config.currency_display);
            println!("{}", format_currency(amount, &currency, &locale, display));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=tally_core=trace` - Show per-invoice arithmetic
/// - Default: INFO, DEBUG for tally crates
///
/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_input(input: &str) -> Result<Value> {
    let text = if input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read invoice from stdin")?;
        buf
    } else {
        fs::read_to_string(input).with_context(|| format!("Failed to read invoice file {input}"))?
    };

    serde_json::from_str(&text).with_context(|| format!("Invoice input {input} is not valid JSON"))
}

fn read_template(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read template {}", path.display()))
}

fn print_json(value: &impl Serialize, compact: bool) -> Result<()> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    }
    .context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

fn log_issues(issues: &[Issue]) {
    for issue in issues {
        warn!(code = %issue.code, path = %issue.path, "{}", issue.message);
    }
}
