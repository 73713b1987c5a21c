pub mod banks;
pub mod classify;
pub mod config;
pub mod ledger;
pub mod summary;

use std::path::Path;

use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::importer::{import_statement, resolve_bank, Statement};
use crate::settings::load_settings;
use crate::source::load_document;

pub(crate) fn load_statement(file: &str, bank: Option<&str>) -> Result<Statement> {
    let settings = load_settings();
    let bank = resolve_bank(bank, &settings)?;
    let doc = load_document(Path::new(file))?;
    import_statement(&doc, bank, &settings)
}

#[derive(Parser)]
#[command(
    name = "extracto",
    version,
    about = "Turn bank statement text into a reconciled, categorized ledger."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Csv,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract the ledger of a statement.
    Ledger {
        /// Extractor output: .json with pages and words, or plain text
        file: String,
        /// Bank layout key (see `extracto banks`)
        #[arg(long)]
        bank: Option<String>,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<String>,
    },
    /// Reconciliation and IVA operating summary of a statement.
    Summary {
        file: String,
        #[arg(long)]
        bank: Option<String>,
    },
    /// Classify a single description.
    Classify {
        description: String,
        /// Debit amount, e.g. 1.234,56
        #[arg(long, allow_hyphen_values = true)]
        debit: Option<String>,
        /// Credit amount, e.g. 1.234,56
        #[arg(long, allow_hyphen_values = true)]
        credit: Option<String>,
    },
    /// List the supported bank layouts.
    Banks,
    /// Show or update settings.
    Config {
        #[arg(long = "sign-tolerance")]
        sign_tolerance: Option<Decimal>,
        #[arg(long = "reconcile-tolerance")]
        reconcile_tolerance: Option<Decimal>,
        #[arg(long = "band-tolerance")]
        band_tolerance: Option<f64>,
        /// Bank used when --bank is not given; empty to clear
        #[arg(long = "default-bank")]
        default_bank: Option<String>,
    },
}
