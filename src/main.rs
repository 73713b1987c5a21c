mod amount;
mod balances;
mod categorizer;
mod cli;
mod error;
mod fmt;
mod importer;
mod lines;
mod matcher;
mod models;
mod patterns;
mod reconciler;
mod reports;
mod settings;
mod signs;
mod source;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Ledger {
            file,
            bank,
            format,
            output,
        } => cli::ledger::run(&file, bank.as_deref(), format, output.as_deref()),
        Commands::Summary { file, bank } => cli::summary::run(&file, bank.as_deref()),
        Commands::Classify {
            description,
            debit,
            credit,
        } => cli::classify::run(&description, debit.as_deref(), credit.as_deref()),
        Commands::Banks => cli::banks::run(),
        Commands::Config {
            sign_tolerance,
            reconcile_tolerance,
            band_tolerance,
            default_bank,
        } => cli::config::run(sign_tolerance, reconcile_tolerance, band_tolerance, default_bank),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
