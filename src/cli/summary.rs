use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::money;
use crate::models::{ClosingSource, Ledger, LedgerSummary, OpeningSource};
use crate::reports::{category_breakdown, tax_summary};

fn opening_label(source: OpeningSource) -> &'static str {
    match source {
        OpeningSource::Stated => "Opening balance",
        OpeningSource::Derived => "Opening balance (derived)",
        OpeningSource::Missing => "Opening balance (not found)",
    }
}

fn closing_label(source: ClosingSource) -> &'static str {
    match source {
        ClosingSource::Stated => "Closing balance (statement)",
        ClosingSource::LastRecord => "Closing balance (last row)",
        ClosingSource::Reconstructed => "Closing balance (not found)",
    }
}

pub fn summary_table(summary: &LedgerSummary) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["", "Amount"]);
    table.add_row(vec![
        Cell::new(opening_label(summary.opening_source)),
        Cell::new(money(summary.opening_balance)),
    ]);
    table.add_row(vec![
        Cell::new("Total credits (+)".green()),
        Cell::new(money(summary.total_credits)),
    ]);
    table.add_row(vec![
        Cell::new("Total debits (-)".red()),
        Cell::new(money(summary.total_debits)),
    ]);
    table.add_row(vec![
        Cell::new(closing_label(summary.closing_source)),
        Cell::new(money(summary.closing_stated)),
    ]);
    table.add_row(vec![
        Cell::new("Closing balance (calculated)"),
        Cell::new(money(summary.closing_reconstructed)),
    ]);
    table.add_row(vec![
        Cell::new("Difference".bold()),
        Cell::new(money(summary.difference)),
    ]);
    table
}

pub fn reconciliation_line(summary: &LedgerSummary) -> String {
    if summary.reconciled {
        format!("{}", "Reconciled!".green().bold())
    } else {
        format!(
            "{} {}",
            "DISCREPANCY:".red().bold(),
            money(summary.difference)
        )
    }
}

pub fn print_summary(summary: &LedgerSummary) {
    println!("Statement Summary\n{}", summary_table(summary));
    if let Some(date) = summary.closing_date {
        println!("Closing per statement: {}", date.format("%d/%m/%Y"));
    }
    println!("{}", reconciliation_line(summary));
}

fn print_tax_summary(ledger: &Ledger) {
    let tax = tax_summary(ledger);
    let mut table = Table::new();
    table.set_header(vec!["Concept", "Amount"]);
    for (label, amount) in tax.lines() {
        let label = if label == "Total" {
            Cell::new(label.bold())
        } else {
            Cell::new(label)
        };
        table.add_row(vec![label, Cell::new(money(amount))]);
    }
    println!("\nIVA Operating Summary\n{table}");
}

fn print_breakdown(ledger: &Ledger) {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Debit", "Credit", "Count"]);
    for row in category_breakdown(ledger) {
        table.add_row(vec![
            Cell::new(row.category.label()),
            Cell::new(money(row.debit)),
            Cell::new(money(row.credit)),
            Cell::new(row.count),
        ]);
    }
    println!("\nBy Category\n{table}");
}

pub fn run(file: &str, bank: Option<&str>) -> Result<()> {
    let statement = super::load_statement(file, bank)?;
    let ledger = &statement.ledger;
    println!("{} ({})", statement.bank.name().bold(), statement.bank.key());
    if ledger.summary.transaction_count == 0 {
        println!("No transactions found");
        return Ok(());
    }
    print_summary(&ledger.summary);
    print_tax_summary(ledger);
    print_breakdown(ledger);
    Ok(())
}
