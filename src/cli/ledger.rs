use std::fs::File;
use std::io::{self, Write};

use colored::Colorize;
use comfy_table::{Cell, Table};
use log::info;
use serde_json::json;

use super::summary::{reconciliation_line, summary_table};
use super::OutputFormat;
use crate::error::Result;
use crate::fmt::{money_opt, money_or_blank};
use crate::importer::Statement;
use crate::models::Ledger;

pub fn ledger_table(ledger: &Ledger) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Description", "Debit", "Credit", "Balance", "Category"]);
    for r in &ledger.records {
        let description = if r.is_opening {
            Cell::new(r.description.as_str().bold())
        } else {
            Cell::new(&r.description)
        };
        table.add_row(vec![
            Cell::new(r.date.format("%d/%m/%Y")),
            description,
            Cell::new(money_or_blank(r.debit)),
            Cell::new(money_or_blank(r.credit)),
            Cell::new(money_opt(r.display_balance())),
            Cell::new(r.category.label()),
        ]);
    }
    table
}

fn opt(value: Option<rust_decimal::Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn write_csv<W: Write>(ledger: &Ledger, out: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record([
        "date",
        "description",
        "description_normalized",
        "debit",
        "credit",
        "balance",
        "reconstructed_balance",
        "category",
        "page",
        "sign_source",
    ])?;
    for r in &ledger.records {
        let sign_source = r.sign_source.map(|s| s.key()).unwrap_or_default();
        wtr.write_record([
            r.date.format("%Y-%m-%d").to_string(),
            r.description.clone(),
            r.description_normalized.clone(),
            r.debit.to_string(),
            r.credit.to_string(),
            opt(r.running_balance),
            opt(r.reconstructed_balance),
            r.category.label().to_string(),
            r.page.to_string(),
            sign_source.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_json<W: Write>(statement: &Statement, mut out: W) -> Result<()> {
    let value = json!({
        "bank": statement.bank.key(),
        "records": statement.ledger.records,
        "summary": statement.ledger.summary,
    });
    serde_json::to_writer_pretty(&mut out, &value)?;
    writeln!(out)?;
    Ok(())
}

fn write_table<W: Write>(statement: &Statement, mut out: W) -> Result<()> {
    let ledger = &statement.ledger;
    writeln!(out, "{} ({})", statement.bank.name(), statement.bank.key())?;
    writeln!(out, "Ledger\n{}", ledger_table(ledger))?;
    writeln!(out, "\nStatement Summary\n{}", summary_table(&ledger.summary))?;
    writeln!(out, "{}", reconciliation_line(&ledger.summary))?;
    Ok(())
}

pub fn run(
    file: &str,
    bank: Option<&str>,
    format: OutputFormat,
    output: Option<&str>,
) -> Result<()> {
    let statement = super::load_statement(file, bank)?;
    if statement.ledger.transactions().next().is_none() {
        println!("No transactions found");
        return Ok(());
    }

    let out: Box<dyn Write> = match output {
        Some(path) => {
            colored::control::set_override(false);
            Box::new(File::create(path)?)
        }
        None => Box::new(io::stdout().lock()),
    };
    match format {
        OutputFormat::Table => write_table(&statement, out)?,
        OutputFormat::Csv => write_csv(&statement.ledger, out)?,
        OutputFormat::Json => write_json(&statement, out)?,
    }
    if let Some(path) = output {
        info!("wrote {} records to {path}", statement.ledger.records.len());
        println!("Wrote {path}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParsedRow, Side, SignSource, StatedBalance, TransactionRecord};
    use crate::reconciler::summarize;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ledger() -> Ledger {
        let row = ParsedRow {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            description: "PAGO, SERVICIO".to_string(),
            description_normalized: "PAGO, SERVICIO".to_string(),
            amount: dec!(1500.00),
            side_hint: None,
            running_balance: Some(dec!(8500.00)),
            page: 1,
            sequence: 1,
        };
        let records = vec![TransactionRecord::from_row(
            row,
            Side::Debit,
            SignSource::BalanceDelta,
        )];
        let opening = Some(StatedBalance {
            amount: dec!(10000.00),
            date: None,
        });
        summarize(records, opening, None, dec!(0.01))
    }

    #[test]
    fn test_write_csv() {
        let mut buf = Vec::new();
        write_csv(&ledger(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,description,"));
        assert!(lines[1].starts_with("2024-03-14,SALDO ANTERIOR,"));
        assert!(lines[2].contains("\"PAGO, SERVICIO\""));
        assert!(lines[2].contains(",1500.00,0,8500.00,8500.00,"));
        assert!(lines[2].ends_with(",balance_delta"));
    }

    #[test]
    fn test_ledger_table_has_opening_row() {
        let rendered = ledger_table(&ledger()).to_string();
        assert!(rendered.contains("14/03/2024"));
        assert!(rendered.contains("1.500,00"));
        assert!(rendered.contains("Opening balance"));
    }
}
