use comfy_table::{Cell, Table};
use rust_decimal::Decimal;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path, Settings};

fn print_settings(settings: &Settings) {
    let mut table = Table::new();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![Cell::new("sign_tolerance"), Cell::new(settings.sign_tolerance)]);
    table.add_row(vec![
        Cell::new("reconcile_tolerance"),
        Cell::new(settings.reconcile_tolerance),
    ]);
    table.add_row(vec![Cell::new("band_tolerance"), Cell::new(settings.band_tolerance)]);
    table.add_row(vec![
        Cell::new("default_bank"),
        Cell::new(settings.default_bank.as_deref().unwrap_or("unknown")),
    ]);
    println!("Settings ({})\n{table}", settings_path().display());
}

pub fn run(
    sign_tolerance: Option<Decimal>,
    reconcile_tolerance: Option<Decimal>,
    band_tolerance: Option<f64>,
    default_bank: Option<String>,
) -> Result<()> {
    let mut settings = load_settings();
    let changed = sign_tolerance.is_some()
        || reconcile_tolerance.is_some()
        || band_tolerance.is_some()
        || default_bank.is_some();

    if let Some(v) = sign_tolerance {
        settings.sign_tolerance = v;
    }
    if let Some(v) = reconcile_tolerance {
        settings.reconcile_tolerance = v;
    }
    if let Some(v) = band_tolerance {
        settings.band_tolerance = v;
    }
    if let Some(key) = default_bank {
        let key = key.trim().to_lowercase();
        settings.default_bank = if key.is_empty() { None } else { Some(key) };
    }

    if changed {
        save_settings(&settings)?;
        println!("Settings saved.");
    }
    print_settings(&settings);
    Ok(())
}
