use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::importer::ALL_BANKS;
use crate::matcher::Layout;
use crate::settings::load_settings;

fn layout_label(layout: Layout) -> &'static str {
    match layout {
        Layout::Rightmost => "amount + balance",
        Layout::SignedAmount => "signed amount + balance",
        Layout::Columns => "header columns",
    }
}

pub fn run() -> Result<()> {
    let default = load_settings().default_bank.unwrap_or_default();
    let mut table = Table::new();
    table.set_header(vec!["Key", "Name", "Layout", "Min amounts", ""]);
    for bank in ALL_BANKS {
        let variant = bank.variant();
        let marker = if bank.key().eq_ignore_ascii_case(&default) {
            "default"
        } else {
            ""
        };
        table.add_row(vec![
            Cell::new(bank.key()),
            Cell::new(bank.name()),
            Cell::new(layout_label(variant.layout)),
            Cell::new(variant.min_amounts),
            Cell::new(marker),
        ]);
    }
    println!("Banks\n{table}");
    Ok(())
}
