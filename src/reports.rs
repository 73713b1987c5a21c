use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{Category, Ledger};

const IVA_21_RATE: Decimal = dec!(0.21);
const IVA_105_RATE: Decimal = dec!(0.105);

fn debits_of(ledger: &Ledger, category: Category) -> Decimal {
    ledger
        .transactions()
        .filter(|r| r.category == category)
        .map(|r| r.debit)
        .sum()
}

/// Net commission behind an IVA charge, to the cent.
fn net_from_iva(iva: Decimal, rate: Decimal) -> Decimal {
    if iva.is_zero() {
        Decimal::ZERO
    } else {
        (iva / rate).round_dp(2)
    }
}

// ---------------------------------------------------------------------------
// IVA operating summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TaxSummary {
    pub net_21: Decimal,
    pub iva_21: Decimal,
    pub net_105: Decimal,
    pub iva_105: Decimal,
    pub iva_perceptions: Decimal,
    pub ley_25413: Decimal,
    pub sircreb: Decimal,
}

impl TaxSummary {
    pub fn gross_21(&self) -> Decimal {
        self.net_21 + self.iva_21
    }

    pub fn gross_105(&self) -> Decimal {
        self.net_105 + self.iva_105
    }

    pub fn total(&self) -> Decimal {
        self.gross_21() + self.gross_105() + self.iva_perceptions + self.ley_25413 + self.sircreb
    }

    /// Label/amount pairs in display order, total last.
    pub fn lines(&self) -> Vec<(&'static str, Decimal)> {
        vec![
            ("Net commissions 21%", self.net_21),
            ("IVA 21%", self.iva_21),
            ("Gross 21%", self.gross_21()),
            ("Net commissions 10.5%", self.net_105),
            ("IVA 10.5%", self.iva_105),
            ("Gross 10.5%", self.gross_105()),
            ("IVA perceptions (RG 3337)", self.iva_perceptions),
            ("Ley 25.413", self.ley_25413),
            ("SIRCREB", self.sircreb),
            ("Total", self.total()),
        ]
    }
}

pub fn tax_summary(ledger: &Ledger) -> TaxSummary {
    let iva_21 = debits_of(ledger, Category::Iva21);
    let iva_105 = debits_of(ledger, Category::Iva105);
    TaxSummary {
        net_21: net_from_iva(iva_21, IVA_21_RATE),
        iva_21,
        net_105: net_from_iva(iva_105, IVA_105_RATE),
        iva_105,
        iva_perceptions: debits_of(ledger, Category::IvaPerception),
        ley_25413: debits_of(ledger, Category::Ley25413),
        sircreb: debits_of(ledger, Category::Sircreb),
    }
}

// ---------------------------------------------------------------------------
// Category breakdown
// ---------------------------------------------------------------------------

pub struct CategoryTotal {
    pub category: Category,
    pub debit: Decimal,
    pub credit: Decimal,
    pub count: usize,
}

/// Totals per category in rule order, skipping categories with no records.
pub fn category_breakdown(ledger: &Ledger) -> Vec<CategoryTotal> {
    crate::categorizer::rules()
        .iter()
        .map(|rule| rule.category)
        .filter_map(|category| {
            let mut total = CategoryTotal {
                category,
                debit: Decimal::ZERO,
                credit: Decimal::ZERO,
                count: 0,
            };
            for r in ledger.transactions().filter(|r| r.category == category) {
                total.debit += r.debit;
                total.credit += r.credit;
                total.count += 1;
            }
            (total.count > 0).then_some(total)
        })
        .collect()
}
