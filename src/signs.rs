use log::{debug, warn};
use rust_decimal::Decimal;

use crate::categorizer;
use crate::importer::Variant;
use crate::models::{ParsedRow, Side, SignSource, TransactionRecord};

pub const CREDIT_MARKERS: &[&str] = &[
    "CR-",
    "CR.",
    "TRANSF RECIB",
    "TRANLINK",
    "ACRED",
    "DEPOSITO",
    "DEP.EFECTIVO",
    "PAGO COMERC",
];

pub const DEBIT_MARKERS: &[&str] = &[
    "DB-",
    "DEB.",
    "DEBITO",
    "PAGO",
    "IMP",
    "COMISION",
    "COM.",
    "EXTRACCION",
    "TRSFE-ET",
    "TRSFE-IT",
];

fn from_delta(
    row: &ParsedRow,
    previous: Decimal,
    tolerance: Decimal,
) -> Option<(Side, SignSource)> {
    let balance = row.running_balance?;
    let delta = balance - previous;
    if (delta.abs() - row.amount).abs() >= tolerance {
        return None;
    }
    if delta > Decimal::ZERO {
        Some((Side::Credit, SignSource::BalanceDelta))
    } else if delta < Decimal::ZERO {
        Some((Side::Debit, SignSource::BalanceDelta))
    } else {
        None
    }
}

/// Text-only classification checked against the variant's one-sided categories.
fn from_prior(row: &ParsedRow, variant: &Variant) -> Option<(Side, SignSource)> {
    let category = categorizer::classify(
        &row.description,
        &row.description_normalized,
        Decimal::ZERO,
        Decimal::ZERO,
        false,
    );
    if variant.debit_priors.contains(&category) {
        Some((Side::Debit, SignSource::CategoryPrior))
    } else if variant.credit_priors.contains(&category) {
        Some((Side::Credit, SignSource::CategoryPrior))
    } else {
        None
    }
}

fn from_keywords(normalized: &str) -> Option<(Side, SignSource)> {
    if CREDIT_MARKERS.iter().any(|k| normalized.contains(k)) {
        Some((Side::Credit, SignSource::Keyword))
    } else if DEBIT_MARKERS.iter().any(|k| normalized.contains(k)) {
        Some((Side::Debit, SignSource::Keyword))
    } else {
        None
    }
}

/// Decide debit or credit for every row, in order.
///
/// `opening` seeds the balance tracker; without it the tracker starts at zero and
/// the first delta rarely matches, so the first side is usually a guess.
pub fn infer_signs(
    rows: Vec<ParsedRow>,
    opening: Option<Decimal>,
    variant: &Variant,
    tolerance: Decimal,
) -> Vec<TransactionRecord> {
    if opening.is_none() {
        warn!("no opening balance, balance deltas start from zero");
    }
    let mut previous = opening.unwrap_or(Decimal::ZERO);
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let decision = row
            .side_hint
            .or_else(|| from_delta(&row, previous, tolerance))
            .or_else(|| from_prior(&row, variant))
            .or_else(|| from_keywords(&row.description_normalized));
        let (side, source) = decision.unwrap_or_else(|| {
            warn!(
                "no sign evidence for {} {:?} ({}), assuming debit",
                row.date, row.description, row.amount
            );
            (Side::Debit, SignSource::Fallback)
        });
        if let Some(balance) = row.running_balance {
            previous = balance;
        }
        records.push(TransactionRecord::from_row(row, side, source));
    }

    let fallbacks = records
        .iter()
        .filter(|r| r.sign_source == Some(SignSource::Fallback))
        .count();
    debug!("signs inferred for {} records, {} by fallback", records.len(), fallbacks);
    records
}

/// Fill `reconstructed_balance` cumulatively from `opening`. Signs and stated
/// balances are left alone.
pub fn reconstruct_balances(records: &mut [TransactionRecord], opening: Decimal) -> Decimal {
    let mut balance = opening;
    for record in records.iter_mut() {
        if !record.is_opening {
            balance += record.credit - record.debit;
        }
        record.reconstructed_balance = Some(balance);
    }
    balance
}
