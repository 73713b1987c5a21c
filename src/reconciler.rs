use log::{debug, warn};
use rust_decimal::Decimal;

use crate::models::{
    ClosingSource, Ledger, LedgerSummary, OpeningSource, SignSource, StatedBalance,
    TransactionRecord,
};
use crate::signs::reconstruct_balances;

/// Balance before the first record, recovered from its own running balance.
///
/// Only a side printed by the statement itself (a column or a signed token) is
/// trusted here. An inferred side would make the first record agree with itself.
fn derive_opening(records: &[TransactionRecord]) -> Option<Decimal> {
    let first = records.first()?;
    match first.sign_source {
        Some(SignSource::Column | SignSource::SignedToken) => {
            first.running_balance.map(|b| b - first.credit + first.debit)
        }
        _ => None,
    }
}

/// Build the ledger: opening row first, reconstructed balances filled in, closing
/// balance checked against the statement. A mismatch is reported, never corrected.
pub fn summarize(
    mut records: Vec<TransactionRecord>,
    opening: Option<StatedBalance>,
    closing: Option<StatedBalance>,
    tolerance: Decimal,
) -> Ledger {
    let (opening_balance, opening_source) = match opening {
        Some(stated) => (stated.amount, OpeningSource::Stated),
        None => match derive_opening(&records) {
            Some(derived) => (derived, OpeningSource::Derived),
            None => (Decimal::ZERO, OpeningSource::Missing),
        },
    };

    if opening_source != OpeningSource::Missing {
        if let Some(first_date) = records.iter().map(|r| r.date).min() {
            let date = first_date.pred_opt().unwrap_or(first_date);
            records.insert(0, TransactionRecord::opening(date, opening_balance));
        }
    }

    let closing_reconstructed = reconstruct_balances(&mut records, opening_balance);
    let total_debits: Decimal = records.iter().map(|r| r.debit).sum();
    let total_credits: Decimal = records.iter().map(|r| r.credit).sum();
    let transaction_count = records.iter().filter(|r| !r.is_opening).count();

    let (closing_stated, closing_source, closing_date) = match closing {
        Some(stated) => (stated.amount, ClosingSource::Stated, stated.date),
        None => match records.last().filter(|r| !r.is_opening).and_then(|r| r.running_balance) {
            Some(balance) => (balance, ClosingSource::LastRecord, None),
            None => (closing_reconstructed, ClosingSource::Reconstructed, None),
        },
    };

    let difference = closing_reconstructed - closing_stated;
    let reconciled = difference.abs() < tolerance;
    if reconciled {
        debug!(
            "reconciled: {closing_reconstructed} against {closing_stated} ({closing_source:?})"
        );
    } else {
        warn!(
            "closing balance mismatch: reconstructed {closing_reconstructed}, \
             stated {closing_stated}, difference {difference}"
        );
    }

    Ledger {
        records,
        summary: LedgerSummary {
            opening_balance,
            opening_source,
            total_debits,
            total_credits,
            closing_stated,
            closing_source,
            closing_date,
            closing_reconstructed,
            difference,
            reconciled,
            transaction_count,
        },
    }
}
