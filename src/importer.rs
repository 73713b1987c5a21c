use log::{debug, info};

use crate::balances::{find_closing_balance, find_opening_balance};
use crate::categorizer::categorize_records;
use crate::error::{ExtractoError, Result};
use crate::lines::extract_all_lines;
use crate::matcher::{match_lines, Layout};
use crate::models::{Category, Ledger, ParsedRow, SourceDocument, StatedBalance};
use crate::patterns::Patterns;
use crate::reconciler::summarize;
use crate::settings::Settings;
use crate::signs::infer_signs;

// ---------------------------------------------------------------------------
// Variants
// ---------------------------------------------------------------------------

/// Parameters of the matcher and sign-inference stages for one statement layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub layout: Layout,
    /// Fewest money tokens a movement line may carry.
    pub min_amounts: usize,
    pub debit_priors: &'static [Category],
    pub credit_priors: &'static [Category],
}

const DEBIT_PRIORS: &[Category] = &[
    Category::Sircreb,
    Category::Ley25413,
    Category::IvaPerception,
    Category::Iva105,
    Category::Iva21,
    Category::BankCommissions,
    Category::AutomaticDebit,
    Category::LoanInstallment,
];

const CREDIT_PRIORS: &[Category] = &[
    Category::LoanCredit,
    Category::Cheques48,
    Category::CardSettlements,
    Category::CashDeposit,
    Category::NegotiatedInstruments,
];

// ---------------------------------------------------------------------------
// Bank kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankKind {
    Generic,
    Galicia,
    SantaFe,
    Santander,
}

impl BankKind {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Generic => "unknown",
            Self::Galicia => "galicia",
            Self::SantaFe => "santafe",
            Self::Santander => "santander",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Generic => "Generic statement",
            Self::Galicia => "Banco Galicia",
            Self::SantaFe => "Banco de Santa Fe",
            Self::Santander => "Banco Santander",
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Self::Generic => Variant {
                layout: Layout::Rightmost,
                min_amounts: 2,
                debit_priors: DEBIT_PRIORS,
                credit_priors: CREDIT_PRIORS,
            },
            // Santa Fe statements always print a running balance; the delta decides.
            Self::SantaFe => Variant {
                layout: Layout::Rightmost,
                min_amounts: 2,
                debit_priors: &[],
                credit_priors: &[],
            },
            Self::Galicia => Variant {
                layout: Layout::SignedAmount,
                min_amounts: 2,
                debit_priors: DEBIT_PRIORS,
                credit_priors: CREDIT_PRIORS,
            },
            Self::Santander => Variant {
                layout: Layout::Columns,
                min_amounts: 1,
                debit_priors: DEBIT_PRIORS,
                credit_priors: CREDIT_PRIORS,
            },
        }
    }
}

pub const ALL_BANKS: &[BankKind] = &[
    BankKind::Generic,
    BankKind::Galicia,
    BankKind::SantaFe,
    BankKind::Santander,
];

/// Case-insensitive; an empty key means the generic layout.
pub fn get_by_key(key: &str) -> Option<BankKind> {
    let key = key.trim();
    if key.is_empty() {
        return Some(BankKind::Generic);
    }
    ALL_BANKS.iter().find(|b| b.key().eq_ignore_ascii_case(key)).copied()
}

/// Explicit choice first, then the configured default, then the generic layout.
pub fn resolve_bank(explicit: Option<&str>, settings: &Settings) -> Result<BankKind> {
    match explicit.or(settings.default_bank.as_deref()) {
        Some(key) => get_by_key(key).ok_or_else(|| ExtractoError::UnknownBank(key.to_string())),
        None => Ok(BankKind::Generic),
    }
}

// ---------------------------------------------------------------------------
// import_statement
// ---------------------------------------------------------------------------

/// Signs, then categories, then the summary. Records are final once summarized.
fn build_ledger(
    rows: Vec<ParsedRow>,
    opening: Option<StatedBalance>,
    closing: Option<StatedBalance>,
    variant: &Variant,
    settings: &Settings,
) -> Ledger {
    let mut records = infer_signs(
        rows,
        opening.map(|o| o.amount),
        variant,
        settings.sign_tolerance,
    );
    let tagged = categorize_records(&mut records);
    debug!(
        "{} records categorized by rule, {} by side only",
        tagged.categorized, tagged.by_side_only
    );
    summarize(records, opening, closing, settings.reconcile_tolerance)
}

pub struct Statement {
    pub bank: BankKind,
    pub ledger: Ledger,
}

pub fn import_statement(
    doc: &SourceDocument,
    bank: BankKind,
    settings: &Settings,
) -> Result<Statement> {
    import_with_patterns(doc, bank, settings, Patterns::shared())
}

pub fn import_with_patterns(
    doc: &SourceDocument,
    bank: BankKind,
    settings: &Settings,
    patterns: &Patterns,
) -> Result<Statement> {
    if !doc.has_text() {
        return Err(ExtractoError::EmptyDocument(format!(
            "document with {} page(s)",
            doc.pages.len()
        )));
    }
    let variant = bank.variant();

    let lines = extract_all_lines(doc, settings.band_tolerance);
    let rows = match_lines(&lines, variant.layout, variant.min_amounts, patterns);
    let opening = find_opening_balance(&lines, patterns);
    let closing = find_closing_balance(&lines, patterns);
    debug!("stated opening {opening:?}, stated closing {closing:?}");

    let ledger = build_ledger(rows, opening, closing, &variant, settings);
    info!(
        "{}: {} transactions, reconciled: {}",
        bank.key(),
        ledger.summary.transaction_count,
        ledger.summary.reconciled
    );

    Ok(Statement { bank, ledger })
}
