use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Extractor output
// ---------------------------------------------------------------------------

/// A positioned word as reported by the text extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub x0: f64,
    #[serde(default)]
    pub x1: Option<f64>,
    pub top: f64,
}

impl Word {
    /// Horizontal anchor used for column matching. Amounts are right-aligned, so the
    /// right edge is preferred when the extractor reports it.
    pub fn anchor(&self) -> f64 {
        self.x1.unwrap_or(self.x0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceDocument {
    pub pages: Vec<Page>,
}

impl SourceDocument {
    pub fn has_text(&self) -> bool {
        self.pages
            .iter()
            .any(|p| !p.text.trim().is_empty() || p.words.iter().any(|w| !w.text.trim().is_empty()))
    }
}

// ---------------------------------------------------------------------------
// Normalized lines
// ---------------------------------------------------------------------------

/// Horizontal position of the word starting at byte `offset` of a line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub offset: usize,
    pub x: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub page: usize,
    pub text: String,
    /// Empty unless the word view produced the same string.
    pub anchors: Vec<Anchor>,
}

impl Line {
    #[cfg(test)]
    pub fn new(page: usize, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
            anchors: Vec::new(),
        }
    }

    /// Anchor of the word containing byte `offset`.
    pub fn x_at(&self, offset: usize) -> Option<f64> {
        self.anchors
            .iter()
            .take_while(|a| a.offset <= offset)
            .last()
            .map(|a| a.x)
    }
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Debit,
    Credit,
}

/// How a record's debit/credit side was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignSource {
    Column,
    SignedToken,
    BalanceDelta,
    CategoryPrior,
    Keyword,
    Fallback,
}

impl SignSource {
    /// Same spelling as the serialized form.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Column => "column",
            Self::SignedToken => "signed_token",
            Self::BalanceDelta => "balance_delta",
            Self::CategoryPrior => "category_prior",
            Self::Keyword => "keyword",
            Self::Fallback => "fallback",
        }
    }
}

/// Intermediate representation of a matched statement line before sign inference.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    pub date: NaiveDate,
    pub description: String,
    pub description_normalized: String,
    /// Magnitude, always positive.
    pub amount: Decimal,
    pub side_hint: Option<(Side, SignSource)>,
    pub running_balance: Option<Decimal>,
    pub page: usize,
    pub sequence: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Category {
    #[serde(rename = "Opening balance")]
    OpeningBalance,
    #[serde(rename = "SIRCREB")]
    Sircreb,
    #[serde(rename = "Ley 25.413")]
    Ley25413,
    #[serde(rename = "IVA perception")]
    IvaPerception,
    #[serde(rename = "IVA 10.5%")]
    Iva105,
    #[serde(rename = "IVA 21%")]
    Iva21,
    #[serde(rename = "Bank commissions")]
    BankCommissions,
    #[serde(rename = "Automatic debit")]
    AutomaticDebit,
    #[serde(rename = "DyC")]
    Dyc,
    #[serde(rename = "ARCA debits")]
    ArcaDebits,
    #[serde(rename = "API")]
    Api,
    #[serde(rename = "Loan installment")]
    LoanInstallment,
    #[serde(rename = "Loan credit")]
    LoanCredit,
    #[serde(rename = "Cheques 48 hs")]
    Cheques48,
    #[serde(rename = "Card settlements")]
    CardSettlements,
    #[serde(rename = "Cash deposit")]
    CashDeposit,
    #[serde(rename = "Transfer received")]
    TransferReceived,
    #[serde(rename = "Transfer sent")]
    TransferSent,
    #[serde(rename = "Own-account transfer")]
    OwnAccountTransfer,
    #[serde(rename = "Negotiated instruments")]
    NegotiatedInstruments,
    #[serde(rename = "Credit")]
    Credit,
    #[serde(rename = "Debit")]
    Debit,
    #[default]
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::OpeningBalance => "Opening balance",
            Self::Sircreb => "SIRCREB",
            Self::Ley25413 => "Ley 25.413",
            Self::IvaPerception => "IVA perception",
            Self::Iva105 => "IVA 10.5%",
            Self::Iva21 => "IVA 21%",
            Self::BankCommissions => "Bank commissions",
            Self::AutomaticDebit => "Automatic debit",
            Self::Dyc => "DyC",
            Self::ArcaDebits => "ARCA debits",
            Self::Api => "API",
            Self::LoanInstallment => "Loan installment",
            Self::LoanCredit => "Loan credit",
            Self::Cheques48 => "Cheques 48 hs",
            Self::CardSettlements => "Card settlements",
            Self::CashDeposit => "Cash deposit",
            Self::TransferReceived => "Transfer received",
            Self::TransferSent => "Transfer sent",
            Self::OwnAccountTransfer => "Own-account transfer",
            Self::NegotiatedInstruments => "Negotiated instruments",
            Self::Credit => "Credit",
            Self::Debit => "Debit",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub description: String,
    pub description_normalized: String,
    pub amount: Decimal,
    pub running_balance: Option<Decimal>,
    pub debit: Decimal,
    pub credit: Decimal,
    /// Opening balance plus cumulative movements up to and including this record.
    pub reconstructed_balance: Option<Decimal>,
    pub page: usize,
    pub sequence: usize,
    pub sign_source: Option<SignSource>,
    pub category: Category,
    pub is_opening: bool,
}

impl TransactionRecord {
    pub fn from_row(row: ParsedRow, side: Side, source: SignSource) -> Self {
        let (debit, credit) = match side {
            Side::Debit => (row.amount, Decimal::ZERO),
            Side::Credit => (Decimal::ZERO, row.amount),
        };
        Self {
            date: row.date,
            description: row.description,
            description_normalized: row.description_normalized,
            amount: row.amount,
            running_balance: row.running_balance,
            debit,
            credit,
            reconstructed_balance: None,
            page: row.page,
            sequence: row.sequence,
            sign_source: Some(source),
            category: Category::default(),
            is_opening: false,
        }
    }

    /// Synthetic first row carrying the balance in effect before the period.
    pub fn opening(date: NaiveDate, balance: Decimal) -> Self {
        Self {
            date,
            description: "SALDO ANTERIOR".to_string(),
            description_normalized: "SALDO ANTERIOR".to_string(),
            amount: Decimal::ZERO,
            running_balance: Some(balance),
            debit: Decimal::ZERO,
            credit: Decimal::ZERO,
            reconstructed_balance: Some(balance),
            page: 0,
            sequence: 0,
            sign_source: None,
            category: Category::OpeningBalance,
            is_opening: true,
        }
    }

    /// Balance to show: the statement's own figure when it printed one.
    pub fn display_balance(&self) -> Option<Decimal> {
        self.running_balance.or(self.reconstructed_balance)
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

/// A balance printed on the statement, with its date when the line carried one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatedBalance {
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningSource {
    Stated,
    Derived,
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosingSource {
    Stated,
    LastRecord,
    Reconstructed,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerSummary {
    pub opening_balance: Decimal,
    pub opening_source: OpeningSource,
    pub total_debits: Decimal,
    pub total_credits: Decimal,
    pub closing_stated: Decimal,
    pub closing_source: ClosingSource,
    pub closing_date: Option<NaiveDate>,
    pub closing_reconstructed: Decimal,
    pub difference: Decimal,
    pub reconciled: bool,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ledger {
    pub records: Vec<TransactionRecord>,
    pub summary: LedgerSummary,
}

impl Ledger {
    /// Records excluding the synthetic opening row.
    pub fn transactions(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.records.iter().filter(|r| !r.is_opening)
    }
}
