use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::models::{Category, TransactionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Guard {
    Any,
    Debit,
    Credit,
}

/// One entry of the ordered rule list. Text conditions are OR-ed; a rule without
/// any text condition matches every description. The guard is AND-ed on top.
pub struct Rule {
    pub category: Category,
    opening: bool,
    both: &'static [&'static str],
    raw: &'static [&'static str],
    normalized: &'static [&'static str],
    regex: Option<Regex>,
    guard: Guard,
}

impl Rule {
    fn new(category: Category) -> Self {
        Self {
            category,
            opening: false,
            both: &[],
            raw: &[],
            normalized: &[],
            regex: None,
            guard: Guard::Any,
        }
    }

    fn opening(mut self) -> Self {
        self.opening = true;
        self
    }

    fn both(mut self, needles: &'static [&'static str]) -> Self {
        self.both = needles;
        self
    }

    fn raw(mut self, needles: &'static [&'static str]) -> Self {
        self.raw = needles;
        self
    }

    fn normalized(mut self, needles: &'static [&'static str]) -> Self {
        self.normalized = needles;
        self
    }

    fn regex(mut self, pattern: &str) -> Self {
        let re = Regex::new(&format!("(?i){pattern}")).expect("built-in rule must compile");
        self.regex = Some(re);
        self
    }

    fn guard(mut self, guard: Guard) -> Self {
        self.guard = guard;
        self
    }

    fn has_text(&self) -> bool {
        !self.both.is_empty()
            || !self.raw.is_empty()
            || !self.normalized.is_empty()
            || self.regex.is_some()
    }

    fn text_matches(&self, raw: &str, normalized: &str) -> bool {
        let contains = |hay: &str, needles: &[&str]| needles.iter().any(|n| hay.contains(n));
        contains(raw, self.both)
            || contains(normalized, self.both)
            || contains(raw, self.raw)
            || contains(normalized, self.normalized)
            || self
                .regex
                .as_ref()
                .is_some_and(|re| re.is_match(raw) || re.is_match(normalized))
    }

    pub fn matches(
        &self,
        raw: &str,
        normalized: &str,
        debit: Decimal,
        credit: Decimal,
        is_opening: bool,
    ) -> bool {
        if self.opening && is_opening {
            return true;
        }
        let guard_ok = match self.guard {
            Guard::Any => true,
            Guard::Debit => !debit.is_zero(),
            Guard::Credit => !credit.is_zero(),
        };
        guard_ok && (!self.has_text() || self.text_matches(raw, normalized))
    }
}

fn build_rules() -> Vec<Rule> {
    use Category::*;
    vec![
        Rule::new(OpeningBalance).opening().both(&["SALDO ANTERIOR"]),
        Rule::new(Sircreb).regex(r"\bSIRCREB\b|ING\.\s*BRUTOS.*S/?\s*CRED"),
        Rule::new(Ley25413).both(&["LEY 25413", "IMPTRANS"]).regex(concat!(
            r"\b(?:IMP\.?\s*DEB\.?/CRE\.?\s*LEY\s*25\.?413|LEY\s*25\.?413",
            r"|IMPDBCR\s*25413|N/?D\s*DBCR\s*25413|IMPTRANS|IMP\.?\s*S/CREDS)\b",
        )),
        Rule::new(IvaPerception)
            .regex(r"IVA\s*PERC|IVA\s*PERCEP|RG\.?\s*3337|RG\.?\s*2408|RETEN.*I\.?V\.?A"),
        Rule::new(Iva105).regex(r"IVA\s*10[,\.]5|IVA\s*REDUC|IVA\s*RINS"),
        Rule::new(Iva21).regex(r"I\.?V\.?A\.?\s*BASE|IVA\s*GRAL|DEBITO\s*FISCAL\s*IVA\s*BASICO"),
        Rule::new(BankCommissions).normalized(&[
            "COMOPREM",
            "COMVCAUT",
            "COMTRSIT",
            "COM.NEGO",
            "CO.EXCESO",
            "COM.",
            "COMISION",
        ]),
        Rule::new(AutomaticDebit)
            .normalized(&["DB-SNP", "DEB.AUT", "DEB.AUTOM", "SEGUROS", "GTOS SEG"]),
        Rule::new(Dyc).normalized(&["DYC"]),
        Rule::new(ArcaDebits).normalized(&["AFIP", "ARCA"]).guard(Guard::Debit),
        Rule::new(Api).regex(r"\bAPI\b"),
        Rule::new(LoanInstallment)
            .raw(&["CUOTA PRÉSTAMO", "CUOTA PRESTAMO"])
            .normalized(&["DEB.CUOTA PRESTAMO"])
            .regex(r"DEB\..*PRESTAMO|PRESTAMO.*DEB\."),
        Rule::new(LoanCredit).normalized(&["CR.PREST", "CREDITO PRESTAMOS", "CRÉDITO PRÉSTAMOS"]),
        Rule::new(Cheques48).normalized(&["CH 48 HS", "CH.48 HS"]),
        Rule::new(CardSettlements).normalized(&["PAGO COMERC", "CR-CABAL", "CR CABAL", "CR TARJ"]),
        Rule::new(CashDeposit).normalized(&[
            "CR-DEPEF",
            "CR DEPEF",
            "DEPOSITO EFECTIVO",
            "DEP.EFECTIVO",
            "DEP EFECTIVO",
        ]),
        Rule::new(TransferReceived)
            .raw(&["TRANSFERENCIA DE TERCEROS"])
            .normalized(&["CR-TRSFE", "TRANSF RECIB", "TRANLINK"])
            .guard(Guard::Credit),
        Rule::new(TransferSent)
            .normalized(&["DB-TRSFE", "TRSFE-ET", "TRSFE-IT"])
            .guard(Guard::Debit),
        Rule::new(OwnAccountTransfer).normalized(&["DTNCTAPR", "ENTRE CTA", "CTA PROPIA"]),
        Rule::new(NegotiatedInstruments).normalized(&["NEG.CONT", "NEGOCIADOS"]),
        Rule::new(Credit).guard(Guard::Credit),
        Rule::new(Debit).guard(Guard::Debit),
        Rule::new(Other),
    ]
}

/// The rule list, in evaluation order.
pub fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(build_rules)
}

pub fn classify(
    description: &str,
    normalized: &str,
    debit: Decimal,
    credit: Decimal,
    is_opening: bool,
) -> Category {
    let raw = description.to_uppercase();
    let normalized = normalized.to_uppercase();
    rules()
        .iter()
        .find(|rule| rule.matches(&raw, &normalized, debit, credit, is_opening))
        .map_or(Category::Other, |rule| rule.category)
}

pub struct CategorizeResult {
    pub categorized: usize,
    pub by_side_only: usize,
}

/// Tag every record. Records that only fell through to the signed fallbacks are
/// counted separately.
pub fn categorize_records(records: &mut [TransactionRecord]) -> CategorizeResult {
    let mut categorized = 0usize;
    let mut by_side_only = 0usize;
    for record in records.iter_mut() {
        record.category = classify(
            &record.description,
            &record.description_normalized,
            record.debit,
            record.credit,
            record.is_opening,
        );
        match record.category {
            Category::Credit | Category::Debit | Category::Other => by_side_only += 1,
            _ => categorized += 1,
        }
    }
    CategorizeResult {
        categorized,
        by_side_only,
    }
}
