//! Regular expressions shared by every stage of the pipeline.
//!
//! Everything here is compiled once and never mutated, so a single `Patterns`
//! value can be handed to any number of concurrent imports.

use std::sync::OnceLock;

use regex::Regex;

/// Money grammar: optional `.` thousands groups, mandatory `,` decimals, sign as a
/// leading or trailing minus. Whitespace delimiting is enforced by
/// [`crate::amount::find_money_tokens`] because the regex crate has no lookaround.
const MONEY: &str = r"-?(?:[0-9]{1,3}(?:\.[0-9]{3})*|[0-9]+)\s?,\s?[0-9]{2}-?";

pub struct Patterns {
    pub date: Regex,
    pub money: Regex,
    pub long_number: Regex,
    pub opening_prefix: Regex,
    pub opening_inline: Regex,
    pub last_summary: Regex,
    pub closing_prefix: Regex,
    pub closing_inline: Regex,
    pub header_row: Regex,
    pub non_movement: Regex,
    pub balance_line: Regex,
    pub debit_column: Regex,
    pub credit_column: Regex,
    pub balance_column: Regex,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern must compile")
}

impl Patterns {
    pub fn new() -> Self {
        Self {
            date: compile(r"\b[0-9]{1,2}/[0-9]{2}/[0-9]{2,4}\b"),
            money: compile(MONEY),
            long_number: compile(r"\b[0-9]{6,}\b"),
            opening_prefix: compile(r"(?i)^SALDO\s+[UÚ]?LTIMO\s+EXTRACTO\s+AL"),
            opening_inline: compile(&format!(r"(?i)SALDO\s+INICIAL.*?({MONEY})")),
            last_summary: compile(r"(?i)SALDO\s+[UÚ]?LTIMO\s+RESUMEN"),
            closing_prefix: compile(r"(?i)^SALDO\s+FINAL\s+AL\s+D[ÍI]A"),
            closing_inline: compile(&format!(r"(?i)SALDO\s+FINAL.*?({MONEY})")),
            header_row: compile(concat!(
                r"(?i)^(FECHA\s+DESCRIPCI[ÓO]N|FECHA\s+CONCEPTO|FECHA\s+DETALLE)",
                r".*(SALDO|D[ÉE]BITO|CR[ÉE]DITO)",
            )),
            non_movement: compile(concat!(
                r"(?i)(INFORMACI[ÓO]N\s+DE\s+SU/S\s+CUENTA/S|TOTAL\s+RESUMEN\s+OPERATIVO",
                r"|RESUMEN\s+DEL\s+PER[IÍ]ODO)",
            )),
            balance_line: compile(
                r"(?i)\bSALDO\s+(ANTERIOR|INICIAL|FINAL|[UÚ]?LTIMO\s+(EXTRACTO|RESUMEN)|AL\b)",
            ),
            debit_column: compile(r"(?i)^D[ÉE]BITOS?$"),
            credit_column: compile(r"(?i)^CR[ÉE]DITOS?$"),
            balance_column: compile(r"(?i)^SALDOS?$"),
        }
    }

    /// Process-wide instance.
    pub fn shared() -> &'static Patterns {
        static PATTERNS: OnceLock<Patterns> = OnceLock::new();
        PATTERNS.get_or_init(Patterns::new)
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_pattern() {
        let p = Patterns::shared();
        assert!(p.date.is_match("15/03/2024 PAGO"));
        assert!(p.date.is_match("1/03/24"));
        assert!(!p.date.is_match("2024-03-15"));
    }

    #[test]
    fn test_header_row_pattern() {
        let p = Patterns::shared();
        assert!(p.header_row.is_match("FECHA DESCRIPCION REFERENCIA DEBITO CREDITO SALDO"));
        assert!(p.header_row.is_match("Fecha Concepto Débito Crédito Saldo"));
        assert!(!p.header_row.is_match("15/03/2024 PAGO 1,00 2,00"));
    }

    #[test]
    fn test_balance_line_pattern() {
        let p = Patterns::shared();
        assert!(p.balance_line.is_match("SALDO ANTERIOR 10.000,00"));
        assert!(p.balance_line.is_match("Saldo al 31/03/2024 500,00"));
        assert!(p.balance_line.is_match("SALDO ULTIMO EXTRACTO AL 29/02/2024 1,00"));
        assert!(!p.balance_line.is_match("15/03/2024 PAGO SERVICIO 1,00 2,00"));
    }

    #[test]
    fn test_inline_balances_capture_amount() {
        let p = Patterns::shared();
        let caps = p.opening_inline.captures("Saldo inicial $ 1.234,56").unwrap();
        assert_eq!(&caps[1], "1.234,56");
        let caps = p.closing_inline.captures("SALDO FINAL 9.876,54-").unwrap();
        assert_eq!(&caps[1], "9.876,54-");
    }
}
