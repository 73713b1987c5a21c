use log::debug;
use rust_decimal::Decimal;

use crate::amount::{find_money_tokens, parse_date, MoneyToken};
use crate::models::{Line, ParsedRow, Side, SignSource};
use crate::patterns::Patterns;

/// How the amount and its side are read off a transaction line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Last token is the running balance, the one before it the amount.
    Rightmost,
    /// As `Rightmost`, and a negative amount token marks a debit.
    SignedAmount,
    /// Tokens are placed under the debit/credit/balance headers of the table.
    Columns,
}

const BRANCH_PREFIXES: &[&str] = &[
    "SAN JUS ",
    "CASA RO ",
    "CENTRAL ",
    "GOBERNA ",
    "GOBERNADOR ",
    "SANTA FE ",
    "ROSARIO ",
];

/// Upper-case, drop a leading branch name and long reference numbers, collapse spaces.
pub fn normalize_description(description: &str, patterns: &Patterns) -> String {
    let upper = description.to_uppercase();
    let mut rest = upper.as_str();
    for prefix in BRANCH_PREFIXES {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
            break;
        }
    }
    let cleaned = patterns.long_number.replace_all(rest, "");
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Column layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Debit,
    Credit,
    Balance,
}

/// Horizontal positions of the amount columns, read from a table header row.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    columns: Vec<(Column, f64)>,
}

impl ColumnLayout {
    /// Returns a layout when `line` is a header row carrying word positions and at
    /// least one of the debit/credit headers.
    pub fn detect(line: &Line, patterns: &Patterns) -> Option<Self> {
        if line.anchors.is_empty() || !patterns.header_row.is_match(&line.text) {
            return None;
        }
        let mut columns = Vec::new();
        for anchor in &line.anchors {
            let word = line.text[anchor.offset..]
                .split_whitespace()
                .next()
                .unwrap_or_default();
            let column = if patterns.debit_column.is_match(word) {
                Column::Debit
            } else if patterns.credit_column.is_match(word) {
                Column::Credit
            } else if patterns.balance_column.is_match(word) {
                Column::Balance
            } else {
                continue;
            };
            columns.push((column, anchor.x));
        }
        let has_amount_column = columns
            .iter()
            .any(|(c, _)| matches!(c, Column::Debit | Column::Credit));
        has_amount_column.then_some(Self { columns })
    }

    fn nearest(&self, x: f64) -> Option<Column> {
        self.columns
            .iter()
            .min_by(|(_, a), (_, b)| (a - x).abs().total_cmp(&(b - x).abs()))
            .map(|(c, _)| *c)
    }

    /// Amount, side and balance of a line whose words carry positions.
    fn place(
        &self,
        line: &Line,
        tokens: &[MoneyToken],
    ) -> Option<(Decimal, Side, Option<Decimal>)> {
        let mut amount = None;
        let mut balance = None;
        for token in tokens {
            let x = line.x_at(token.start)?;
            match self.nearest(x)? {
                Column::Debit => amount = Some((token.value, Side::Debit)),
                Column::Credit => amount = Some((token.value, Side::Credit)),
                Column::Balance => balance = Some(token.value),
            }
        }
        amount.map(|(value, side)| (value, side, balance))
    }
}

// ---------------------------------------------------------------------------
// Line matching
// ---------------------------------------------------------------------------

fn rightmost(tokens: &[MoneyToken]) -> (Decimal, Option<Decimal>) {
    match tokens {
        [.., amount, balance] => (amount.value, Some(balance.value)),
        [only] => (only.value, None),
        [] => (Decimal::ZERO, None),
    }
}

/// Reads one candidate movement off `line`. `columns` is only consulted for the
/// `Columns` layout.
pub fn match_line(
    line: &Line,
    sequence: usize,
    layout: Layout,
    min_amounts: usize,
    columns: Option<&ColumnLayout>,
    patterns: &Patterns,
) -> Option<ParsedRow> {
    let text = line.text.trim();
    let tokens = find_money_tokens(text, patterns);
    if tokens.is_empty() || tokens.len() < min_amounts {
        return None;
    }
    let date_match = patterns.date.find(text)?;
    if date_match.end() >= tokens[0].start {
        return None;
    }
    let date = parse_date(date_match.as_str())?;
    let description = text[date_match.end()..tokens[0].start].trim().to_string();

    let placed = match (layout, columns) {
        (Layout::Columns, Some(cols)) if text == line.text => cols.place(line, &tokens),
        _ => None,
    };
    let (value, side_hint, running_balance) = match placed {
        Some((value, side, balance)) => (value, Some((side, SignSource::Column)), balance),
        None => {
            let (value, balance) = rightmost(&tokens);
            let hint = match layout {
                Layout::SignedAmount if value.is_sign_negative() => {
                    Some((Side::Debit, SignSource::SignedToken))
                }
                Layout::SignedAmount => Some((Side::Credit, SignSource::SignedToken)),
                _ => None,
            };
            (value, hint, balance)
        }
    };

    let amount = value.abs();
    if amount.is_zero() {
        return None;
    }
    Some(ParsedRow {
        date,
        description_normalized: normalize_description(&description, patterns),
        description,
        amount,
        side_hint,
        running_balance,
        page: line.page,
        sequence,
    })
}

fn is_movement_candidate(text: &str, patterns: &Patterns) -> bool {
    !(patterns.non_movement.is_match(text)
        || patterns.header_row.is_match(text)
        || patterns.balance_line.is_match(text))
}

/// Every movement in document order, then sorted by `(date, sequence)`.
pub fn match_lines(
    lines: &[Line],
    layout: Layout,
    min_amounts: usize,
    patterns: &Patterns,
) -> Vec<ParsedRow> {
    let mut rows = Vec::new();
    let mut columns: Option<ColumnLayout> = None;
    let mut skipped = 0usize;

    for line in lines {
        if layout == Layout::Columns {
            if let Some(detected) = ColumnLayout::detect(line, patterns) {
                debug!("column header on page {}: {:?}", line.page, detected.columns);
                columns = Some(detected);
                continue;
            }
        }
        if !is_movement_candidate(&line.text, patterns) {
            skipped += 1;
            continue;
        }
        let sequence = rows.len() + 1;
        if let Some(row) =
            match_line(line, sequence, layout, min_amounts, columns.as_ref(), patterns)
        {
            rows.push(row);
        }
    }

    rows.sort_by_key(|r| (r.date, r.sequence));
    debug!("{} rows matched, {} non-movement lines skipped", rows.len(), skipped);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Anchor;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn p() -> &'static Patterns {
        Patterns::shared()
    }

    #[test]
    fn test_match_line_basic() {
        let line = Line::new(1, "15/03/2024 PAGO SERVICIO 1.500,00 10.250,00");
        let row = match_line(&line, 1, Layout::Rightmost, 2, None, p()).unwrap();
        assert_eq!(row.date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(row.description, "PAGO SERVICIO");
        assert_eq!(row.amount, dec!(1500.00));
        assert_eq!(row.running_balance, Some(dec!(10250.00)));
        assert_eq!(row.side_hint, None);
    }

    #[test]
    fn test_match_line_requires_two_tokens_by_default() {
        let line = Line::new(1, "15/03/2024 PAGO SERVICIO 1.500,00");
        assert!(match_line(&line, 1, Layout::Rightmost, 2, None, p()).is_none());
        let row = match_line(&line, 1, Layout::Rightmost, 1, None, p()).unwrap();
        assert_eq!(row.amount, dec!(1500.00));
        assert_eq!(row.running_balance, None);
    }

    #[test]
    fn test_match_line_date_must_precede_amounts() {
        let line = Line::new(1, "PAGO 1.500,00 15/03/2024 10.250,00");
        assert!(match_line(&line, 1, Layout::Rightmost, 2, None, p()).is_none());
        let line = Line::new(1, "PAGO SERVICIO 1.500,00 10.250,00");
        assert!(match_line(&line, 1, Layout::Rightmost, 2, None, p()).is_none());
    }

    #[test]
    fn test_match_line_invalid_date_is_dropped() {
        let line = Line::new(1, "31/02/2024 PAGO 1.500,00 10.250,00");
        assert!(match_line(&line, 1, Layout::Rightmost, 2, None, p()).is_none());
    }

    #[test]
    fn test_match_line_uses_last_two_tokens() {
        let line = Line::new(1, "01/04/2024 CHEQUE 123,45 2.000,00 8.000,00");
        let row = match_line(&line, 1, Layout::Rightmost, 2, None, p()).unwrap();
        assert_eq!(row.description, "CHEQUE");
        assert_eq!(row.amount, dec!(2000.00));
        assert_eq!(row.running_balance, Some(dec!(8000.00)));
    }

    #[test]
    fn test_match_line_signed_amount() {
        let line = Line::new(1, "02/04/24 COMISION -350,00 9.650,00");
        let row = match_line(&line, 1, Layout::SignedAmount, 2, None, p()).unwrap();
        assert_eq!(row.amount, dec!(350.00));
        assert_eq!(row.side_hint, Some((Side::Debit, SignSource::SignedToken)));

        let line = Line::new(1, "02/04/24 TRANSF RECIB 1.000,00 10.650,00");
        let row = match_line(&line, 2, Layout::SignedAmount, 2, None, p()).unwrap();
        assert_eq!(row.side_hint, Some((Side::Credit, SignSource::SignedToken)));
    }

    #[test]
    fn test_match_line_zero_amount_is_dropped() {
        let line = Line::new(1, "02/04/2024 AJUSTE 0,00 9.650,00");
        assert!(match_line(&line, 1, Layout::Rightmost, 2, None, p()).is_none());
    }

    fn positioned(text: &str, xs: &[f64]) -> Line {
        let mut line = Line::new(1, text);
        let mut offset = 0;
        for (word, x) in text.split(' ').zip(xs) {
            line.anchors.push(Anchor { offset, x: *x });
            offset += word.len() + 1;
        }
        line
    }

    #[test]
    fn test_column_layout_places_tokens() {
        let header = positioned(
            "FECHA DESCRIPCION DEBITO CREDITO SALDO",
            &[10.0, 80.0, 300.0, 400.0, 500.0],
        );
        let layout = ColumnLayout::detect(&header, p()).unwrap();

        let debit = positioned("05/04/2024 PAGO 1.000,00 9.000,00", &[10.0, 80.0, 298.0, 501.0]);
        let row = match_line(&debit, 1, Layout::Columns, 1, Some(&layout), p()).unwrap();
        assert_eq!(row.side_hint, Some((Side::Debit, SignSource::Column)));
        assert_eq!(row.amount, dec!(1000.00));
        assert_eq!(row.running_balance, Some(dec!(9000.00)));

        let credit = positioned("06/04/2024 DEPOSITO 500,00", &[10.0, 80.0, 402.0]);
        let row = match_line(&credit, 2, Layout::Columns, 1, Some(&layout), p()).unwrap();
        assert_eq!(row.side_hint, Some((Side::Credit, SignSource::Column)));
        assert_eq!(row.running_balance, None);
    }

    #[test]
    fn test_column_layout_without_anchors_falls_back() {
        let header = positioned(
            "FECHA DESCRIPCION DEBITO CREDITO SALDO",
            &[10.0, 80.0, 300.0, 400.0, 500.0],
        );
        let layout = ColumnLayout::detect(&header, p()).unwrap();
        let line = Line::new(1, "05/04/2024 PAGO 1.000,00 9.000,00");
        let row = match_line(&line, 1, Layout::Columns, 1, Some(&layout), p()).unwrap();
        assert_eq!(row.side_hint, None);
        assert_eq!(row.running_balance, Some(dec!(9000.00)));
    }

    #[test]
    fn test_header_without_amount_columns_is_not_a_layout() {
        let header = positioned("FECHA DESCRIPCION SALDO", &[10.0, 80.0, 500.0]);
        assert!(ColumnLayout::detect(&header, p()).is_none());
    }

    #[test]
    fn test_normalize_description() {
        assert_eq!(
            normalize_description("San Jus  Transf recib 12345678 cta", p()),
            "TRANSF RECIB CTA"
        );
        assert_eq!(normalize_description("ROSARIO CENTRAL PAGO", p()), "CENTRAL PAGO");
        assert_eq!(normalize_description("REF 12345 PAGO", p()), "REF 12345 PAGO");
        assert_eq!(normalize_description("", p()), "");
    }

    #[test]
    fn test_match_lines_skips_balance_lines_and_sorts() {
        let lines = vec![
            Line::new(1, "FECHA DESCRIPCION DEBITO CREDITO SALDO"),
            Line::new(1, "01/03/2024 SALDO ANTERIOR 10.000,00"),
            Line::new(1, "20/03/2024 PAGO B 100,00 9.400,00"),
            Line::new(1, "15/03/2024 PAGO A 500,00 9.500,00"),
            Line::new(2, "RESUMEN DEL PERIODO 1,00 2,00"),
            Line::new(2, "20/03/2024 PAGO C 100,00 9.300,00"),
        ];
        let rows = match_lines(&lines, Layout::Rightmost, 2, p());
        let descs: Vec<&str> = rows.iter().map(|r| r.description.as_str()).collect();
        assert_eq!(descs, vec!["PAGO A", "PAGO B", "PAGO C"]);
        assert_eq!(rows[2].page, 2);
        assert!(rows.windows(2).all(|w| (w[0].date, w[0].sequence) <= (w[1].date, w[1].sequence)));
    }
}
