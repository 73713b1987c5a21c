use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::patterns::Patterns;

/// A money token located on a line, already converted to a signed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoneyToken {
    pub start: usize,
    pub end: usize,
    pub value: Decimal,
}

/// Parse an es-AR formatted amount (`1.234,56`, `1.234,56-`, `-1.234,56`).
///
/// The comma is the mandatory decimal separator; periods and spaces in the integer
/// part are thousands separators and are dropped without checking the grouping.
/// Anything that does not parse yields `None`.
pub fn parse_money(raw: &str) -> Option<Decimal> {
    let s = raw.trim();
    let negative = s.starts_with('-') || s.ends_with('-');
    let s = s.trim_matches('-');
    let (int_part, frac_part) = s.rsplit_once(',')?;

    let int_digits: String = int_part
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .collect();
    let frac_digits: String = frac_part.chars().filter(|c| !c.is_whitespace()).collect();
    if frac_digits.is_empty()
        || !frac_digits.chars().all(|c| c.is_ascii_digit())
        || !int_digits.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let int_digits = if int_digits.is_empty() { "0" } else { int_digits.as_str() };

    let value = Decimal::from_str(&format!("{int_digits}.{frac_digits}")).ok()?;
    if value.is_zero() {
        return Some(Decimal::ZERO);
    }
    Some(if negative { -value } else { value })
}

/// Parse a day-first date: `d/mm/yy` or `dd/mm/yyyy`. Two-digit years are 20xx.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = raw.trim().split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let d: u32 = parts[0].parse().ok()?;
    let m: u32 = parts[1].parse().ok()?;
    let y: i32 = match parts[2].len() {
        2 => 2000 + parts[2].parse::<i32>().ok()?,
        4 => parts[2].parse().ok()?,
        _ => return None,
    };
    NaiveDate::from_ymd_opt(y, m, d)
}

fn is_delimited(line: &str, start: usize, end: usize) -> bool {
    let before_ok = line[..start]
        .chars()
        .next_back()
        .map_or(true, char::is_whitespace);
    let after_ok = line[end..].chars().next().map_or(true, char::is_whitespace);
    before_ok && after_ok
}

/// Every whitespace-delimited money token on `line`, left to right.
///
/// Regex hits glued to other text (`$1,00`, `12,345`) are not tokens. Tokens that
/// match the grammar but fail to parse are dropped.
pub fn find_money_tokens(line: &str, patterns: &Patterns) -> Vec<MoneyToken> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < line.len() {
        let Some(m) = patterns.money.find_at(line, pos) else {
            break;
        };
        if is_delimited(line, m.start(), m.end()) {
            if let Some(value) = parse_money(m.as_str()) {
                tokens.push(MoneyToken {
                    start: m.start(),
                    end: m.end(),
                    value,
                });
            }
            pos = m.end();
        } else {
            let width = line[m.start()..].chars().next().map_or(1, char::len_utf8);
            pos = m.start() + width;
        }
    }
    tokens
}
