//! Opening and closing balances as printed on the statement.
//!
//! Banks word these lines differently, so each search tries several layouts in a
//! fixed order and returns the first hit.

use rust_decimal::Decimal;

use crate::amount::{find_money_tokens, parse_date, parse_money};
use crate::models::{Line, StatedBalance};
use crate::patterns::Patterns;

fn single_amount(text: &str, patterns: &Patterns) -> Option<Decimal> {
    match find_money_tokens(text, patterns).as_slice() {
        [only] => Some(only.value),
        _ => None,
    }
}

fn last_amount(text: &str, patterns: &Patterns) -> Option<Decimal> {
    find_money_tokens(text, patterns).last().map(|t| t.value)
}

fn first_date(text: &str, patterns: &Patterns) -> Option<chrono::NaiveDate> {
    patterns.date.find(text).and_then(|m| parse_date(m.as_str()))
}

fn stated(amount: Decimal) -> StatedBalance {
    StatedBalance { amount, date: None }
}

pub fn find_opening_balance(lines: &[Line], patterns: &Patterns) -> Option<StatedBalance> {
    let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
    let upper: Vec<String> = texts.iter().map(|t| t.to_uppercase()).collect();

    // SALDO ULTIMO EXTRACTO AL dd/mm/yyyy 1.234,56
    for text in &texts {
        if patterns.opening_prefix.is_match(text) {
            if let (Some(date), Some(amount)) =
                (first_date(text, patterns), single_amount(text, patterns))
            {
                return Some(StatedBalance {
                    amount,
                    date: Some(date),
                });
            }
        }
    }

    for (text, up) in texts.iter().zip(&upper) {
        if up.contains("SALDO ANTERIOR") {
            if let Some(amount) = single_amount(text, patterns) {
                return Some(stated(amount));
            }
        }
    }

    for text in &texts {
        if let Some(caps) = patterns.opening_inline.captures(text) {
            if let Some(amount) = parse_money(&caps[1]) {
                return Some(stated(amount));
            }
        }
    }

    for (text, up) in texts.iter().zip(&upper) {
        if (up.contains("SALDO ULTIMO EXTRACTO") || up.contains("SALDO ÚLTIMO EXTRACTO"))
            && patterns.date.is_match(text)
        {
            if let Some(amount) = single_amount(text, patterns) {
                return Some(stated(amount));
            }
        }
    }

    // Amount on the same line or on one of the two lines below it.
    if let Some(i) = texts.iter().position(|t| patterns.last_summary.is_match(t)) {
        let found = texts[i..]
            .iter()
            .take(3)
            .find_map(|t| single_amount(t, patterns));
        if let Some(amount) = found {
            return Some(stated(amount));
        }
    }

    for (i, up) in upper.iter().enumerate() {
        if up.contains("SALDO ANTERIOR") {
            let found = last_amount(texts[i], patterns)
                .or_else(|| texts.get(i + 1).and_then(|next| last_amount(next, patterns)));
            if let Some(amount) = found {
                return Some(stated(amount));
            }
        }
    }

    None
}

/// Searched from the bottom of the statement up.
pub fn find_closing_balance(lines: &[Line], patterns: &Patterns) -> Option<StatedBalance> {
    let texts: Vec<&str> = lines.iter().rev().map(|l| l.text.as_str()).collect();

    for text in &texts {
        if patterns.closing_prefix.is_match(text) {
            if let (Some(date), Some(amount)) =
                (first_date(text, patterns), single_amount(text, patterns))
            {
                return Some(StatedBalance {
                    amount,
                    date: Some(date),
                });
            }
        }
    }

    for text in &texts {
        if text.to_uppercase().contains("SALDO FINAL") {
            if let Some(amount) = single_amount(text, patterns) {
                return Some(stated(amount));
            }
        }
    }

    // Amount glued to the caption, e.g. "SALDO FINAL:$1.234,56".
    for text in &texts {
        if !find_money_tokens(text, patterns).is_empty() {
            continue;
        }
        if let Some(caps) = patterns.closing_inline.captures(text) {
            if let Some(amount) = parse_money(&caps[1]) {
                return Some(StatedBalance {
                    amount,
                    date: first_date(text, patterns),
                });
            }
        }
    }

    // Saldo al 31/03/2024 1.234,56
    for text in &texts {
        if text.to_uppercase().contains("SALDO AL ") {
            if let (Some(date), Some(amount)) =
                (first_date(text, patterns), last_amount(text, patterns))
            {
                return Some(StatedBalance {
                    amount,
                    date: Some(date),
                });
            }
        }
    }

    None
}
