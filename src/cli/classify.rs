use rust_decimal::Decimal;

use crate::amount::parse_money;
use crate::categorizer::classify;
use crate::error::{ExtractoError, Result};
use crate::matcher::normalize_description;
use crate::patterns::Patterns;

fn parse_side(raw: Option<&str>) -> Result<Decimal> {
    let Some(raw) = raw else {
        return Ok(Decimal::ZERO);
    };
    match parse_money(raw) {
        Some(value) if !value.is_sign_negative() => Ok(value),
        _ => Err(ExtractoError::InvalidAmount(raw.to_string())),
    }
}

pub fn run(description: &str, debit: Option<&str>, credit: Option<&str>) -> Result<()> {
    let debit = parse_side(debit)?;
    let credit = parse_side(credit)?;
    let normalized = normalize_description(description, Patterns::shared());
    let category = classify(description, &normalized, debit, credit, false);
    println!("Normalized: {normalized}");
    println!("Category: {category}");
    Ok(())
}
