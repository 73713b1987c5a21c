use rust_decimal::Decimal;

/// Placeholder shown for values the statement did not provide.
pub const MISSING: &str = "\u{2014}";

/// Format an amount the way the statements print it: 1.234.567,89
pub fn money(val: Decimal) -> String {
    let negative = val.is_sign_negative() && !val.round_dp(2).is_zero();
    let mut rounded = val.abs().round_dp(2);
    rounded.rescale(2);
    let cents = rounded.to_string();
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut with_dots = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            with_dots.push('.');
        }
        with_dots.push(c);
    }
    let with_dots: String = with_dots.chars().rev().collect();

    if negative {
        format!("-{with_dots},{dec_part}")
    } else {
        format!("{with_dots},{dec_part}")
    }
}

pub fn money_opt(val: Option<Decimal>) -> String {
    val.map(money).unwrap_or_else(|| MISSING.to_string())
}

/// Blank for zero, used in debit/credit columns where only one side is set.
pub fn money_or_blank(val: Decimal) -> String {
    if val.is_zero() {
        String::new()
    } else {
        money(val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(dec!(1234.56)), "1.234,56");
        assert_eq!(money(dec!(-500.00)), "-500,00");
        assert_eq!(money(dec!(0)), "0,00");
        assert_eq!(money(dec!(1000000.99)), "1.000.000,99");
        assert_eq!(money(dec!(42.1)), "42,10");
        assert_eq!(money(dec!(-0.001)), "0,00");
    }

    #[test]
    fn test_money_opt_placeholder() {
        assert_eq!(money_opt(None), "\u{2014}");
        assert_eq!(money_opt(Some(dec!(10250))), "10.250,00");
    }

    #[test]
    fn test_money_or_blank() {
        assert_eq!(money_or_blank(Decimal::ZERO), "");
        assert_eq!(money_or_blank(dec!(750)), "750,00");
    }
}
