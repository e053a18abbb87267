//! Integer-cents money handling.
//!
//! Prices are stored and computed in minor units. CSV price cells accept a
//! plain integer or a decimal with at most two fractional digits; parsing
//! never goes through floating point.

/// Errors raised when parsing a money cell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoneyParseError {
    #[error("amount must not be empty")]
    Empty,
    #[error("amount is not a number: {raw}")]
    NotANumber { raw: String },
    #[error("amount has more than two decimal places: {raw}")]
    TooPrecise { raw: String },
    #[error("amount must not be negative: {raw}")]
    Negative { raw: String },
}

/// Parse a money amount such as `1500`, `1500.5`, or `1500.50` into cents.
pub fn parse_cents(raw: &str) -> Result<i64, MoneyParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(MoneyParseError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(MoneyParseError::Negative {
            raw: trimmed.to_owned(),
        });
    }

    let not_a_number = || MoneyParseError::NotANumber {
        raw: trimmed.to_owned(),
    };

    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(not_a_number());
    }
    if frac.len() > 2 {
        return Err(MoneyParseError::TooPrecise {
            raw: trimmed.to_owned(),
        });
    }

    let whole_value: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| not_a_number())?
    };
    let frac_value: i64 = if frac.is_empty() {
        0
    } else {
        let parsed: i64 = frac.parse().map_err(|_| not_a_number())?;
        // "5" means fifty cents, "05" means five.
        if frac.len() == 1 { parsed * 10 } else { parsed }
    };

    whole_value
        .checked_mul(100)
        .and_then(|cents| cents.checked_add(frac_value))
        .ok_or_else(not_a_number)
}

/// Render cents as a decimal string, e.g. `1500` -> `15.00`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{sign}{}.{:02}", cents / 100, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1500", 150_000)]
    #[case("1500.5", 150_050)]
    #[case("1500.50", 150_050)]
    #[case("0.05", 5)]
    #[case(".5", 50)]
    #[case(" 42 ", 4200)]
    fn parses_valid_amounts(#[case] raw: &str, #[case] expected: i64) {
        assert_eq!(parse_cents(raw), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn rejects_empty(#[case] raw: &str) {
        assert_eq!(parse_cents(raw), Err(MoneyParseError::Empty));
    }

    #[test]
    fn rejects_excess_precision() {
        assert!(matches!(
            parse_cents("10.005"),
            Err(MoneyParseError::TooPrecise { .. })
        ));
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(matches!(
            parse_cents("-3"),
            Err(MoneyParseError::Negative { .. })
        ));
    }

    #[rstest]
    #[case("abc")]
    #[case("1,5")]
    #[case(".")]
    fn rejects_non_numeric(#[case] raw: &str) {
        assert!(matches!(
            parse_cents(raw),
            Err(MoneyParseError::NotANumber { .. })
        ));
    }

    #[test]
    fn formats_cents() {
        assert_eq!(format_cents(150_050), "1500.50");
        assert_eq!(format_cents(5), "0.05");
    }
}
